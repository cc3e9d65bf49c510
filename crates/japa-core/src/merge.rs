//! Merging an imported snapshot into the local store
//!
//! Rules, applied without prompting:
//!
//! 1. No local identity: adopt the imported identity and lifetime count.
//! 2. Otherwise the identity with the earlier `creation_date` is kept
//!    (ties keep the local one).
//! 3. With a local identity, lifetime becomes the larger of the two counts.
//!    Counts are never summed.
//! 4. Today's count is reset to 0 in every case.
//!
//! Everything is written with a single `set_many`, so no reader sees the new
//! identity next to stale counts.

use tracing::info;

use crate::models::{Identity, TransferSnapshot};
use crate::storage::{Storage, StorageKey, StorageResult};
use crate::store::{today, LocalStore};

/// Which side's identity survived a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// No identity existed locally; the imported one was adopted
    Adopted,
    /// The imported identity was older and replaced the local one
    Imported,
    /// The local identity was older (or the same age) and was kept
    Local,
}

/// Result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub identity: Identity,
    pub identity_source: IdentitySource,
    pub lifetime_count: u64,
}

/// Merge using the current local day for the reset counter
pub fn merge<S: Storage>(
    store: &mut LocalStore<S>,
    imported: &TransferSnapshot,
) -> StorageResult<MergeOutcome> {
    merge_on(store, imported, &today())
}

/// Merge, stamping the reset today-count with `today`
pub fn merge_on<S: Storage>(
    store: &mut LocalStore<S>,
    imported: &TransferSnapshot,
    today: &str,
) -> StorageResult<MergeOutcome> {
    let outcome = match store.identity()? {
        None => MergeOutcome {
            identity: imported.identity.clone(),
            identity_source: IdentitySource::Adopted,
            lifetime_count: imported.lifetime_count,
        },
        Some(local) => {
            let local_lifetime = store.lifetime_count()?;
            let lifetime_count = local_lifetime.max(imported.lifetime_count);

            if imported.identity.is_older_than(&local) {
                MergeOutcome {
                    identity: imported.identity.clone(),
                    identity_source: IdentitySource::Imported,
                    lifetime_count,
                }
            } else {
                MergeOutcome {
                    identity: local,
                    identity_source: IdentitySource::Local,
                    lifetime_count,
                }
            }
        }
    };

    let mut writes = Vec::with_capacity(4);
    if outcome.identity_source != IdentitySource::Local {
        writes.push((
            StorageKey::UserIdentity,
            serde_json::to_string(&outcome.identity)?,
        ));
    }
    writes.push((StorageKey::LifetimeCount, outcome.lifetime_count.to_string()));
    writes.push((StorageKey::TodayCount, "0".to_string()));
    writes.push((StorageKey::LastCountDate, today.to_string()));

    store.storage_mut().set_many(writes)?;

    info!(
        "Merged snapshot for {}: identity {:?}, lifetime {}",
        imported.identity.id, outcome.identity_source, outcome.lifetime_count
    );

    Ok(outcome)
}
