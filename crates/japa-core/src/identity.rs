//! Identity initialization
//!
//! Handles first-run setup. A device either mints a brand new identity or
//! joins an existing one by importing a transfer code made on another
//! device.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::merge;
use crate::models::Identity;
use crate::spiritual_id::{generate_spiritual_id, DeviceInfo, Digester};
use crate::storage::Storage;
use crate::store::LocalStore;
use crate::transfer::decode_transfer_code;

/// Result of initialization
#[derive(Debug)]
pub struct InitResult {
    pub identity: Identity,
    /// Whether this was a new identity (vs joining existing)
    pub is_new: bool,
    pub lifetime_count: u64,
}

/// Create a new identity and store it
///
/// Input is validated before the id is generated, so a rejected name or
/// symbol writes nothing. Returns an error if already initialized.
pub async fn initialize_new<S: Storage, D: Digester>(
    store: &mut LocalStore<S>,
    device: &DeviceInfo,
    digester: &D,
    name: &str,
    symbol_id: &str,
) -> Result<InitResult> {
    ensure_uninitialized(store)?;

    // Validate with a placeholder id first
    Identity::create("", name, symbol_id, Utc::now())?;

    let id = generate_spiritual_id(device, digester)
        .await
        .context("Failed to generate identity")?;
    let identity = Identity::create(id, name, symbol_id, Utc::now())?;

    store
        .save_identity(&identity)
        .context("Failed to save identity")?;
    let lifetime_count = store.counts()?.lifetime_count;

    info!("Created identity {}", identity.id);
    Ok(InitResult {
        identity,
        is_new: true,
        lifetime_count,
    })
}

/// Join an existing identity from a transfer code
///
/// Returns an error if already initialized; use a transfer import to merge
/// into an existing identity instead.
pub fn initialize_join<S: Storage>(store: &mut LocalStore<S>, code: &str) -> Result<InitResult> {
    ensure_uninitialized(store)?;

    let snapshot = decode_transfer_code(code).context("Invalid transfer code")?;
    let outcome = merge::merge(store, &snapshot).context("Failed to import transfer code")?;

    Ok(InitResult {
        identity: outcome.identity,
        is_new: false,
        lifetime_count: outcome.lifetime_count,
    })
}

fn ensure_uninitialized<S: Storage>(store: &LocalStore<S>) -> Result<()> {
    if store.has_identity()? {
        anyhow::bail!(
            "Already initialized. Use `japa identity show` to see your identity."
        );
    }
    Ok(())
}
