//! Typed access to the local state store
//!
//! `LocalStore` is the main entry point: it wraps any `Storage` backend and
//! exposes identity, counters and theme as typed values.
//!
//! # Day rollover
//!
//! The "today" counter is reset lazily. Reading counts compares the stored
//! last-count date with the current local calendar day; when they differ the
//! today counter is persisted as 0 with the new date before returning.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use crate::models::{Counts, ExportDocument, Identity, Theme, TransferSnapshot};
use crate::storage::{Storage, StorageKey, StorageResult};

/// Render a local calendar day the way it is stored, e.g. `Sat Oct 17 2026`
pub fn day_string(now: DateTime<Local>) -> String {
    now.format("%a %b %d %Y").to_string()
}

/// Today's day string in the device's timezone
pub fn today() -> String {
    day_string(Local::now())
}

/// Typed view over a `Storage` backend
pub struct LocalStore<S: Storage> {
    storage: S,
}

impl<S: Storage> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    // ==================== Identity ====================

    /// Load the stored identity
    ///
    /// Missing and unparsable values both yield `None`; corruption is logged
    /// and otherwise ignored so callers fall back to onboarding.
    pub fn identity(&self) -> StorageResult<Option<Identity>> {
        let Some(raw) = self.storage.get(StorageKey::UserIdentity)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                warn!("Ignoring corrupt stored identity: {}", e);
                Ok(None)
            }
        }
    }

    pub fn has_identity(&self) -> StorageResult<bool> {
        Ok(self.identity()?.is_some())
    }

    /// Store an identity, replacing any existing one
    pub fn save_identity(&mut self, identity: &Identity) -> StorageResult<()> {
        let json = serde_json::to_string(identity)?;
        self.storage.set(StorageKey::UserIdentity, json)?;
        info!("Saved identity {}", identity.id);
        Ok(())
    }

    /// Forget the identity ("change identity"); counters are kept
    pub fn clear_identity(&mut self) -> StorageResult<()> {
        self.storage.remove(StorageKey::UserIdentity)?;
        info!("Cleared identity");
        Ok(())
    }

    // ==================== Counts ====================

    /// Read counters, applying day rollover against the current local day
    pub fn counts(&mut self) -> StorageResult<Counts> {
        self.counts_on(&today())
    }

    /// Read counters as of the given day string
    pub fn counts_on(&mut self, today: &str) -> StorageResult<Counts> {
        let lifetime_count = self.read_count(StorageKey::LifetimeCount)?;
        let last_date = self.storage.get(StorageKey::LastCountDate)?;
        let stored_today = self.storage.get(StorageKey::TodayCount)?;

        let today_count = match (&stored_today, last_date.as_deref()) {
            (Some(raw), Some(date)) if date == today => parse_count(raw),
            _ => {
                debug!(
                    "Rolling today count over ({:?} -> {})",
                    last_date, today
                );
                self.storage.set_many(vec![
                    (StorageKey::TodayCount, "0".to_string()),
                    (StorageKey::LastCountDate, today.to_string()),
                ])?;
                0
            }
        };

        Ok(Counts {
            lifetime_count,
            today_count,
            last_count_date: today.to_string(),
        })
    }

    /// Persist both counters, stamping them with the current local day
    pub fn save_counts(&mut self, lifetime_count: u64, today_count: u64) -> StorageResult<()> {
        self.save_counts_on(lifetime_count, today_count, &today())
    }

    pub fn save_counts_on(
        &mut self,
        lifetime_count: u64,
        today_count: u64,
        today: &str,
    ) -> StorageResult<()> {
        self.storage.set_many(vec![
            (StorageKey::LifetimeCount, lifetime_count.to_string()),
            (StorageKey::TodayCount, today_count.to_string()),
            (StorageKey::LastCountDate, today.to_string()),
        ])
    }

    /// Add recitations to both counters
    pub fn record(&mut self, amount: u64) -> StorageResult<Counts> {
        self.record_on(amount, &today())
    }

    pub fn record_on(&mut self, amount: u64, today: &str) -> StorageResult<Counts> {
        let counts = self.counts_on(today)?;
        let updated = Counts {
            lifetime_count: counts.lifetime_count.saturating_add(amount),
            today_count: counts.today_count.saturating_add(amount),
            last_count_date: today.to_string(),
        };
        self.save_counts_on(updated.lifetime_count, updated.today_count, today)?;
        debug!(
            "Recorded {} (today={}, lifetime={})",
            amount, updated.today_count, updated.lifetime_count
        );
        Ok(updated)
    }

    /// Stored lifetime count, without applying day rollover
    pub(crate) fn lifetime_count(&self) -> StorageResult<u64> {
        self.read_count(StorageKey::LifetimeCount)
    }

    fn read_count(&self, key: StorageKey) -> StorageResult<u64> {
        Ok(self
            .storage
            .get(key)?
            .map(|raw| parse_count(&raw))
            .unwrap_or(0))
    }

    // ==================== Theme ====================

    pub fn theme(&self) -> StorageResult<Theme> {
        let stored = self.storage.get(StorageKey::Theme)?;
        Ok(Theme::from_stored(stored.as_deref()))
    }

    pub fn save_theme(&mut self, theme: Theme) -> StorageResult<()> {
        self.storage.set(StorageKey::Theme, theme.as_str().to_string())
    }

    /// Flip the theme and return the new value
    pub fn toggle_theme(&mut self) -> StorageResult<Theme> {
        let theme = self.theme()?.toggled();
        self.save_theme(theme)?;
        Ok(theme)
    }

    // ==================== Portable payloads ====================

    /// Build the payload for a transfer code, if an identity exists
    pub fn snapshot(&self) -> StorageResult<Option<TransferSnapshot>> {
        let Some(identity) = self.identity()? else {
            return Ok(None);
        };
        Ok(Some(TransferSnapshot {
            identity,
            lifetime_count: self.lifetime_count()?,
        }))
    }

    /// Build the backup document as of now
    pub fn export_document(&mut self) -> StorageResult<ExportDocument> {
        self.export_document_at(Utc::now(), &today())
    }

    pub fn export_document_at(
        &mut self,
        now: DateTime<Utc>,
        today: &str,
    ) -> StorageResult<ExportDocument> {
        let counts = self.counts_on(today)?;
        Ok(ExportDocument {
            identity: self.identity()?,
            lifetime_count: counts.lifetime_count,
            today_count: counts.today_count,
            export_date: now,
        })
    }
}

/// Stored counters that fail to parse read as 0
fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}
