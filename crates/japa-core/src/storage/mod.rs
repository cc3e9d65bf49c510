//! Storage layer
//!
//! A small key-value abstraction over the five persisted keys.
//!
//! ## Backends
//!
//! - **MemoryStorage**: in-process map, used by tests and as a fake
//! - **FileStorage**: a single JSON map file written atomically
//!
//! Components never reach into a global store; they take a `Storage`
//! implementation explicitly (see `store::LocalStore`).

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use persistence::FileStorage;

/// Keys of the persisted key space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// JSON-encoded `Identity`
    UserIdentity,
    /// Decimal integer string
    LifetimeCount,
    /// Decimal integer string, reset on day change
    TodayCount,
    /// Calendar day of the last count, compared for rollover
    LastCountDate,
    /// "light" or "dark"
    Theme,
}

impl StorageKey {
    /// The string key written to the backing store
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::UserIdentity => "userIdentity",
            StorageKey::LifetimeCount => "lifetimeCount",
            StorageKey::TodayCount => "todayCount",
            StorageKey::LastCountDate => "lastCountDate",
            StorageKey::Theme => "theme",
        }
    }
}

/// Synchronous key-value persistence
pub trait Storage {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>>;

    fn set(&mut self, key: StorageKey, value: String) -> StorageResult<()>;

    fn remove(&mut self, key: StorageKey) -> StorageResult<()>;

    /// Apply several writes so that later reads see all of them or none
    ///
    /// The default applies them one by one, which is enough for backends
    /// whose individual writes cannot fail halfway.
    fn set_many(&mut self, entries: Vec<(StorageKey, String)>) -> StorageResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
