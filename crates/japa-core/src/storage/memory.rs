//! In-memory storage backend

use std::collections::HashMap;

use super::{Storage, StorageKey, StorageResult};

/// Storage backed by a `HashMap`, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<StorageKey, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> StorageResult<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> StorageResult<()> {
        self.entries.remove(&key);
        Ok(())
    }
}
