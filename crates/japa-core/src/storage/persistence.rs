//! File-backed storage
//!
//! All keys live in one JSON object on disk. The whole map is rewritten on
//! every change using atomic writes (write to temp file, then rename) so the
//! file is never left half-written.
//!
//! Storage location: `~/.local/share/japa/store.json` (configurable via `Config`)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Storage, StorageError, StorageKey, StorageResult};
use crate::config::Config;

/// Key-value store persisted as a JSON map
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store file named by the configuration
    pub fn open_with_config(config: &Config) -> StorageResult<Self> {
        Self::open(config.store_path())
    }

    /// Open (or lazily create) the store at `path`
    ///
    /// A file that cannot be parsed is moved aside to
    /// `<name>.corrupt.backup` and replaced by an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        if !path.exists() {
            debug!("No store at {:?}, starting empty", path);
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| StorageError::ReadError {
            path: path.clone(),
            source,
        })?;

        let entries: BTreeMap<String, String> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                let backup_path = backup_path_for(&path);
                fs::rename(&path, &backup_path).map_err(|source| StorageError::CorruptStore {
                    path: path.clone(),
                    backup_path: backup_path.clone(),
                    details: e.to_string(),
                    source,
                })?;
                warn!(
                    "Store at {:?} was corrupted ({}); moved to {:?}",
                    path, e, backup_path
                );
                BTreeMap::new()
            }
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the store file in bytes (0 if not yet written)
    pub fn file_size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn flush(&self) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Wrote {} keys to {:?}", self.entries.len(), self.path);
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> StorageResult<()> {
        self.set_many(vec![(key, value)])
    }

    fn remove(&mut self, key: StorageKey) -> StorageResult<()> {
        if self.entries.remove(key.as_str()).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// Stages every entry, then writes the file once
    ///
    /// On failure the in-memory map is restored so it keeps matching disk.
    fn set_many(&mut self, entries: Vec<(StorageKey, String)>) -> StorageResult<()> {
        let previous = self.entries.clone();
        for (key, value) in entries {
            self.entries.insert(key.as_str().to_string(), value);
        }

        if let Err(e) = self.flush() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".corrupt.backup");
    path.with_file_name(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    // Same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_until_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get(StorageKey::UserIdentity).unwrap().is_none());
        assert!(!path.exists());
        assert_eq!(storage.file_size(), 0);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::LifetimeCount, "108".into()).unwrap();
        storage.set(StorageKey::Theme, "light".into()).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(StorageKey::LifetimeCount).unwrap().as_deref(),
            Some("108")
        );
        assert_eq!(reopened.get(StorageKey::Theme).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_file_uses_string_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::TodayCount, "3".into()).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("todayCount").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::UserIdentity, "{}".into()).unwrap();
        storage.remove(StorageKey::UserIdentity).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert!(reopened.get(StorageKey::UserIdentity).unwrap().is_none());
    }

    #[test]
    fn test_set_many_writes_all_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage
            .set_many(vec![
                (StorageKey::LifetimeCount, "50".into()),
                (StorageKey::TodayCount, "0".into()),
                (StorageKey::LastCountDate, "Mon Jan 01 2024".into()),
            ])
            .unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        for key in [
            StorageKey::LifetimeCount,
            StorageKey::TodayCount,
            StorageKey::LastCountDate,
        ] {
            assert!(reopened.get(key).unwrap().is_some());
        }
    }

    #[test]
    fn test_failed_set_many_keeps_previous_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(StorageKey::LifetimeCount, "1".into()).unwrap();

        // A non-empty directory at the target path makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = storage.set_many(vec![
            (StorageKey::LifetimeCount, "2".into()),
            (StorageKey::TodayCount, "1".into()),
        ]);
        assert!(matches!(result, Err(StorageError::AtomicWriteFailed { .. })));

        assert_eq!(
            storage.get(StorageKey::LifetimeCount).unwrap().as_deref(),
            Some("1")
        );
        assert!(storage.get(StorageKey::TodayCount).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get(StorageKey::LifetimeCount).unwrap().is_none());

        let backup = temp_dir.path().join("store.json.corrupt.backup");
        assert!(backup.exists());
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
        assert!(!path.exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("store.json");

        atomic_write(&nested_path, b"{}").unwrap();

        assert!(nested_path.exists());
        assert!(!nested_path.with_extension("tmp").exists());
    }
}
