//! File-backed `KeyValueStore` — one JSON object per data directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::error::StorageError;

use super::traits::KeyValueStore;

const STORE_FILE: &str = "storage.json";

/// Persistent store writing a `{key: value}` JSON map to `<dir>/storage.json`.
///
/// Every write rewrites the whole map through a temporary file and a rename,
/// so a crash leaves either the old or the new contents on disk.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create) a store in `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(STORE_FILE);
        info!(path = %path.display(), "Key-value store opened");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            StorageError::Serialization(format!("{}: {e}", self.path.display()))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let store = FileStore::open(&dir).unwrap();
        assert!(dir.exists());
        // File is only created on first write
        assert!(!store.path().exists());
        store.set("k", "v").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(tmp.path()).unwrap();
            store.set("tw_ref_token", "tw_abcdEFGH").unwrap();
            store.set("utm_source", "newsletter").unwrap();
            store.remove("utm_source").unwrap();
        }
        let store = FileStore::open(tmp.path()).unwrap();
        assert_eq!(store.get("tw_ref_token").unwrap().as_deref(), Some("tw_abcdEFGH"));
        assert_eq!(store.get("utm_source").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.get("k"), Err(StorageError::Serialization(_))));
    }
}
