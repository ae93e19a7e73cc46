//! In-memory `KeyValueStore` used by tests and as a no-disk fallback.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StorageError;

use super::traits::KeyValueStore;

/// HashMap-backed store that can simulate an unavailable or full backend.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    available: AtomicBool,
    /// Maximum total bytes of keys plus values, if limited.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            quota: None,
        }
    }

    /// A store whose every operation fails, like storage in private browsing.
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// A store that refuses writes once `bytes` would be exceeded.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Toggle simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries()?;
        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing again is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = MemoryStore::unavailable();
        assert!(matches!(store.get("a"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.set("a", "1"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.remove("a"), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(8);
        store.set("k", "1234").unwrap();
        let err = store.set("other", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        // Overwriting the same key only counts the new value
        store.set("k", "1234567").unwrap();
    }

    #[test]
    fn set_if_absent_is_first_write_wins() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("utm_source", "x").unwrap());
        assert!(!store.set_if_absent("utm_source", "y").unwrap());
        assert_eq!(store.get("utm_source").unwrap().as_deref(), Some("x"));
    }
}
