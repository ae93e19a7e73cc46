//! `KeyValueStore` trait — the only persistence interface the wizard sees.
//!
//! Mirrors browser local storage: string keys, string values, last write
//! wins. Implementations must be cheap to call synchronously.

use crate::error::StorageError;

/// Backend-agnostic string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write `value` only if `key` is currently absent. Returns whether it wrote.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        if self.get(key)?.is_some() {
            return Ok(false);
        }
        self.set(key, value)?;
        Ok(true)
    }
}
