//! `DraftStore` — persistence of the in-progress form record.
//!
//! Saving, loading and clearing never fail from the caller's point of view:
//! storage problems are logged and the form carries on without persistence.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::store::KeyValueStore;
use crate::store::keys;

use super::migrations::{CURRENT_DRAFT_VERSION, migrate_draft};
use super::model::FormDraft;

/// Reads and writes the merged draft under a single key.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftStore {
    /// Draft store using the standard draft key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, keys::FORM_DRAFT)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Overwrite the stored draft. Returns whether it was persisted.
    pub fn save(&self, draft: &FormDraft) -> bool {
        let mut draft = draft.clone();
        draft.version = Some(CURRENT_DRAFT_VERSION);
        let json = match serde_json::to_string(&draft) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize form draft");
                return false;
            }
        };
        match self.store.set(&self.key, &json) {
            Ok(()) => {
                debug!(key = %self.key, bytes = json.len(), "Form draft saved");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist form draft");
                false
            }
        }
    }

    /// Read the stored draft, migrated to the current shape.
    ///
    /// Missing, unreadable and corrupt drafts all read as `None`.
    pub fn load(&self) -> Option<FormDraft> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read form draft");
                return None;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring corrupt form draft");
                return None;
            }
        };
        if !value.is_object() {
            warn!(key = %self.key, "Ignoring form draft that is not a JSON object");
            return None;
        }

        match serde_json::from_value(migrate_draft(value)) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring undecodable form draft");
                None
            }
        }
    }

    /// Delete the stored draft. Returns whether the removal reached storage.
    pub fn clear(&self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => {
                debug!(key = %self.key, "Form draft cleared");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to clear form draft");
                false
            }
        }
    }
}
