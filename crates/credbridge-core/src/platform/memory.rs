//! In-memory credential store

use super::{CredentialEntry, PlatformStore};
use crate::error::PlatformError;
use crate::identity::StoreKey;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

fn handle_lock_poison<T>(e: std::sync::PoisonError<T>) -> PlatformError {
    PlatformError::Backend(format!("Lock poisoned: {}", e))
}

/// Process-local store keyed by target name
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CredentialEntry>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a raw payload under `key`, bypassing encoding
    ///
    /// Used to reproduce payloads written by other, possibly defective, stores.
    pub fn insert_raw(&self, key: &StoreKey, payload: Vec<u8>) -> Result<(), PlatformError> {
        let entry = CredentialEntry::from_payload(key.clone(), payload);
        self.write(&entry)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlatformStore for MemoryStore {
    fn write(&self, entry: &CredentialEntry) -> Result<(), PlatformError> {
        debug!(target_name = %entry.target, bytes = entry.payload_size(), "Writing memory credential");
        let mut entries = self.entries.write().map_err(handle_lock_poison)?;
        entries.insert(entry.target.as_str().to_string(), entry.clone());
        Ok(())
    }

    fn read(&self, key: &StoreKey) -> Result<Option<CredentialEntry>, PlatformError> {
        let entries = self.entries.read().map_err(handle_lock_poison)?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountIdentity;
    use crate::platform::Persistence;
    use crate::secure_string::SecureString;

    #[test]
    fn test_write_overwrites() {
        let store = MemoryStore::new();
        let key = AccountIdentity::new("aim", "alice").store_key();

        store
            .write(&CredentialEntry::for_secret(key.clone(), &SecureString::new("first")))
            .unwrap();
        store
            .write(&CredentialEntry::for_secret(key.clone(), &SecureString::new("second")))
            .unwrap();

        assert_eq!(store.len(), 1);
        let entry = store.read(&key).unwrap().unwrap();
        assert_eq!(entry.payload_size(), 12);
    }

    #[test]
    fn test_read_missing() {
        let store = MemoryStore::new();
        let key = AccountIdentity::new("aim", "nobody").store_key();
        assert!(store.read(&key).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_keeps_requested_persistence() {
        let store = MemoryStore::new();
        let key = AccountIdentity::new("aim", "alice").store_key();
        let entry = CredentialEntry::for_secret(key.clone(), &SecureString::new("pw"))
            .with_persistence(Persistence::Enterprise);

        store.write(&entry).unwrap();
        assert_eq!(store.read(&key).unwrap().unwrap().persistence, Persistence::Enterprise);
        assert_eq!(store.persistence(Persistence::LocalMachine), Persistence::LocalMachine);
    }
}
