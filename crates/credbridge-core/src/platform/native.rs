//! Native credential store backend
//!
//! On Windows this is a generic Windows Credential Manager entry: the target
//! name and user name are both the store key and the credential blob is the
//! raw UTF-16LE payload. `keyring` always writes with enterprise persistence,
//! so a requested local-machine scope is widened to a roaming one.

use super::{CredentialEntry, Persistence, PlatformStore};
use crate::error::PlatformError;
use crate::identity::{StoreKey, KEY_NAMESPACE};
use keyring::{Entry, Error as KeyringError};
use tracing::{debug, warn};

fn map_keyring_error(err: KeyringError) -> PlatformError {
    match err {
        KeyringError::NoStorageAccess(e) | KeyringError::PlatformFailure(e) => {
            PlatformError::Unavailable(e.to_string())
        }
        other => PlatformError::Backend(other.to_string()),
    }
}

/// Scope `keyring` gives every generic credential it writes
const KEYRING_PERSISTENCE: Persistence = Persistence::Enterprise;

/// Credential store provided by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl KeyringStore {
    /// Create the native store handle
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &StoreKey) -> Result<Entry, PlatformError> {
        Entry::new_with_target(key.as_str(), KEY_NAMESPACE, key.as_str()).map_err(map_keyring_error)
    }
}

impl PlatformStore for KeyringStore {
    fn write(&self, entry: &CredentialEntry) -> Result<(), PlatformError> {
        let scope = self.persistence(entry.persistence);
        if scope != entry.persistence {
            debug!(
                target_name = %entry.target,
                requested = %entry.persistence,
                actual = %scope,
                "Native store widens persistence scope"
            );
        }
        Self::entry(&entry.target)?
            .set_secret(entry.payload())
            .map_err(|e| {
                warn!(error = %e, target_name = %entry.target, "Native credential write failed");
                map_keyring_error(e)
            })
    }

    fn read(&self, key: &StoreKey) -> Result<Option<CredentialEntry>, PlatformError> {
        match Self::entry(key)?.get_secret() {
            Ok(payload) => Ok(Some(
                CredentialEntry::from_payload(key.clone(), payload)
                    .with_persistence(KEYRING_PERSISTENCE),
            )),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(e) => {
                warn!(error = %e, target_name = %key, "Native credential read failed");
                Err(map_keyring_error(e))
            }
        }
    }

    fn name(&self) -> &'static str {
        "native"
    }

    fn persistence(&self, _requested: Persistence) -> Persistence {
        KEYRING_PERSISTENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_reflects_keyring_scope() {
        let store = KeyringStore::new();
        assert_eq!(store.persistence(Persistence::LocalMachine), Persistence::Enterprise);
        assert_eq!(store.persistence(Persistence::Enterprise), Persistence::Enterprise);
    }
}
