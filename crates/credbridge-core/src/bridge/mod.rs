//! Credential bridge
//!
//! Maps an account's secret onto a platform credential entry and back. The
//! bridge keeps no state between calls; everything persistent lives in the
//! platform store. Calls for the same account must be serialized by the
//! caller.


use crate::codec::{decode_payload, repair_contamination, MAX_READ_LEN};
use crate::config::BridgeConfig;
use crate::error::{PlatformError, RetrieveError, RetrieveResult, StoreError, StoreResult};
use crate::identity::{derive_key, AccountIdentity};
use crate::platform::{CredentialBackend, CredentialEntry, Persistence, PlatformStore};
use crate::registry::AccountRegistry;
use crate::secure_string::SecureString;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// No secret to store; the platform store was not touched
    Skipped,
    /// Entry written (or overwritten)
    Stored,
}

/// Encodes secrets into platform credential entries and decodes them back
pub struct CredentialBridge {
    store: Arc<dyn PlatformStore>,
    config: BridgeConfig,
}

impl CredentialBridge {
    /// Create a bridge over an already opened store
    #[must_use]
    pub fn new(store: Arc<dyn PlatformStore>, config: BridgeConfig) -> Self {
        Self { store, config }
    }

    /// Open `backend` (with the configured call bound) and wrap it
    pub fn open(backend: CredentialBackend, config: BridgeConfig) -> Result<Self, PlatformError> {
        let store = backend.open(config.platform_timeout())?;
        Ok(Self::new(store, config))
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Name of the underlying store
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Scope the underlying store gives written entries
    #[must_use]
    pub fn persistence_scope(&self) -> Persistence {
        self.store.persistence(Persistence::LocalMachine)
    }

    /// Write `secret` for `identity`, overwriting any previous entry
    ///
    /// An absent or empty secret is a no-op.
    pub fn store(
        &self,
        identity: &AccountIdentity,
        secret: Option<&SecureString>,
    ) -> StoreResult<StoreOutcome> {
        let Some(secret) = secret.filter(|s| !s.is_empty()) else {
            debug!(account = %identity, "No secret to store");
            return Ok(StoreOutcome::Skipped);
        };

        let units = secret.utf16_len();
        if units > MAX_READ_LEN {
            return Err(StoreError::SecretTooLong {
                units,
                max: MAX_READ_LEN,
            });
        }

        let key = derive_key(identity);
        let entry = CredentialEntry::for_secret(key, secret);
        debug!(key = %entry.target, bytes = entry.payload_size(), "Storing credential");

        self.store.write(&entry).map_err(|e| {
            warn!(key = %entry.target, error = %e, "Credential write failed");
            StoreError::WriteFailed(e)
        })?;
        Ok(StoreOutcome::Stored)
    }

    /// Read the secret for `identity`
    ///
    /// `Ok(None)` means nothing is stored. Store key text appended to the
    /// secret is stripped unless repair is disabled.
    pub fn retrieve(&self, identity: &AccountIdentity) -> RetrieveResult<Option<SecureString>> {
        let key = derive_key(identity);
        debug!(key = %key, "Retrieving credential");

        let entry = match self.store.read(&key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(key = %key, "No stored credential");
                return Ok(None);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Credential read failed");
                return Err(RetrieveError::ReadFailed(e));
            }
        };

        let mut secret = decode_payload(entry.payload())?;
        if self.config.repair_contamination {
            let (repaired, stripped) = repair_contamination(secret, &key);
            if stripped {
                warn!(key = %key, "Store key detected at the end of the secret, truncated");
            }
            secret = repaired;
        }

        if secret.is_empty() {
            debug!(key = %key, "Stored credential holds no secret");
            return Ok(None);
        }
        Ok(Some(secret))
    }

    /// Store the registry's secret for `identity`, then release the
    /// registry's copy if memory clearing is enabled.
    pub fn store_account<R: AccountRegistry + ?Sized>(
        &self,
        registry: &mut R,
        identity: &AccountIdentity,
    ) -> StoreResult<StoreOutcome> {
        let secret = registry.secret(identity);
        let outcome = self.store(identity, secret.as_ref())?;

        if outcome == StoreOutcome::Stored && self.config.clear_secret_after_store {
            info!(account = %identity, "Clearing stored secret from memory");
            registry.set_secret(identity, None);
        }
        Ok(outcome)
    }
}
