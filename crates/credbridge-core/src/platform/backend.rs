//! Credential backend selection

use super::{MemoryStore, PlatformStore, TimedStore};
use crate::error::PlatformError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Supported credential backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// Native store when compiled in, memory otherwise
    #[default]
    Auto,
    /// Operating system credential store
    Native,
    /// In-memory only (for testing and dry runs)
    Memory,
}

impl CredentialBackend {
    /// Detect the best backend for this build
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(feature = "native-keyring") {
            Self::Native
        } else {
            Self::Memory
        }
    }

    /// Resolve Auto to actual backend
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto => Self::detect(),
            other => other,
        }
    }

    /// Open the store, optionally bounding every call by `timeout`
    pub fn open(self, timeout: Option<Duration>) -> Result<Arc<dyn PlatformStore>, PlatformError> {
        let resolved = self.resolve();
        info!(backend = ?resolved, timeout = ?timeout, "Initializing credential store");

        let store: Arc<dyn PlatformStore> = match resolved {
            Self::Memory => Arc::new(MemoryStore::new()),
            #[cfg(feature = "native-keyring")]
            Self::Native => Arc::new(super::KeyringStore::new()),
            #[cfg(not(feature = "native-keyring"))]
            Self::Native => {
                return Err(PlatformError::Unavailable(
                    "native credential store not compiled in (enable the native-keyring feature)"
                        .to_string(),
                ))
            }
            Self::Auto => {
                return Err(PlatformError::Unavailable(
                    "Backend not resolved".to_string(),
                ))
            }
        };

        Ok(match timeout {
            Some(timeout) => Arc::new(TimedStore::new(store, timeout)),
            None => store,
        })
    }
}
