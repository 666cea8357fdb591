//! Credential entry types

use crate::codec::{encode_secret, CODE_UNIT_BYTES};
use crate::identity::StoreKey;
use crate::secure_string::SecureString;
use zeroize::Zeroizing;

/// How long an entry persists, and where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Survives reboot, scoped to the local machine and user
    LocalMachine,
    /// Survives reboot and roams with a domain user profile
    Enterprise,
}

impl std::fmt::Display for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalMachine => write!(f, "local machine"),
            Self::Enterprise => write!(f, "enterprise (roaming)"),
        }
    }
}

/// Entry type in the platform store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Generic credential with an opaque payload
    Generic,
}

/// One record in the platform credential store
///
/// The payload is wiped when the entry is dropped.
#[derive(Clone)]
pub struct CredentialEntry {
    /// Target name the entry is keyed by
    pub target: StoreKey,
    /// Principal recorded with the entry
    pub principal: StoreKey,
    /// Persistence scope
    pub persistence: Persistence,
    /// Entry type
    pub kind: EntryKind,
    payload: Zeroizing<Vec<u8>>,
}

impl CredentialEntry {
    /// Build the entry for a secret, encoded as UTF-16LE
    #[must_use]
    pub fn for_secret(key: StoreKey, secret: &SecureString) -> Self {
        Self::from_payload(key, encode_secret(secret))
    }

    /// Build an entry around a payload read back from a store
    #[must_use]
    pub fn from_payload(key: StoreKey, payload: impl Into<Zeroizing<Vec<u8>>>) -> Self {
        Self {
            principal: key.clone(),
            target: key,
            persistence: Persistence::LocalMachine,
            kind: EntryKind::Generic,
            payload: payload.into(),
        }
    }

    /// Same entry with a different persistence scope
    #[must_use]
    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = persistence;
        self
    }

    /// Raw payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Declared payload size in bytes
    #[must_use]
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Payload size in UTF-16 code units (rounded down)
    #[must_use]
    pub fn code_units(&self) -> usize {
        self.payload.len() / CODE_UNIT_BYTES
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("target", &self.target)
            .field("principal", &self.principal)
            .field("persistence", &self.persistence)
            .field("kind", &self.kind)
            .field("payload", &format_args!("[REDACTED, {} bytes]", self.payload.len()))
            .finish()
    }
}
