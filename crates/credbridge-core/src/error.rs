//! Error types for credbridge-core
//!
//! A missing credential is not an error: retrieval reports it as `Ok(None)`.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a platform credential store
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The store cannot be used on this system
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the call
    #[error("credential store error: {0}")]
    Backend(String),

    /// The call did not finish within the configured bound
    #[error("credential store call timed out after {0:?}")]
    TimedOut(Duration),
}

/// Payload bytes that do not form valid UTF-16 text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload ends in the middle of a code unit
    #[error("payload of {bytes} bytes is not a whole number of UTF-16 code units")]
    OddLength {
        /// Payload size in bytes
        bytes: usize,
    },

    /// Unpaired surrogate in the payload
    #[error("unpaired UTF-16 surrogate at code unit {offset}")]
    InvalidUtf16 {
        /// Index of the offending code unit
        offset: usize,
    },
}

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Secret would not survive the bounded read on retrieval
    #[error("secret is {units} UTF-16 code units, maximum is {max}")]
    SecretTooLong {
        /// Encoded length in code units
        units: usize,
        /// Maximum storable length
        max: usize,
    },

    /// Platform write failed; the secret stays in application memory
    #[error("failed to write credential: {0}")]
    WriteFailed(#[source] PlatformError),
}

/// Retrieve operation errors
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Platform read failed (distinct from a missing entry)
    #[error("failed to read credential: {0}")]
    ReadFailed(#[source] PlatformError),

    /// Stored payload is not valid text
    #[error("failed to decode credential: {0}")]
    DecodeFailed(#[from] DecodeError),
}

/// Account registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Accounts file could not be read or written
    #[error("accounts file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Accounts file is not valid TOML for the expected layout
    #[error("accounts file parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Accounts could not be serialized
    #[error("accounts file serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No account with this identity is registered
    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for retrieve operations
pub type RetrieveResult<T> = std::result::Result<T, RetrieveError>;

/// Lifecycle event handling errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Storing the account's secret failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Retrieving the account's secret failed
    #[error(transparent)]
    Retrieve(#[from] RetrieveError),
}
