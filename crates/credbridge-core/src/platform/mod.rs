//! Platform credential store
//!
//! The bridge talks to the store through [`PlatformStore`]:
//! - Native backend (Windows Credential Manager via `keyring`)
//! - In-memory backend for tests and dry runs
//! - [`TimedStore`] wrapper bounding every blocking call

mod backend;
mod entry;
#[cfg(feature = "native-keyring")]
mod native;
mod memory;
mod timed;

pub use backend::CredentialBackend;
pub use entry::{CredentialEntry, EntryKind, Persistence};
#[cfg(feature = "native-keyring")]
pub use native::KeyringStore;
pub use memory::MemoryStore;
pub use timed::TimedStore;

use crate::error::PlatformError;
use crate::identity::StoreKey;

/// A platform-managed secure credential store
///
/// Writes overwrite any existing entry for the same target. A missing entry
/// on read is `Ok(None)`, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformStore: Send + Sync {
    /// Write or overwrite the entry named by `entry.target`
    fn write(&self, entry: &CredentialEntry) -> Result<(), PlatformError>;

    /// Read the generic entry named `key`
    fn read(&self, key: &StoreKey) -> Result<Option<CredentialEntry>, PlatformError>;

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Scope an entry written with `requested` persistence actually gets
    fn persistence(&self, requested: Persistence) -> Persistence {
        requested
    }
}
