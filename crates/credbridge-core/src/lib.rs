//! Credbridge Core - Secure credential bridge for chat accounts
//!
//! Keeps account passwords in the platform credential store instead of a
//! plaintext accounts file, and loads them back into the host's account
//! records when needed:
//! - Identity: store key derivation (`libpurple/<protocol>/<username>`)
//! - Codec: UTF-16 payload encoding, bounded decoding, contamination repair
//! - Platform: credential store trait and backends
//! - Bridge: store and retrieve operations with memory hygiene
//! - Registry: the host account registry contract
//! - Lifecycle: startup migration and account event handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod platform;
pub mod registry;
mod secure_string;

pub use bridge::{CredentialBridge, StoreOutcome};
pub use config::{preferences, BridgeConfig, PreferenceDescriptor};
pub use error::{
    DecodeError, LifecycleError, PlatformError, RegistryError, RetrieveError, StoreError,
};
pub use identity::{derive_key, AccountIdentity, StoreKey};
pub use lifecycle::{AccountEvent, EventOutcome, Lifecycle, MigrationFailure, MigrationReport};
pub use platform::{CredentialBackend, CredentialEntry, MemoryStore, Persistence, PlatformStore};
pub use registry::{AccountRegistry, FileRegistry, MemoryRegistry};
pub use secure_string::SecureString;

/// Plugin identity as registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    /// Unique plugin id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Plugin version
    pub version: &'static str,
    /// One-line summary
    pub summary: &'static str,
    /// Longer description
    pub description: &'static str,
}

/// Metadata of this plugin
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    id: "core-wincred",
    name: "Windows Credentials",
    version: env!("CARGO_PKG_VERSION"),
    summary: "Save passwords as windows credentials instead of as plaintext",
    description: "Prevents writing passwords to the plaintext accounts file. \
                  Passwords are stored as Windows credentials instead.",
};
