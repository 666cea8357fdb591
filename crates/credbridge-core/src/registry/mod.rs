//! Account registry contract
//!
//! The host application owns account records; the bridge and lifecycle only
//! read and update them through [`AccountRegistry`].
//! - [`MemoryRegistry`]: in-process records with change observers
//! - [`FileRegistry`]: TOML accounts file holding plaintext passwords

mod file;
mod memory;


pub use file::FileRegistry;
pub use memory::{MemoryRegistry, SecretObserver};

use crate::identity::AccountIdentity;
use crate::secure_string::SecureString;

/// Accounts known to the host application
pub trait AccountRegistry {
    /// All registered accounts
    fn accounts(&self) -> Vec<AccountIdentity>;

    /// The account's in-memory secret, if any
    fn secret(&self, account: &AccountIdentity) -> Option<SecureString>;

    /// Replace (or release, with `None`) the account's in-memory secret
    fn set_secret(&mut self, account: &AccountIdentity, secret: Option<SecureString>);

    /// Whether the host saves this account's secret in plaintext
    fn remember_secret(&self, account: &AccountIdentity) -> bool;

    /// Change the plaintext remember flag
    fn set_remember_secret(&mut self, account: &AccountIdentity, remember: bool);

    /// Whether the account currently holds a non-empty secret
    fn has_secret(&self, account: &AccountIdentity) -> bool {
        self.secret(account).is_some_and(|s| !s.is_empty())
    }

    /// Set a secret so that observers reacting only to value changes fire
    /// even when the new value equals the current one.
    ///
    /// An empty placeholder is set first; a published secret is never empty.
    fn publish_secret(&mut self, account: &AccountIdentity, secret: SecureString) {
        self.set_secret(account, Some(SecureString::default()));
        self.set_secret(account, Some(secret));
    }
}
