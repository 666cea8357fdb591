//! Accounts file registry
//!
//! The plaintext accounts file the bridge migrates secrets out of. A
//! password is written back only for accounts that still remember it, so
//! saving after migration removes the plaintext copy from disk.

use super::memory::MemoryRegistry;
use super::AccountRegistry;
use crate::error::RegistryError;
use crate::identity::AccountIdentity;
use crate::secure_string::SecureString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default, rename = "account")]
    accounts: Vec<AccountEntry>,
}

#[derive(Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct AccountEntry {
    protocol: String,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default)]
    remember_password: bool,
}

impl std::fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountEntry")
            .field("protocol", &self.protocol)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("remember_password", &self.remember_password)
            .finish()
    }
}

/// Registry backed by a TOML accounts file
pub struct FileRegistry {
    path: PathBuf,
    inner: MemoryRegistry,
}

impl FileRegistry {
    /// Start an empty registry that will be saved to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryRegistry::new(),
        }
    }

    /// Load accounts from `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let content = Zeroizing::new(fs::read_to_string(&path)?);
        let mut file: AccountsFile = toml::from_str(&content)?;

        let mut registry = Self::new(path);
        for entry in &mut file.accounts {
            let account = AccountIdentity::new(
                std::mem::take(&mut entry.protocol),
                std::mem::take(&mut entry.username),
            );
            let secret = entry.password.take().map(SecureString::new);
            registry.inner.add_account(account, secret, entry.remember_password);
        }

        info!(path = %registry.path.display(), accounts = registry.inner.records.len(), "Loaded accounts file");
        Ok(registry)
    }

    /// Write the accounts back to disk
    pub fn save(&self) -> Result<(), RegistryError> {
        let file = AccountsFile {
            accounts: self
                .inner
                .records
                .iter()
                .map(|(account, record)| AccountEntry {
                    protocol: account.protocol.clone(),
                    username: account.username.clone(),
                    password: record
                        .secret
                        .as_ref()
                        .filter(|_| record.remember)
                        .map(|s| s.expose().to_string()),
                    remember_password: record.remember,
                })
                .collect(),
        };
        let content = Zeroizing::new(toml::to_string_pretty(&file)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content.as_bytes())?;

        debug!(path = %self.path.display(), "Saved accounts file");
        Ok(())
    }

    /// Location of the accounts file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register an account
    pub fn add_account(
        &mut self,
        account: AccountIdentity,
        secret: Option<SecureString>,
        remember: bool,
    ) {
        self.inner.add_account(account, secret, remember);
    }

    /// Look up an account, failing if it is not registered
    pub fn require(&self, account: &AccountIdentity) -> Result<(), RegistryError> {
        if self.inner.contains(account) {
            Ok(())
        } else {
            Err(RegistryError::UnknownAccount(account.to_string()))
        }
    }
}

impl AccountRegistry for FileRegistry {
    fn accounts(&self) -> Vec<AccountIdentity> {
        self.inner.accounts()
    }

    fn secret(&self, account: &AccountIdentity) -> Option<SecureString> {
        self.inner.secret(account)
    }

    fn set_secret(&mut self, account: &AccountIdentity, secret: Option<SecureString>) {
        self.inner.set_secret(account, secret);
    }

    fn remember_secret(&self, account: &AccountIdentity) -> bool {
        self.inner.remember_secret(account)
    }

    fn set_remember_secret(&mut self, account: &AccountIdentity, remember: bool) {
        self.inner.set_remember_secret(account, remember);
    }
}
