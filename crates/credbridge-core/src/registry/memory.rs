//! In-process account registry

use super::AccountRegistry;
use crate::identity::AccountIdentity;
use crate::secure_string::SecureString;
use std::collections::BTreeMap;
use tracing::debug;

/// Callback fired when an account's secret changes value
pub type SecretObserver = Box<dyn FnMut(&AccountIdentity) + Send>;

#[derive(Debug, Default, Clone)]
pub(crate) struct AccountRecord {
    pub(crate) secret: Option<SecureString>,
    pub(crate) remember: bool,
}

/// Account records held in memory
///
/// Observers are notified only when a secret actually changes, the way host
/// UIs react to account updates.
#[derive(Default)]
pub struct MemoryRegistry {
    pub(crate) records: BTreeMap<AccountIdentity, AccountRecord>,
    observers: Vec<SecretObserver>,
}

impl MemoryRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account
    pub fn add_account(
        &mut self,
        account: AccountIdentity,
        secret: Option<SecureString>,
        remember: bool,
    ) {
        self.records.insert(account, AccountRecord { secret, remember });
    }

    /// Builder-style [`add_account`](Self::add_account)
    #[must_use]
    pub fn with_account(
        mut self,
        account: AccountIdentity,
        secret: Option<&str>,
        remember: bool,
    ) -> Self {
        self.add_account(account, secret.map(SecureString::new), remember);
        self
    }

    /// Subscribe to secret changes
    pub fn observe(&mut self, observer: SecretObserver) {
        self.observers.push(observer);
    }

    /// Whether the account is registered
    pub fn contains(&self, account: &AccountIdentity) -> bool {
        self.records.contains_key(account)
    }
}

impl AccountRegistry for MemoryRegistry {
    fn accounts(&self) -> Vec<AccountIdentity> {
        self.records.keys().cloned().collect()
    }

    fn secret(&self, account: &AccountIdentity) -> Option<SecureString> {
        self.records.get(account).and_then(|r| r.secret.clone())
    }

    fn set_secret(&mut self, account: &AccountIdentity, secret: Option<SecureString>) {
        let Some(record) = self.records.get_mut(account) else {
            debug!(account = %account, "Ignoring secret update for unknown account");
            return;
        };
        if record.secret == secret {
            record.secret = secret;
            return;
        }
        record.secret = secret;
        for observer in &mut self.observers {
            observer(account);
        }
    }

    fn remember_secret(&self, account: &AccountIdentity) -> bool {
        self.records.get(account).is_some_and(|r| r.remember)
    }

    fn set_remember_secret(&mut self, account: &AccountIdentity, remember: bool) {
        if let Some(record) = self.records.get_mut(account) {
            record.remember = remember;
        }
    }
}
