//! Plugin lifecycle
//!
//! Drives the bridge from host events: a startup pass over every account
//! (rehydrating stored secrets and migrating plaintext ones), then
//! sign-on and connection events for the rest of the session.

#[cfg(test)]
mod tests;

use crate::bridge::{CredentialBridge, StoreOutcome};
use crate::error::{LifecycleError, RetrieveError};
use crate::identity::AccountIdentity;
use crate::registry::AccountRegistry;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Host events forwarded to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// Account signed on: its secret is known to be valid
    SignedOn(AccountIdentity),
    /// Account is about to connect and needs its secret
    Connecting(AccountIdentity),
}

impl AccountEvent {
    /// Host signal name for this event
    #[must_use]
    pub fn signal(&self) -> &'static str {
        match self {
            Self::SignedOn(_) => "account-signed-on",
            Self::Connecting(_) => "account-connecting",
        }
    }

    /// Account the event is about
    #[must_use]
    pub fn account(&self) -> &AccountIdentity {
        match self {
            Self::SignedOn(account) | Self::Connecting(account) => account,
        }
    }
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Secret written to the platform store (or skipped when absent)
    Stored(StoreOutcome),
    /// Secret read from the platform store into the registry
    Rehydrated,
    /// Registry already held a secret; nothing read
    AlreadyPresent,
    /// Platform store has no secret for the account
    NotFound,
}

/// An account the startup pass could not handle
#[derive(Debug, Clone, Serialize)]
pub struct MigrationFailure {
    /// Affected account
    pub account: AccountIdentity,
    /// Error description (never contains the secret)
    pub error: String,
}

/// Summary of the startup pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    /// Secrets loaded from the platform store
    pub rehydrated: Vec<AccountIdentity>,
    /// Plaintext secrets moved into the platform store
    pub migrated: Vec<AccountIdentity>,
    /// Accounts with no secret anywhere
    pub missing: Vec<AccountIdentity>,
    /// Accounts that hit an error
    pub failed: Vec<MigrationFailure>,
}

impl MigrationReport {
    /// Whether every account was handled without error
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn fail(&mut self, account: AccountIdentity, error: &dyn std::fmt::Display) {
        warn!(account = %account, error = %error, "Startup pass failed for account");
        self.failed.push(MigrationFailure {
            account,
            error: error.to_string(),
        });
    }
}

/// Owns the bridge and the host's account registry for a plugin session
pub struct Lifecycle<R: AccountRegistry> {
    bridge: CredentialBridge,
    registry: R,
}

impl<R: AccountRegistry> Lifecycle<R> {
    /// Create a lifecycle over `registry`
    pub fn new(bridge: CredentialBridge, registry: R) -> Self {
        Self { bridge, registry }
    }

    /// The bridge in use
    pub fn bridge(&self) -> &CredentialBridge {
        &self.bridge
    }

    /// The account registry
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the account registry
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Give the registry back to the host
    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Startup pass over every registered account.
    ///
    /// Stored secrets are loaded into the registry. Accounts with nothing
    /// stored but a plaintext-remembered secret are migrated: the secret is
    /// stored and the remember flag cleared once the write succeeded, then
    /// the secret still held in memory is republished. An account whose read
    /// failed is left untouched.
    pub fn load(&mut self) -> MigrationReport {
        let mut report = MigrationReport::default();
        let mut not_found = Vec::new();

        for account in self.registry.accounts() {
            match self.rehydrate(&account) {
                Ok(true) => report.rehydrated.push(account),
                Ok(false) => not_found.push(account),
                Err(e) => report.fail(account, &e),
            }
        }

        for account in not_found {
            if !self.registry.remember_secret(&account) {
                report.missing.push(account);
                continue;
            }
            match self.bridge.store_account(&mut self.registry, &account) {
                Ok(StoreOutcome::Stored) => {
                    self.registry.set_remember_secret(&account, false);
                    if let Some(secret) = self.registry.secret(&account) {
                        self.registry.publish_secret(&account, secret);
                    }
                    report.migrated.push(account);
                }
                Ok(StoreOutcome::Skipped) => report.missing.push(account),
                Err(e) => report.fail(account, &e),
            }
        }

        info!(
            rehydrated = report.rehydrated.len(),
            migrated = report.migrated.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "Credential startup pass finished"
        );
        report
    }

    /// Dispatch a host event
    pub fn handle(&mut self, event: &AccountEvent) -> Result<EventOutcome, LifecycleError> {
        debug!(signal = event.signal(), account = %event.account(), "Handling account event");
        match event {
            AccountEvent::SignedOn(account) => self.on_signed_on(account),
            AccountEvent::Connecting(account) => self.on_connecting(account),
        }
    }

    /// Store the secret the account just signed on with
    pub fn on_signed_on(&mut self, account: &AccountIdentity) -> Result<EventOutcome, LifecycleError> {
        let outcome = self.bridge.store_account(&mut self.registry, account)?;
        Ok(EventOutcome::Stored(outcome))
    }

    /// Make sure a connecting account has its secret
    pub fn on_connecting(&mut self, account: &AccountIdentity) -> Result<EventOutcome, LifecycleError> {
        if self.registry.has_secret(account) {
            return Ok(EventOutcome::AlreadyPresent);
        }
        if self.rehydrate(account)? {
            Ok(EventOutcome::Rehydrated)
        } else {
            Ok(EventOutcome::NotFound)
        }
    }

    fn rehydrate(&mut self, account: &AccountIdentity) -> Result<bool, RetrieveError> {
        let Some(secret) = self.bridge.retrieve(account)? else {
            return Ok(false);
        };
        self.registry.set_remember_secret(account, false);
        self.registry.publish_secret(account, secret);
        debug!(account = %account, "Secret loaded into registry");
        Ok(true)
    }
}
