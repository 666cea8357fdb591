//! Account identity and store key derivation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace every store key starts with
pub const KEY_NAMESPACE: &str = "libpurple";

/// Separator between the namespace, protocol and username
pub const KEY_SEPARATOR: char = '/';

/// A chat account as seen by the credential store
///
/// Only used to derive a [`StoreKey`]; the identity itself is never persisted
/// by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Protocol identifier (e.g., "prpl-aim")
    pub protocol: String,
    /// Account username
    pub username: String,
}

impl AccountIdentity {
    /// Create a new identity
    #[must_use]
    pub fn new(protocol: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            username: username.into(),
        }
    }

    /// Derive the store key for this identity
    #[must_use]
    pub fn store_key(&self) -> StoreKey {
        derive_key(self)
    }

    /// Whether the derived key can be mapped back to exactly one identity.
    ///
    /// A separator inside the protocol identifier makes the split point
    /// ambiguous; usernames may contain it freely.
    #[must_use]
    pub fn is_unambiguous(&self) -> bool {
        !self.protocol.contains(KEY_SEPARATOR)
    }
}

impl fmt::Display for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.username)
    }
}

/// Name of one credential entry in the platform store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    /// The key text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the store key `libpurple/<protocol>/<username>`
#[must_use]
pub fn derive_key(identity: &AccountIdentity) -> StoreKey {
    StoreKey(format!(
        "{KEY_NAMESPACE}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
        identity.protocol, identity.username
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_format() {
        let identity = AccountIdentity::new("aim", "alice@example.com");
        assert_eq!(derive_key(&identity).as_str(), "libpurple/aim/alice@example.com");
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let a = AccountIdentity::new("prpl-jabber", "bob@jabber.org/home");
        let b = AccountIdentity::new("prpl-jabber", "bob@jabber.org/home");
        assert_eq!(derive_key(&a), derive_key(&b));
        assert_eq!(a.store_key(), derive_key(&a));
    }

    #[test]
    fn test_distinct_identities_distinct_keys() {
        let identities = [
            AccountIdentity::new("aim", "alice"),
            AccountIdentity::new("aim", "bob"),
            AccountIdentity::new("icq", "alice"),
            AccountIdentity::new("aim", "alice/"),
            AccountIdentity::new("aim", ""),
        ];

        for (i, a) in identities.iter().enumerate() {
            for b in identities.iter().skip(i + 1) {
                assert_ne!(derive_key(a), derive_key(b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_ambiguous_protocol() {
        assert!(AccountIdentity::new("aim", "a/b").is_unambiguous());
        // "a/b" + "c" and "a" + "b/c" share a key
        let left = AccountIdentity::new("a/b", "c");
        let right = AccountIdentity::new("a", "b/c");
        assert!(!left.is_unambiguous());
        assert_eq!(derive_key(&left), derive_key(&right));
    }
}
