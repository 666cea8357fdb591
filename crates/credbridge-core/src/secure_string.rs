//! Secret text that is wiped from memory when dropped

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An account secret held in process memory
///
/// Zeroized on drop. `Debug` and `Display` never show the value, so a
/// secret can travel through `tracing` fields without leaking.
///
/// # Example
///
/// ```
/// use credbridge_core::SecureString;
///
/// let secret = SecureString::new("p@ss/word");
/// assert_eq!(secret.expose(), "p@ss/word");
/// assert!(!format!("{:?}", secret).contains("p@ss"));
/// ```
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Wrap a secret value
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Borrow the secret text
    ///
    /// Keep the borrow short; do not copy it into plain `String`s.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Length in UTF-8 bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Number of UTF-16 code units the secret encodes to
    #[must_use]
    pub fn utf16_len(&self) -> usize {
        self.inner.encode_utf16().count()
    }

    /// Check if the secret is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Wipe the value now instead of waiting for drop
    pub fn clear(&mut self) {
        self.inner.zeroize();
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString([REDACTED, {} bytes])", self.inner.len())
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.inner.as_bytes().ct_eq(other.inner.as_bytes()).into()
    }
}

impl Eq for SecureString {}
