//! Secure payload types with automatic memory zeroing
//!
//! - [`SecureSecret`]: a string payload backed by `secrecy::SecretString`
//! - [`SecureBytes`]: a binary payload that zeroes itself on drop

use secrecy::zeroize::Zeroize;
use secrecy::{ExposeSecret, SecretString};

/// A secret string payload with automatic memory zeroing on drop.
///
/// `Debug` and `Display` print `[REDACTED]`; reading the value requires an
/// explicit [`expose`](Self::expose) call.
#[derive(Clone)]
pub struct SecureSecret {
    inner: SecretString,
}

impl SecureSecret {
    /// Create a new secure secret from a string.
    ///
    /// The string value is moved into secure storage and will be
    /// automatically zeroed when this `SecureSecret` is dropped.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// Expose the secret value for use.
    ///
    /// The exposed value must not be logged or persisted.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Get the length of the secret value without exposing it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Check if the secret value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl From<String> for SecureSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureSecret {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl PartialEq for SecureSecret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SecureSecret {}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// A binary secret payload, zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    /// Wrap a byte buffer.
    #[must_use]
    pub const fn new(value: Vec<u8>) -> Self {
        Self { inner: value }
    }

    /// Expose the raw bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.inner
    }

    /// Number of bytes in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_secret_debug_is_redacted() {
        let secret = SecureSecret::new("my-super-secret-password".to_string());
        let debug_output = format!("{secret:?}");
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("password"));
    }

    #[test]
    fn secure_secret_display_is_redacted() {
        let secret = SecureSecret::from("my-super-secret-password");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn secure_secret_expose_returns_value() {
        let secret = SecureSecret::new("test-value".to_string());
        assert_eq!(secret.expose(), "test-value");
        assert_eq!(secret.len(), 10);
        assert!(!secret.is_empty());
    }

    #[test]
    fn secure_secret_equality_compares_values() {
        assert_eq!(SecureSecret::from("a"), SecureSecret::from("a"));
        assert_ne!(SecureSecret::from("a"), SecureSecret::from("b"));
    }

    #[test]
    fn secure_bytes_debug_shows_length_only() {
        let bytes = SecureBytes::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(format!("{bytes:?}"), "[REDACTED 4 bytes]");
        assert_eq!(bytes.expose(), &[0xde, 0xad, 0xbe, 0xef]);
    }
}
