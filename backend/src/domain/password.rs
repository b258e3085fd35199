//! Password digests.
//!
//! The stored credential is a SHA-256 hex digest of the password, matching
//! the records written by earlier deployments against the same store.
//! Plaintext passwords are wrapped so they are wiped on drop.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Plaintext password held only long enough to digest or verify.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    /// Wrap a plaintext password.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Whether the password meets the minimum length requirement.
    pub fn is_long_enough(&self) -> bool {
        self.0.chars().count() >= PASSWORD_MIN_LEN
    }

    /// Compute the stored digest for this password.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compare this password against a stored digest.
    pub fn matches(&self, stored_digest: &str) -> bool {
        self.digest() == stored_digest
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_sha256_hex() {
        // Precomputed SHA-256 of "secret1".
        assert_eq!(
            Password::new("secret1").digest(),
            "5b11618c2e44027877d0cd0921ed166b9f176f50587fc91e7534dd2946db77d6"
        );
    }

    #[test]
    fn matches_accepts_only_the_same_password() {
        let stored = Password::new("correctpass").digest();
        assert!(Password::new("correctpass").matches(&stored));
        assert!(!Password::new("wrongpass").matches(&stored));
    }

    #[test]
    fn length_rule_counts_characters() {
        assert!(!Password::new("ab1").is_long_enough());
        assert!(Password::new("abc123").is_long_enough());
    }

    #[test]
    fn debug_never_prints_the_plaintext() {
        let rendered = format!("{:?}", Password::new("secret1"));
        assert!(!rendered.contains("secret1"));
    }
}
