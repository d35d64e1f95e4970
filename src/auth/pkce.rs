//! PKCE verifier/challenge generation.
//!
//! The login flow uses the S256 proof-key-for-code-exchange variant: a
//! random code verifier is generated per flow, its SHA-256 digest (URL-safe
//! base64, unpadded) is sent as the challenge with the authorize request,
//! and the verifier itself is revealed only in the final token exchange.

use base64::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// A PKCE code verifier and its derived S256 challenge.
///
/// # Example
///
/// ```rust
/// use ikea_api::auth::CodeVerifier;
///
/// let verifier = CodeVerifier::new();
/// assert_eq!(verifier.as_ref().len(), 43);
/// assert!(!verifier.challenge().contains('='));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeVerifier(String);

// Verify CodeVerifier is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CodeVerifier>();
};

impl CodeVerifier {
    /// Verifier length in characters (RFC 7636 allows 43-128).
    const LENGTH: usize = 43;

    /// Generates a fresh random verifier.
    #[must_use]
    pub fn new() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LENGTH)
            .map(char::from)
            .collect();
        Self(value)
    }

    /// Returns the S256 challenge: unpadded URL-safe base64 of the SHA-256
    /// digest of the verifier.
    #[must_use]
    pub fn challenge(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        BASE64_URL_SAFE_NO_PAD.encode(digest)
    }
}

impl Default for CodeVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for CodeVerifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates a random alphanumeric state nonce for the authorize request.
#[must_use]
pub fn state_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_is_43_alphanumeric_chars() {
        let verifier = CodeVerifier::new();
        assert_eq!(verifier.as_ref().len(), 43);
        assert!(verifier.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_verifiers_are_unique() {
        assert_ne!(CodeVerifier::new(), CodeVerifier::new());
    }

    #[test]
    fn test_challenge_is_deterministic_sha256() {
        let verifier = CodeVerifier("a".repeat(43));
        // SHA-256 digest is 32 bytes -> 43 base64url chars without padding.
        let challenge = verifier.challenge();
        assert_eq!(challenge, verifier.challenge());
        assert_eq!(challenge.len(), 43);
        assert!(!challenge.contains('='));
        assert!(!challenge.contains('+'));
        assert!(!challenge.contains('/'));
    }

    #[test]
    fn test_known_challenge_vector() {
        // RFC 7636 appendix B vector.
        let verifier = CodeVerifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(
            verifier.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_state_nonce_length() {
        assert_eq!(state_nonce().len(), 24);
    }
}
