//! # Access Token Issuance
//!
//! An access token is the only credential a supplier needs to reach the
//! supplier portal, so it must be unguessable: 32 bytes from the operating
//! system's CSPRNG, hex-encoded to 64 lowercase characters.

use rand::rngs::OsRng;
use rand::RngCore;
use sct_core::AccessToken;
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

/// Mints single-use access tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    /// Mint a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomSource`] if the OS random source fails.
    /// Never falls back to a weaker generator.
    pub fn issue() -> Result<AccessToken, CryptoError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "OS random source failed while issuing token");
            CryptoError::RandomSource(e.to_string())
        })?;
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        AccessToken::new(hex).map_err(|e| CryptoError::MalformedToken(e.to_string()))
    }
}

/// Compare a presented token string with a stored token in constant time.
///
/// Length mismatches return `false` without inspecting content.
pub fn tokens_match(presented: &str, stored: &AccessToken) -> bool {
    bool::from(presented.as_bytes().ct_eq(stored.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn issued_token_is_64_lowercase_hex() {
        let token = TokenIssuer::issue().unwrap();
        assert_eq!(token.as_str().len(), 64);
        assert!(token
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn issued_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..256)
            .map(|_| TokenIssuer::issue().unwrap().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 256);
    }

    #[test]
    fn tokens_match_exact_only() {
        let token = TokenIssuer::issue().unwrap();
        assert!(tokens_match(token.as_str(), &token));
        assert!(!tokens_match(&token.as_str().to_uppercase(), &token));
        assert!(!tokens_match(&token.as_str()[..63], &token));
        assert!(!tokens_match("", &token));
    }
}
