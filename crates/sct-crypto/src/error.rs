//! # Cryptographic Error Types

use sct_core::SctError;
use thiserror::Error;

/// Errors from cryptographic operations in `sct-crypto`.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The operating system's random source failed.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// A freshly minted token failed shape validation.
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

impl From<CryptoError> for SctError {
    fn from(e: CryptoError) -> Self {
        match e {
            // An entropy failure is an environment fault, not a caller fault.
            CryptoError::RandomSource(msg) => SctError::StorageUnavailable(msg),
            CryptoError::MalformedToken(msg) => SctError::InvalidInput(msg),
        }
    }
}
