//! # SHA-256 Document Fingerprints
//!
//! `HashEngine` turns document bytes into a [`ContentDigest`] and checks
//! bytes against a previously recorded hex digest.
//!
//! ## Integrity Invariant
//!
//! `verify` never reports a match for an empty or malformed expected value,
//! and compares the raw 32-byte digests in constant time.

use sct_core::ContentDigest;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Stateless SHA-256 fingerprinting of document bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEngine;

impl HashEngine {
    /// Compute the SHA-256 digest of `data`.
    pub fn fingerprint(data: &[u8]) -> ContentDigest {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        ContentDigest::from_bytes(bytes)
    }

    /// Compute the SHA-256 digest of `data` as 64 lowercase hex characters.
    pub fn fingerprint_hex(data: &[u8]) -> String {
        Self::fingerprint(data).to_hex()
    }

    /// Whether `data` hashes to `expected_hex`.
    ///
    /// Hex case is ignored. An empty or malformed `expected_hex` is a
    /// non-match, never an error.
    pub fn verify(data: &[u8], expected_hex: &str) -> bool {
        match ContentDigest::from_hex(expected_hex) {
            Ok(expected) => Self::verify_digest(data, &expected),
            Err(_) => false,
        }
    }

    /// Whether `data` hashes to `expected`, compared in constant time.
    pub fn verify_digest(data: &[u8], expected: &ContentDigest) -> bool {
        Self::fingerprint_and_verify(data, expected).1
    }

    /// Hash `data` once, returning the digest and whether it equals
    /// `expected` (constant-time).
    pub fn fingerprint_and_verify(data: &[u8], expected: &ContentDigest) -> (ContentDigest, bool) {
        let actual = Self::fingerprint(data);
        let matches = bool::from(actual.as_bytes().ct_eq(expected.as_bytes()));
        (actual, matches)
    }
}
