//! # Content Digest: Document Fingerprints
//!
//! `ContentDigest` is the 32-byte SHA-256 fingerprint of a document's exact
//! uploaded bytes. On the wire and in the repository it is always 64
//! lowercase hex characters.
//!
//! This crate only defines the value type. Computing a digest is the job of
//! `sct_crypto::HashEngine`, which keeps the hashing dependency out of the
//! leaf crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes in a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// Reasons a hex string cannot be read as a digest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestParseError {
    /// Wrong number of characters.
    #[error("digest must be 64 hex chars, got {0} chars")]
    Length(usize),
    /// A character outside `[0-9a-fA-F]`.
    #[error("digest contains non-hex character {0:?}")]
    NonHex(char),
}

/// A SHA-256 digest of a document's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a hex digest. Uppercase hex is accepted; the stored form is
    /// always lowercase.
    pub fn from_hex(hex: &str) -> Result<Self, DigestParseError> {
        let hex = hex.trim();
        if hex.len() != DIGEST_LEN * 2 {
            return Err(DigestParseError::Length(hex.len()));
        }
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(DigestParseError::NonHex(bad));
        }
        let mut out = [0u8; DIGEST_LEN];
        for (i, pair) in hex.as_bytes().chunks_exact(2).enumerate() {
            out[i] = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
        }
        Ok(Self(out))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Caller has already checked `b` is an ASCII hex digit.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for ContentDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hex_roundtrip_is_lowercase() {
        let d = ContentDigest::from_hex(&EMPTY_SHA256.to_uppercase()).unwrap();
        assert_eq!(d.to_hex(), EMPTY_SHA256);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ContentDigest::from_hex("abc"),
            Err(DigestParseError::Length(3))
        );
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("{}z", &EMPTY_SHA256[..63]);
        assert_eq!(
            ContentDigest::from_hex(&bad),
            Err(DigestParseError::NonHex('z'))
        );
    }

    #[test]
    fn rejects_multibyte_input_without_panicking() {
        let bad: String = std::iter::repeat('é').take(32).collect();
        assert!(ContentDigest::from_hex(&bad).is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let d = ContentDigest::from_hex(EMPTY_SHA256).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{EMPTY_SHA256}\""));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
