//! # sct-crypto: Cryptographic Primitives
//!
//! Provides the two cryptographic building blocks of the disclosure flow:
//!
//! - **HashEngine**: SHA-256 fingerprints of document bytes, and
//!   constant-time verification against a recorded hex digest.
//! - **TokenIssuer**: 256-bit access tokens drawn from the operating
//!   system's CSPRNG, rendered as 64 lowercase hex characters.
//!
//! Token comparison also lives here ([`tokens_match`]) so every secret
//! comparison in the workspace goes through `subtle`.
//!
//! ## Crate Policy
//!
//! - Depends only on `sct-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   SHA-256 and real OS randomness.

pub mod error;
pub mod sha256;
pub mod token;

pub use error::CryptoError;
pub use sha256::HashEngine;
pub use token::{tokens_match, TokenIssuer};
