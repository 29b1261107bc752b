//! # Error Types: Disclosure Error Taxonomy
//!
//! Every operation in the workspace reports one of six error kinds. Crate
//! local errors (`CryptoError`, `ResponseError`, `BlobError`, ...) convert
//! into [`SctError`] so that service code can propagate with `?`.
//!
//! ## Kinds
//!
//! - `InvalidInput`: malformed token, missing required answers, malformed
//!   hierarchy reference. Rejects the single operation.
//! - `AlreadySubmitted`: state-machine conflict on a response that has
//!   already left `Pending`.
//! - `IntegrityViolation`: a recomputed hash differs from the stored one.
//!   Terminal finding; never auto-corrected.
//! - `StorageUnavailable`: transient failure talking to the blob store or
//!   repository, including timeouts. The only retryable kind.
//! - `CycleDetected`: the supplier hierarchy contains a parent loop.
//! - `NotFound`: a referenced record does not exist.

use thiserror::Error;

/// Coarse classification of an [`SctError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected input; client error.
    InvalidInput,
    /// Response already left `Pending`.
    AlreadySubmitted,
    /// Stored bytes no longer match the recorded hash.
    IntegrityViolation,
    /// Transient storage failure.
    StorageUnavailable,
    /// Supplier hierarchy loop.
    CycleDetected,
    /// Unknown record.
    NotFound,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::IntegrityViolation => "INTEGRITY_VIOLATION",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::NotFound => "NOT_FOUND",
        };
        f.write_str(s)
    }
}

/// Top-level error type for supply-chain transparency operations.
#[derive(Error, Debug)]
pub enum SctError {
    /// Malformed or unacceptable input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The survey response has already been submitted.
    #[error("survey response {response_id} has already been submitted")]
    AlreadySubmitted {
        /// The response that rejected the transition.
        response_id: String,
    },

    /// Stored document bytes do not match the recorded fingerprint.
    #[error("integrity violation on document {document_id}: expected {expected}, computed {actual}")]
    IntegrityViolation {
        /// The document whose bytes were re-hashed.
        document_id: String,
        /// The hash recorded at upload time.
        expected: String,
        /// The hash recomputed from the stored bytes.
        actual: String,
    },

    /// Blob store or repository could not be reached in time.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The supplier hierarchy contains a parent cycle.
    #[error("supplier hierarchy cycle through {}", members.join(" -> "))]
    CycleDetected {
        /// Supplier ids forming the loop, in parent-walk order.
        members: Vec<String>,
    },

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl SctError {
    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AlreadySubmitted { .. } => ErrorKind::AlreadySubmitted,
            Self::IntegrityViolation { .. } => ErrorKind::IntegrityViolation,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Whether a caller may retry the operation with backoff.
    ///
    /// Only transient storage failures qualify. The core never retries
    /// internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Whether this error is attributable to the caller's request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::AlreadySubmitted { .. } | Self::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for SctError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidInput(format!("malformed JSON: {e}"))
    }
}
