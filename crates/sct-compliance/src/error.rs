use sct_core::SctError;
use thiserror::Error;

/// Errors from registration checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComplianceError {
    /// The GSTIN does not match the 15-character layout.
    #[error("invalid GSTIN format: {0:?}")]
    InvalidGstin(String),

    /// The GSTIN's first two digits are not a known state code.
    #[error("invalid state code {code:?} in GSTIN")]
    UnknownStateCode { code: String },

    /// The Udyam number does not match `UDYAM-XX-00-0000000`.
    #[error("invalid Udyam registration number: {0:?}")]
    InvalidUdyam(String),

    /// The lookup service answered but has no active registration.
    #[error("GSTIN {0} not found or inactive")]
    NotRegistered(String),

    /// The lookup service could not be reached.
    #[error("GST lookup service unavailable: {reason}")]
    ServiceUnavailable { reason: String },
}

impl From<ComplianceError> for SctError {
    fn from(e: ComplianceError) -> Self {
        match e {
            ComplianceError::ServiceUnavailable { reason } => SctError::StorageUnavailable(reason),
            ComplianceError::NotRegistered(gstin) => {
                SctError::NotFound(format!("GST registration {gstin}"))
            }
            other => SctError::InvalidInput(other.to_string()),
        }
    }
}
