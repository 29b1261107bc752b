//! # Identity Newtypes
//!
//! Identifier newtypes for every disclosure record. Each identifier is a
//! distinct type; you cannot pass a [`SupplierId`] where a [`ProductId`]
//! is expected.
//!
//! ## Validation
//!
//! UUID-based identifiers are always valid by construction. [`AccessToken`]
//! and [`QuestionId`] are string newtypes that validate on construction and
//! on deserialization, so an invalid value can never enter the model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SctError;

/// Routes `Deserialize` for a validated string newtype through its `new()`
/// constructor so invalid values are rejected at the boundary.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Declares a UUID-backed identifier with the common constructors.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $ty:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(Uuid);

        impl $ty {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = SctError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| SctError::InvalidInput(format!(
                        concat!("invalid ", $prefix, " id {:?}: {}"),
                        s, e
                    )))
            }
        }
    };
}

uuid_identifier!(
    /// A product owned by the manufacturer; root of the transparency computation.
    ProductId,
    "product"
);
uuid_identifier!(
    /// A supplier in one product's supply chain.
    SupplierId,
    "supplier"
);
uuid_identifier!(
    /// A questionnaire sent to suppliers of one product.
    SurveyId,
    "survey"
);
uuid_identifier!(
    /// One supplier's response to one survey.
    ResponseId,
    "response"
);
uuid_identifier!(
    /// An evidence document attached to a response.
    DocumentId,
    "document"
);
uuid_identifier!(
    /// A point-in-time transparency report.
    ReportId,
    "report"
);

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// Length of an access token in hex characters (256 bits).
pub const ACCESS_TOKEN_HEX_LEN: usize = 64;

/// A single-use bearer capability granting access to one survey response.
///
/// Always 64 lowercase hexadecimal characters. Tokens are minted by
/// `sct_crypto::TokenIssuer`; this type only enforces the shape. The
/// `Debug` impl redacts the value so tokens never reach log output.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl_validating_deserialize!(AccessToken);

impl AccessToken {
    /// Validate and wrap a token string.
    ///
    /// Uppercase hex is rejected rather than normalized: the token is an
    /// exact capability string.
    pub fn new(raw: impl Into<String>) -> Result<Self, SctError> {
        let raw = raw.into();
        if raw.len() != ACCESS_TOKEN_HEX_LEN {
            return Err(SctError::InvalidInput(format!(
                "access token must be {ACCESS_TOKEN_HEX_LEN} hex chars, got {}",
                raw.len()
            )));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(SctError::InvalidInput(
                "access token must be lowercase hexadecimal".into(),
            ));
        }
        Ok(Self(raw))
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token as raw ASCII bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl std::str::FromStr for AccessToken {
    type Err = SctError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// QuestionId
// ---------------------------------------------------------------------------

/// Identifier of a question within a survey, chosen by the survey author.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl_validating_deserialize!(QuestionId);

impl QuestionId {
    /// Create a question id; must be non-empty after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, SctError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SctError::InvalidInput("question id must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
