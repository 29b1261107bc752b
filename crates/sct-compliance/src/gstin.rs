//! # GSTIN Validation and Lookup
//!
//! A GSTIN is 15 characters:
//!
//! ```text
//!  27  AAPFU0939F  1   Z   V
//!  │   │           │   │   └ check character   [0-9A-Z]
//!  │   │           │   └──── fixed 'Z'
//!  │   │           └──────── entity number      [1-9A-Z]
//!  │   └──────────────────── PAN: 5 letters, 4 digits, 1 letter
//!  └──────────────────────── state code         2 digits
//! ```
//!
//! The state code must appear in the published state table. Input is
//! trimmed but never case-folded: a lowercase GSTIN is invalid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComplianceError;

/// Length of a GSTIN in characters.
pub const GSTIN_LEN: usize = 15;

/// GST state codes and names.
const STATE_CODES: &[(&str, &str)] = &[
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli"),
    ("27", "Maharashtra"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
];

/// State name for a two-digit GST state code.
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// A GSTIN whose layout and state code have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Gstin(String);

impl<'de> Deserialize<'de> for Gstin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl Gstin {
    /// Validate a GSTIN.
    pub fn parse(raw: &str) -> Result<Self, ComplianceError> {
        let s = raw.trim();
        if !has_gstin_layout(s) {
            return Err(ComplianceError::InvalidGstin(s.to_string()));
        }
        let code = &s[..2];
        if state_name(code).is_none() {
            return Err(ComplianceError::UnknownStateCode {
                code: code.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Whether `raw` has a valid layout and state code.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit state code.
    pub fn state_code(&self) -> &str {
        &self.0[..2]
    }

    /// Registered state name.
    pub fn state_name(&self) -> &'static str {
        state_name(self.state_code()).unwrap_or_default()
    }

    /// The embedded PAN (characters 3 to 12).
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn has_gstin_layout(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == GSTIN_LEN
        && b[..2].iter().all(u8::is_ascii_digit)
        && b[2..7].iter().all(u8::is_ascii_uppercase)
        && b[7..11].iter().all(u8::is_ascii_digit)
        && b[11].is_ascii_uppercase()
        && (matches!(b[12], b'1'..=b'9') || b[12].is_ascii_uppercase())
        && b[13] == b'Z'
        && (b[14].is_ascii_digit() || b[14].is_ascii_uppercase())
}

// ─── Lookup adapter ──────────────────────────────────────────────────

/// Registration status reported by the GST service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxpayerStatus {
    Active,
    Cancelled,
    Suspended,
}

impl fmt::Display for TaxpayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Suspended => write!(f, "Suspended"),
        }
    }
}

/// Principal place of business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalPlace {
    pub address: String,
    pub pincode: String,
    pub state: String,
}

/// Taxpayer record returned by a GSTIN lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstinDetails {
    pub gstin: Gstin,
    pub legal_name: String,
    pub trade_name: String,
    /// `YYYY-MM-DD`.
    pub registration_date: String,
    pub constitution_of_business: String,
    pub taxpayer_type: String,
    pub status: TaxpayerStatus,
    pub state_code: String,
    pub state_name: String,
    pub principal_place: PrincipalPlace,
}

/// Adapter trait for the GST taxpayer search service.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc`. The trait is object-safe to support runtime selection of the
/// mock or a live client.
pub trait GstinLookup: Send + Sync {
    /// Fetch the taxpayer record for an already-validated GSTIN.
    fn lookup(&self, gstin: &Gstin) -> Result<GstinDetails, ComplianceError>;

    /// Human-readable name of this adapter implementation.
    fn adapter_name(&self) -> &str;
}

/// Validate `raw`, look it up, and require an active registration.
pub fn verify_gstin(lookup: &dyn GstinLookup, raw: &str) -> Result<GstinDetails, ComplianceError> {
    let gstin = Gstin::parse(raw)?;
    let details = lookup.lookup(&gstin)?;
    if details.status != TaxpayerStatus::Active {
        tracing::warn!(gstin = %gstin, status = %details.status, adapter = lookup.adapter_name(), "GSTIN registration is not active");
        return Err(ComplianceError::NotRegistered(gstin.to_string()));
    }
    tracing::debug!(gstin = %gstin, adapter = lookup.adapter_name(), "GSTIN verified");
    Ok(details)
}

/// Mock GST lookup for tests and development.
///
/// Every well-formed GSTIN resolves to a fixed sample taxpayer in the
/// GSTIN's own state. GSTINs whose entity number is `9` are reported as
/// cancelled, so callers can exercise the inactive path.
#[derive(Debug, Clone, Default)]
pub struct MockGstinLookup;

impl GstinLookup for MockGstinLookup {
    fn lookup(&self, gstin: &Gstin) -> Result<GstinDetails, ComplianceError> {
        let status = if gstin.as_str().as_bytes()[12] == b'9' {
            TaxpayerStatus::Cancelled
        } else {
            TaxpayerStatus::Active
        };
        let state = gstin.state_name().to_string();
        Ok(GstinDetails {
            gstin: gstin.clone(),
            legal_name: "Sample Company Private Limited".into(),
            trade_name: "Sample Company".into(),
            registration_date: "2020-01-01".into(),
            constitution_of_business: "Private Limited Company".into(),
            taxpayer_type: "Regular".into(),
            status,
            state_code: gstin.state_code().to_string(),
            state_name: state.clone(),
            principal_place: PrincipalPlace {
                address: "123, Sample Street, Sample Area".into(),
                pincode: "560001".into(),
                state,
            },
        })
    }

    fn adapter_name(&self) -> &str {
        "MockGstinLookup"
    }
}
