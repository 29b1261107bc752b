//! # MSME Registration
//!
//! Udyam registration numbers have the shape `UDYAM-XX-00-0000000`: a state
//! abbreviation, a two-digit district code, and a seven-digit serial.
//!
//! Enterprises are categorized by plant and machinery investment and by
//! annual turnover, both in rupees. Both limits of a band must hold; the
//! first band that fits wins.
//!
//! | Category | Investment ≤ | Turnover ≤ |
//! |----------|-------------:|-----------:|
//! | Micro  | 1 000 000 | 5 000 000 |
//! | Small  | 10 000 000 | 50 000 000 |
//! | Medium | 50 000 000 | 250 000 000 |
//! | Large  | above | above |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComplianceError;

const UDYAM_PREFIX: &str = "UDYAM-";

/// A Udyam registration number with a valid layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UdyamNumber(String);

impl<'de> Deserialize<'de> for UdyamNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl UdyamNumber {
    /// Validate a Udyam number. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, ComplianceError> {
        let s = raw.trim();
        let valid = s.strip_prefix(UDYAM_PREFIX).is_some_and(|rest| {
            let parts: Vec<&str> = rest.split('-').collect();
            matches!(
                parts.as_slice(),
                [state, district, serial]
                    if state.len() == 2 && state.bytes().all(|b| b.is_ascii_uppercase())
                    && district.len() == 2 && district.bytes().all(|b| b.is_ascii_digit())
                    && serial.len() == 7 && serial.bytes().all(|b| b.is_ascii_digit())
            )
        });
        if !valid {
            return Err(ComplianceError::InvalidUdyam(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-letter state abbreviation, e.g. `TN`.
    pub fn state(&self) -> &str {
        &self.0[6..8]
    }
}

impl fmt::Display for UdyamNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// MSME size band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnterpriseCategory {
    Micro,
    Small,
    Medium,
    Large,
}

impl EnterpriseCategory {
    /// Whether the enterprise qualifies as an MSME at all.
    pub fn is_msme(&self) -> bool {
        !matches!(self, Self::Large)
    }
}

impl fmt::Display for EnterpriseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Micro => write!(f, "Micro"),
            Self::Small => write!(f, "Small"),
            Self::Medium => write!(f, "Medium"),
            Self::Large => write!(f, "Large"),
        }
    }
}

/// (category, investment limit, turnover limit), smallest band first.
const BANDS: &[(EnterpriseCategory, u64, u64)] = &[
    (EnterpriseCategory::Micro, 1_000_000, 5_000_000),
    (EnterpriseCategory::Small, 10_000_000, 50_000_000),
    (EnterpriseCategory::Medium, 50_000_000, 250_000_000),
];

/// Categorize an enterprise by investment and turnover in rupees.
pub fn categorize(investment: u64, turnover: u64) -> EnterpriseCategory {
    BANDS
        .iter()
        .find(|(_, max_investment, max_turnover)| {
            investment <= *max_investment && turnover <= *max_turnover
        })
        .map(|(category, _, _)| *category)
        .unwrap_or(EnterpriseCategory::Large)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_udyam() {
        let u = UdyamNumber::parse("UDYAM-TN-07-0012345").unwrap();
        assert_eq!(u.state(), "TN");
        assert_eq!(u.to_string(), "UDYAM-TN-07-0012345");
    }

    #[test]
    fn rejects_malformed_udyam() {
        for bad in [
            "",
            "UDYAM-TN-07-001234",
            "UDYAM-TN-07-00123456",
            "UDYAM-tn-07-0012345",
            "UDYAM-TN-7-0012345",
            "udyam-TN-07-0012345",
            "UDYAM-TN-07-0012345-1",
            "UDYAM-TNX-07-0012345",
        ] {
            assert!(!UdyamNumber::is_valid(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn micro_band_is_inclusive() {
        assert_eq!(categorize(1_000_000, 5_000_000), EnterpriseCategory::Micro);
        assert_eq!(categorize(0, 0), EnterpriseCategory::Micro);
    }

    #[test]
    fn both_limits_must_hold() {
        // Micro investment but Small turnover.
        assert_eq!(categorize(500_000, 6_000_000), EnterpriseCategory::Small);
        assert_eq!(categorize(5_000_000, 25_000_000), EnterpriseCategory::Small);
    }

    #[test]
    fn medium_and_large() {
        assert_eq!(categorize(50_000_000, 250_000_000), EnterpriseCategory::Medium);
        assert_eq!(categorize(50_000_001, 1), EnterpriseCategory::Large);
        assert_eq!(categorize(1, 250_000_001), EnterpriseCategory::Large);
        assert!(!EnterpriseCategory::Large.is_msme());
        assert!(EnterpriseCategory::Medium.is_msme());
    }
}
