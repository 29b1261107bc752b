//! # sct-compliance: Supplier Registration Checks
//!
//! Indian suppliers are identified to the tax authority by a GSTIN and, if
//! they are micro, small or medium enterprises, by a Udyam registration
//! number. This crate validates both identifiers before a supplier record
//! is trusted and categorizes MSMEs by investment and turnover.
//!
//! ## Adapter
//!
//! `GstinLookup` abstracts over the GST taxpayer search service. Production
//! deployments implement it against the live API; tests and development use
//! `MockGstinLookup`. Format validation always runs before any lookup.

pub mod error;
pub mod gstin;
pub mod msme;

pub use error::ComplianceError;
pub use gstin::{
    state_name, verify_gstin, Gstin, GstinDetails, GstinLookup, MockGstinLookup,
    PrincipalPlace, TaxpayerStatus,
};
pub use msme::{categorize, EnterpriseCategory, UdyamNumber};
