//! # sct-core: Foundational Types for Supply-Chain Transparency
//!
//! This crate is the leaf of the workspace. It defines the entity model that
//! every other crate shares, so that a supplier status or a document hash
//! means the same thing in the graph builder, the scorer, the state machine,
//! and the service layer.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `ProductId`, `SupplierId`, `SurveyId`,
//!    `ResponseId`, `DocumentId`, `ReportId` are distinct UUID newtypes.
//!    `AccessToken` validates its 64-lowercase-hex shape at construction.
//!
//! 2. **Closed status enums.** `SupplierStatus`, `ResponseStatus` are
//!    exhaustive enums with a single wire spelling (`PENDING`, `RESPONDED`,
//!    ...). There is no casing normalization anywhere.
//!
//! 3. **UTC-only timestamps.** `Timestamp` truncates to seconds and always
//!    renders with a `Z` suffix.
//!
//! 4. **One error taxonomy.** [`SctError`] carries the six error kinds that
//!    every operation in the workspace reports.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sct-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod document;
pub mod error;
pub mod identity;
pub mod product;
pub mod supplier;
pub mod survey;
pub mod temporal;

pub use digest::{ContentDigest, DigestParseError};
pub use document::Document;
pub use error::{ErrorKind, SctError};
pub use identity::{
    AccessToken, DocumentId, ProductId, QuestionId, ReportId, ResponseId, SupplierId, SurveyId,
};
pub use product::{Product, ProductSnapshot, Report};
pub use supplier::{Supplier, SupplierStatus};
pub use survey::{
    Answers, QuestionCategory, QuestionKind, ResponseStatus, Survey, SurveyQuestion,
    SurveyResponse,
};
pub use temporal::Timestamp;
