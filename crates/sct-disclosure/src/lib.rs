//! # sct-disclosure: Disclosure Services
//!
//! Orchestrates the pure crates (`sct-crypto`, `sct-state`, `sct-graph`,
//! `sct-score`) over two injected collaborators:
//!
//! - a [`DisclosureRepository`] for products, suppliers, surveys,
//!   responses, documents and reports, and
//! - a [`BlobStore`] for document bytes.
//!
//! Both are synchronous `Send + Sync` traits shared behind `Arc`. In-memory
//! implementations back the tests and the CLI; [`FsBlobStore`] keeps bytes
//! on disk.
//!
//! ## Services
//!
//! | Service | Operations |
//! |---------|------------|
//! | [`CatalogService`] | register products, add suppliers, create surveys, confirm verification, build the supply-chain tree |
//! | [`InvitationService`] | mint a token and open a pending response |
//! | [`SubmissionService`] | token-gated view, document attachment, submission |
//! | [`DocumentIntegrityService`] | fingerprint on ingest, re-verify on demand |
//! | [`ReportService`] | score a fresh snapshot, public verification view |
//!
//! [`DisclosureServices`] wires all five over one repository and blob store.
//!
//! Configuration is explicit ([`DisclosureConfig`]) and handed to each
//! service at construction. Services never read the environment; only
//! [`DisclosureConfig::from_env`] does, for binaries.

pub mod blob;
pub mod catalog;
pub mod config;
pub mod integrity;
pub mod invitation;
pub mod report;
pub mod repository;
pub mod services;
pub mod submission;

pub use blob::{BlobError, BlobStore, FsBlobStore, InMemoryBlobStore};
pub use catalog::{CatalogService, NewSupplier};
pub use config::{
    ComplianceConfig, ConfigError, DisclosureConfig, IntegrityConfig, InvitationConfig,
    ReportConfig,
};
pub use integrity::{DocumentIntegrityService, IntegritySummary, Upload};
pub use invitation::{Invitation, InvitationService};
pub use report::{DocumentProof, ReportService, ReportVerification};
pub use repository::{DisclosureRepository, InMemoryRepository, RepositoryError, SubmissionCommit};
pub use services::DisclosureServices;
pub use submission::{ResponseRecord, ResponseView, SubmissionService};
