//! # Transparency Reports
//!
//! A report is a point-in-time score for one product. Generation always
//! reads a fresh snapshot and re-runs the scorer; nothing is cached between
//! reports.
//!
//! The public verification view lists every supplier-linked document with
//! its recorded hash so that a third party holding the original file can
//! recompute SHA-256 and compare.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sct_core::{
    Document, DocumentId, ProductId, ProductSnapshot, Report, ReportId, ResponseId, SctError,
    Timestamp,
};
use sct_score::TransparencyScorer;

use crate::config::ReportConfig;
use crate::repository::DisclosureRepository;

/// Shown on the public verification page.
pub const VERIFICATION_INSTRUCTIONS: &str = "Each document can be independently verified by \
re-computing its SHA-256 hash and comparing with the stored hash.";

/// One document in the public verification view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProof {
    pub id: DocumentId,
    pub filename: String,
    /// Lowercase hex SHA-256 recorded at upload.
    pub hash: String,
    pub timestamp: Timestamp,
    /// Outcome of the latest re-verification.
    pub verified: bool,
    pub blockchain_tx_id: Option<String>,
}

impl From<&Document> for DocumentProof {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id,
            filename: d.original_filename.clone(),
            hash: d.hash_sha256().to_hex(),
            timestamp: d.timestamp,
            verified: d.verified,
            blockchain_tx_id: d.blockchain_anchor_tx_id.clone(),
        }
    }
}

/// Public, re-derivable proof surface of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportVerification {
    pub report_id: ReportId,
    pub product_name: String,
    pub company_name: String,
    pub generated_at: Timestamp,
    pub transparency_score: u8,
    pub supplier_completion_rate: u8,
    pub documents: Vec<DocumentProof>,
    pub verification_instructions: String,
}

/// Report generation and public verification.
#[derive(Clone)]
pub struct ReportService {
    config: ReportConfig,
    repo: Arc<dyn DisclosureRepository>,
}

impl ReportService {
    pub fn new(config: ReportConfig, repo: Arc<dyn DisclosureRepository>) -> Self {
        Self { config, repo }
    }

    /// Score the product's current state and persist the result.
    pub fn generate(&self, product_id: &ProductId) -> Result<Report, SctError> {
        let snapshot = self.repo.snapshot(product_id)?;
        let score = TransparencyScorer::score(&snapshot);
        let id = ReportId::new();
        let report = Report {
            id,
            product_id: *product_id,
            generated_at: Timestamp::now(),
            transparency_score: score.transparency_score,
            supplier_completion_rate: score.supplier_completion_rate,
            verification_url: self.config.verification_link(&id),
        };
        self.repo.insert_report(report.clone())?;
        tracing::info!(
            report_id = %report.id,
            product_id = %product_id,
            score = report.transparency_score,
            completion = report.supplier_completion_rate,
            suppliers = snapshot.suppliers.len(),
            "transparency report generated"
        );
        Ok(report)
    }

    /// Stored reports for `product_id`, newest first.
    pub fn list(&self, product_id: &ProductId) -> Result<Vec<Report>, SctError> {
        self.repo.product(product_id)?;
        let mut reports = self.repo.reports_for_product(product_id)?;
        // Equal timestamps keep the later insertion first.
        reports.reverse();
        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(reports)
    }

    /// The public verification view of a stored report.
    ///
    /// Scores come from the stored report; documents and their `verified`
    /// flags are read as they are now.
    pub fn verification(&self, report_id: &ReportId) -> Result<ReportVerification, SctError> {
        let report = self.repo.report(report_id)?;
        let snapshot = self.repo.snapshot(&report.product_id)?;
        let documents = documents_by_supplier(&snapshot)
            .into_iter()
            .map(DocumentProof::from)
            .collect();
        let (product_name, company_name) = snapshot
            .product
            .map(|p| (p.name, p.company_name))
            .unwrap_or_default();
        Ok(ReportVerification {
            report_id: report.id,
            product_name,
            company_name,
            generated_at: report.generated_at,
            transparency_score: report.transparency_score,
            supplier_completion_rate: report.supplier_completion_rate,
            documents,
            verification_instructions: VERIFICATION_INSTRUCTIONS.to_string(),
        })
    }
}

/// Supplier-linked documents, grouped supplier by supplier, then response
/// by response, each group in stored order.
fn documents_by_supplier(snapshot: &ProductSnapshot) -> Vec<&Document> {
    let mut by_response: HashMap<ResponseId, Vec<&Document>> = HashMap::new();
    for d in &snapshot.documents {
        by_response.entry(d.response_id).or_default().push(d);
    }
    let mut out = Vec::new();
    for supplier in &snapshot.suppliers {
        for response in snapshot
            .responses
            .iter()
            .filter(|r| r.supplier_id == Some(supplier.id))
        {
            if let Some(docs) = by_response.remove(&response.id) {
                out.extend(docs);
            }
        }
    }
    out
}
