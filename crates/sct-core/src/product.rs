//! # Products, Reports, and Product Snapshots
//!
//! A [`ProductSnapshot`] is the read-only view of one product's disclosure
//! state that the graph builder and the scorer consume. Both are pure
//! functions of the snapshot; neither touches the repository.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::identity::{ProductId, ReportId, SupplierId};
use crate::supplier::Supplier;
use crate::survey::SurveyResponse;
use crate::temporal::Timestamp;

/// A product owned by the manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// The manufacturer that owns the product.
    pub company_name: String,
}

impl Product {
    /// Create a product with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: description.into(),
            company_name: company_name.into(),
        }
    }
}

/// A point-in-time transparency report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique report identifier.
    pub id: ReportId,
    /// The product the report covers.
    pub product_id: ProductId,
    /// When the report was generated.
    pub generated_at: Timestamp,
    /// Composite score in `0..=100`.
    pub transparency_score: u8,
    /// Share of suppliers that responded, in `0..=100`.
    pub supplier_completion_rate: u8,
    /// Public link for third-party verification.
    pub verification_url: String,
}

/// Everything known about one product's disclosure state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// The product, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Suppliers in the product's chain.
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    /// Survey responses for the product's surveys.
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
    /// Documents attached to those responses.
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl ProductSnapshot {
    /// Suppliers whose status is `Responded` or `Verified`.
    pub fn responded_suppliers(&self) -> usize {
        self.suppliers
            .iter()
            .filter(|s| s.status.has_responded())
            .count()
    }

    /// Documents attached to responses that are linked to one of this
    /// product's suppliers.
    ///
    /// Documents on responses with no supplier link, or linked to a supplier
    /// outside the snapshot, are not counted.
    pub fn supplier_documents(&self) -> impl Iterator<Item = &Document> {
        let supplier_ids: HashSet<SupplierId> = self.suppliers.iter().map(|s| s.id).collect();
        let linked_responses: HashSet<_> = self
            .responses
            .iter()
            .filter(|r| r.supplier_id.is_some_and(|id| supplier_ids.contains(&id)))
            .map(|r| r.id)
            .collect();
        self.documents
            .iter()
            .filter(move |d| linked_responses.contains(&d.response_id))
    }
}
