//! # Disclosure Repository
//!
//! Persistent state for products, suppliers, surveys, responses, documents
//! and reports, behind the [`DisclosureRepository`] trait.
//!
//! ## Atomic submission
//!
//! [`DisclosureRepository::commit_submission`] is the only write that
//! touches two records at once. It is a compare-and-swap on the response
//! status: the response must still be `Pending` when the write lock is
//! taken, and the response update and the linked supplier update land
//! together or not at all. Two concurrent submissions for the same
//! response therefore produce exactly one winner; the loser sees
//! [`RepositoryError::Conflict`].
//!
//! [`InMemoryRepository`] keeps every table under one `parking_lot`
//! `RwLock`, so the compare-and-swap is a single critical section.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;
use thiserror::Error;

use sct_core::{
    AccessToken, Answers, Document, DocumentId, Product, ProductId, ProductSnapshot, Report,
    ReportId, ResponseId, ResponseStatus, SctError, Supplier, SupplierId, Survey, SurveyId,
    SurveyResponse, Timestamp,
};
use sct_state::{SupplierError, SupplierLifecycle};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from repository operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No record with this id.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record type.
        entity: &'static str,
        /// The missing id.
        id: String,
    },

    /// The response was no longer `Pending` when the commit ran.
    #[error("survey response {response_id} has already been submitted")]
    Conflict {
        /// The response whose compare-and-swap failed.
        response_id: String,
    },

    /// A record with this id already exists.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The backing store could not be reached.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for SctError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound { .. } => SctError::NotFound(e.to_string()),
            RepositoryError::Conflict { response_id } => SctError::AlreadySubmitted { response_id },
            RepositoryError::Duplicate(_) => SctError::InvalidInput(e.to_string()),
            RepositoryError::Unavailable(msg) => SctError::StorageUnavailable(msg),
        }
    }
}

// ─── Trait ───────────────────────────────────────────────────────────

/// A validated submission, ready to be applied atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionCommit {
    pub response_id: ResponseId,
    pub answers: Answers,
    pub submitted_at: Timestamp,
}

/// Storage for all disclosure records.
///
/// Every read returns an owned copy. Listing methods return records in
/// insertion order.
pub trait DisclosureRepository: Send + Sync {
    fn insert_product(&self, product: Product) -> Result<(), RepositoryError>;
    fn product(&self, id: &ProductId) -> Result<Product, RepositoryError>;

    fn insert_supplier(&self, supplier: Supplier) -> Result<(), RepositoryError>;
    fn supplier(&self, id: &SupplierId) -> Result<Supplier, RepositoryError>;
    /// Suppliers of one product.
    fn suppliers(&self, product: &ProductId) -> Result<Vec<Supplier>, RepositoryError>;
    /// Atomically read-validate-update a supplier.
    ///
    /// `apply` runs on a copy under the write lock; the copy is stored only
    /// when it returns `Ok`. The outer error is the lookup, the inner one is
    /// `apply`'s verdict.
    fn try_update_supplier(
        &self,
        id: &SupplierId,
        apply: &mut dyn FnMut(&mut Supplier) -> Result<(), SupplierError>,
    ) -> Result<Result<Supplier, SupplierError>, RepositoryError>;

    fn insert_survey(&self, survey: Survey) -> Result<(), RepositoryError>;
    fn survey(&self, id: &SurveyId) -> Result<Survey, RepositoryError>;

    /// Insert a response. Its token must not collide with an existing one.
    fn insert_response(&self, response: SurveyResponse) -> Result<(), RepositoryError>;
    fn response(&self, id: &ResponseId) -> Result<SurveyResponse, RepositoryError>;
    /// Look a response up by its access token.
    fn response_by_token(&self, token: &AccessToken) -> Result<SurveyResponse, RepositoryError>;
    /// Responses to one survey.
    fn responses_for_survey(&self, survey: &SurveyId)
        -> Result<Vec<SurveyResponse>, RepositoryError>;
    /// Responses to any survey of `product`.
    fn responses_for_product(
        &self,
        product: &ProductId,
    ) -> Result<Vec<SurveyResponse>, RepositoryError>;

    /// Apply a submission as one compare-and-swap on the response status.
    ///
    /// Returns the updated response and, when the response is linked to a
    /// supplier, the updated supplier.
    fn commit_submission(
        &self,
        commit: SubmissionCommit,
    ) -> Result<(SurveyResponse, Option<Supplier>), RepositoryError>;

    fn insert_document(&self, document: Document) -> Result<(), RepositoryError>;
    fn document(&self, id: &DocumentId) -> Result<Document, RepositoryError>;
    fn documents_for_response(&self, id: &ResponseId) -> Result<Vec<Document>, RepositoryError>;
    /// Documents attached to any response of `product`.
    fn documents_for_product(&self, product: &ProductId)
        -> Result<Vec<Document>, RepositoryError>;
    /// Persist the outcome of an integrity re-check.
    fn set_document_verified(
        &self,
        id: &DocumentId,
        verified: bool,
    ) -> Result<Document, RepositoryError>;

    fn insert_report(&self, report: Report) -> Result<(), RepositoryError>;
    fn report(&self, id: &ReportId) -> Result<Report, RepositoryError>;
    /// Reports generated for `product`.
    fn reports_for_product(&self, product: &ProductId) -> Result<Vec<Report>, RepositoryError>;

    /// Everything known about `product`, read fresh.
    fn snapshot(&self, product: &ProductId) -> Result<ProductSnapshot, RepositoryError> {
        Ok(ProductSnapshot {
            product: Some(self.product(product)?),
            suppliers: self.suppliers(product)?,
            responses: self.responses_for_product(product)?,
            documents: self.documents_for_product(product)?,
        })
    }
}

// ─── In-Memory Implementation ────────────────────────────────────────

/// Insertion-ordered table keyed by id.
#[derive(Debug)]
struct Table<K, V> {
    order: Vec<K>,
    rows: HashMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + std::fmt::Display, V: Clone> Table<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<(), RepositoryError> {
        if self.rows.contains_key(&key) {
            return Err(RepositoryError::Duplicate(key.to_string()));
        }
        self.order.push(key);
        self.rows.insert(key, value);
        Ok(())
    }

    fn get(&self, entity: &'static str, key: &K) -> Result<V, RepositoryError> {
        self.rows
            .get(key)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(entity, key))
    }

    fn get_mut(&mut self, entity: &'static str, key: &K) -> Result<&mut V, RepositoryError> {
        self.rows
            .get_mut(key)
            .ok_or_else(|| RepositoryError::not_found(entity, key))
    }

    fn iter(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }
}

#[derive(Debug, Default)]
struct Tables {
    products: Table<ProductId, Product>,
    suppliers: Table<SupplierId, Supplier>,
    surveys: Table<SurveyId, Survey>,
    responses: Table<ResponseId, SurveyResponse>,
    tokens: HashMap<String, ResponseId>,
    documents: Table<DocumentId, Document>,
    reports: Table<ReportId, Report>,
}

impl Tables {
    fn survey_ids_for(&self, product: &ProductId) -> Vec<SurveyId> {
        self.surveys
            .iter()
            .filter(|s| s.product_id == *product)
            .map(|s| s.id)
            .collect()
    }

    fn response_ids_for(&self, product: &ProductId) -> Vec<ResponseId> {
        let surveys = self.survey_ids_for(product);
        self.responses
            .iter()
            .filter(|r| surveys.contains(&r.survey_id))
            .map(|r| r.id)
            .collect()
    }
}

/// Thread-safe in-memory repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisclosureRepository for InMemoryRepository {
    fn insert_product(&self, product: Product) -> Result<(), RepositoryError> {
        self.tables.write().products.insert(product.id, product)
    }

    fn product(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.tables.read().products.get("product", id)
    }

    fn insert_supplier(&self, supplier: Supplier) -> Result<(), RepositoryError> {
        self.tables.write().suppliers.insert(supplier.id, supplier)
    }

    fn supplier(&self, id: &SupplierId) -> Result<Supplier, RepositoryError> {
        self.tables.read().suppliers.get("supplier", id)
    }

    fn suppliers(&self, product: &ProductId) -> Result<Vec<Supplier>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .suppliers
            .iter()
            .filter(|s| s.product_id == *product)
            .cloned()
            .collect())
    }

    fn try_update_supplier(
        &self,
        id: &SupplierId,
        apply: &mut dyn FnMut(&mut Supplier) -> Result<(), SupplierError>,
    ) -> Result<Result<Supplier, SupplierError>, RepositoryError> {
        let mut tables = self.tables.write();
        let slot = tables.suppliers.get_mut("supplier", id)?;
        let mut next = slot.clone();
        Ok(apply(&mut next).map(|()| {
            *slot = next.clone();
            next
        }))
    }

    fn insert_survey(&self, survey: Survey) -> Result<(), RepositoryError> {
        self.tables.write().surveys.insert(survey.id, survey)
    }

    fn survey(&self, id: &SurveyId) -> Result<Survey, RepositoryError> {
        self.tables.read().surveys.get("survey", id)
    }

    fn insert_response(&self, response: SurveyResponse) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        let token = response.token.as_str().to_string();
        if tables.tokens.contains_key(&token) {
            return Err(RepositoryError::Duplicate("access token".into()));
        }
        let id = response.id;
        tables.responses.insert(id, response)?;
        tables.tokens.insert(token, id);
        Ok(())
    }

    fn response(&self, id: &ResponseId) -> Result<SurveyResponse, RepositoryError> {
        self.tables.read().responses.get("survey response", id)
    }

    fn response_by_token(&self, token: &AccessToken) -> Result<SurveyResponse, RepositoryError> {
        let tables = self.tables.read();
        let id = tables
            .tokens
            .get(token.as_str())
            .ok_or_else(|| RepositoryError::not_found("survey response", "for token"))?;
        tables.responses.get("survey response", id)
    }

    fn responses_for_survey(
        &self,
        survey: &SurveyId,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .responses
            .iter()
            .filter(|r| r.survey_id == *survey)
            .cloned()
            .collect())
    }

    fn responses_for_product(
        &self,
        product: &ProductId,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        let tables = self.tables.read();
        tables
            .response_ids_for(product)
            .iter()
            .map(|id| tables.responses.get("survey response", id))
            .collect()
    }

    fn commit_submission(
        &self,
        commit: SubmissionCommit,
    ) -> Result<(SurveyResponse, Option<Supplier>), RepositoryError> {
        let mut tables = self.tables.write();
        let current = tables.responses.get("survey response", &commit.response_id)?;
        if current.status != ResponseStatus::Pending {
            return Err(RepositoryError::Conflict {
                response_id: commit.response_id.to_string(),
            });
        }

        // Resolve the supplier before writing anything.
        let supplier = match current.supplier_id {
            Some(sid) => {
                let mut s = tables.suppliers.get("supplier", &sid)?;
                SupplierLifecycle::record_response(&mut s, commit.submitted_at);
                Some(s)
            }
            None => None,
        };

        let response = tables
            .responses
            .get_mut("survey response", &commit.response_id)?;
        response.answers = commit.answers;
        response.submitted_at = Some(commit.submitted_at);
        response.status = ResponseStatus::Submitted;
        let response = response.clone();

        if let Some(s) = &supplier {
            *tables.suppliers.get_mut("supplier", &s.id)? = s.clone();
        }
        Ok((response, supplier))
    }

    fn insert_document(&self, document: Document) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        if !tables.responses.rows.contains_key(&document.response_id) {
            return Err(RepositoryError::not_found(
                "survey response",
                document.response_id,
            ));
        }
        tables.documents.insert(document.id, document)
    }

    fn document(&self, id: &DocumentId) -> Result<Document, RepositoryError> {
        self.tables.read().documents.get("document", id)
    }

    fn documents_for_response(&self, id: &ResponseId) -> Result<Vec<Document>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .documents
            .iter()
            .filter(|d| d.response_id == *id)
            .cloned()
            .collect())
    }

    fn documents_for_product(
        &self,
        product: &ProductId,
    ) -> Result<Vec<Document>, RepositoryError> {
        let tables = self.tables.read();
        let responses = tables.response_ids_for(product);
        Ok(tables
            .documents
            .iter()
            .filter(|d| responses.contains(&d.response_id))
            .cloned()
            .collect())
    }

    fn set_document_verified(
        &self,
        id: &DocumentId,
        verified: bool,
    ) -> Result<Document, RepositoryError> {
        let mut tables = self.tables.write();
        let doc = tables.documents.get_mut("document", id)?;
        doc.verified = verified;
        Ok(doc.clone())
    }

    fn insert_report(&self, report: Report) -> Result<(), RepositoryError> {
        self.tables.write().reports.insert(report.id, report)
    }

    fn report(&self, id: &ReportId) -> Result<Report, RepositoryError> {
        self.tables.read().reports.get("report", id)
    }

    fn reports_for_product(&self, product: &ProductId) -> Result<Vec<Report>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .reports
            .iter()
            .filter(|r| r.product_id == *product)
            .cloned()
            .collect())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
