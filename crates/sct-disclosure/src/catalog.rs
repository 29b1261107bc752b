//! # Product Catalog
//!
//! Operator-side writes: products, their suppliers and surveys, and the
//! explicit supplier verification step. Every write checks the invariants
//! that the hierarchy builder and the scorer rely on.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;

use sct_core::{
    Product, ProductId, QuestionKind, SctError, Supplier, SupplierId, Survey, SurveyId,
    SurveyQuestion, Timestamp,
};
use sct_graph::{
    validate_hierarchy, validate_new_supplier, HierarchyError, SupplyChainForest,
    SupplyChainGraphBuilder,
};
use sct_state::SupplierLifecycle;

use crate::invitation::check_email;
use crate::repository::{DisclosureRepository, RepositoryError};

/// Input for [`CatalogService::add_supplier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub product_id: ProductId,
    pub name: String,
    pub email: String,
    pub tier: u32,
    #[serde(default)]
    pub parent_supplier_id: Option<SupplierId>,
}

/// Operator-side catalog operations.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn DisclosureRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn DisclosureRepository>) -> Self {
        Self { repo }
    }

    pub fn register_product(
        &self,
        name: &str,
        description: &str,
        company_name: &str,
    ) -> Result<Product, SctError> {
        let name = non_blank("product name", name)?;
        let company = non_blank("company name", company_name)?;
        let product = Product::new(name, description.trim(), company);
        self.repo.insert_product(product.clone())?;
        tracing::info!(product_id = %product.id, "product registered");
        Ok(product)
    }

    /// Add a supplier to a product's chain.
    ///
    /// The parent, when given, must exist, belong to the same product and
    /// sit at a strictly smaller tier.
    pub fn add_supplier(&self, input: NewSupplier) -> Result<Supplier, SctError> {
        self.repo.product(&input.product_id)?;
        let name = non_blank("supplier name", &input.name)?;
        let email = input.email.trim();
        check_email(email)?;

        let candidate = Supplier::new(
            input.product_id,
            name,
            email,
            input.tier,
            input.parent_supplier_id,
        );
        let existing = match input.parent_supplier_id {
            Some(pid) => match self.repo.supplier(&pid) {
                Ok(parent) => vec![parent],
                Err(RepositoryError::NotFound { .. }) => Vec::new(),
                Err(e) => return Err(e.into()),
            },
            None => Vec::new(),
        };
        validate_new_supplier(&candidate, &existing)?;
        self.repo.insert_supplier(candidate.clone())?;
        tracing::info!(
            supplier_id = %candidate.id,
            product_id = %candidate.product_id,
            tier = candidate.tier,
            "supplier added"
        );
        Ok(candidate)
    }

    /// Create a survey for the suppliers of one tier.
    pub fn create_survey(
        &self,
        product_id: ProductId,
        supplier_tier: u32,
        questions: Vec<SurveyQuestion>,
    ) -> Result<Survey, SctError> {
        self.repo.product(&product_id)?;
        if supplier_tier == 0 {
            return Err(SctError::InvalidInput(
                "survey supplier tier must be at least 1".into(),
            ));
        }
        check_questions(&questions)?;
        let survey = Survey {
            id: SurveyId::new(),
            product_id,
            supplier_tier,
            questions,
            created_at: Timestamp::now(),
        };
        self.repo.insert_survey(survey.clone())?;
        tracing::info!(
            survey_id = %survey.id,
            product_id = %product_id,
            questions = survey.questions.len(),
            "survey created"
        );
        Ok(survey)
    }

    /// Operator confirmation of a supplier's disclosure (RESPONDED → VERIFIED).
    pub fn confirm_supplier_verified(&self, id: &SupplierId) -> Result<Supplier, SctError> {
        let at = Timestamp::now();
        let supplier = self
            .repo
            .try_update_supplier(id, &mut |s| {
                SupplierLifecycle::confirm_verified(s, at).map(|_| ())
            })??;
        Ok(supplier)
    }

    /// The product's supplier forest, rebuilt from the current records.
    pub fn supply_chain(&self, product_id: &ProductId) -> Result<SupplyChainForest, SctError> {
        self.repo.product(product_id)?;
        let suppliers = self.repo.suppliers(product_id)?;
        Ok(SupplyChainGraphBuilder::build(&suppliers))
    }

    /// Every hierarchy invariant the product's suppliers currently violate.
    pub fn audit_hierarchy(&self, product_id: &ProductId) -> Result<Vec<HierarchyError>, SctError> {
        let suppliers = self.repo.suppliers(product_id)?;
        Ok(validate_hierarchy(&suppliers))
    }
}

fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, SctError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SctError::InvalidInput(format!("{field} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

fn check_questions(questions: &[SurveyQuestion]) -> Result<(), SctError> {
    if questions.is_empty() {
        return Err(SctError::InvalidInput(
            "survey must have at least one question".into(),
        ));
    }
    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(SctError::InvalidInput(format!(
                "duplicate question id {:?}",
                q.id.as_str()
            )));
        }
        if q.question.trim().is_empty() {
            return Err(SctError::InvalidInput(format!(
                "question {:?} has no text",
                q.id.as_str()
            )));
        }
        let needs_options = matches!(q.kind, QuestionKind::Select | QuestionKind::Multiselect);
        if needs_options && q.options.as_ref().map_or(true, |o| o.is_empty()) {
            return Err(SctError::InvalidInput(format!(
                "question {:?} needs at least one option",
                q.id.as_str()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sct_core::{ErrorKind, QuestionCategory, QuestionId, SupplierStatus};

    use crate::repository::InMemoryRepository;

    fn service() -> (Arc<InMemoryRepository>, CatalogService, Product) {
        let repo = Arc::new(InMemoryRepository::new());
        let catalog = CatalogService::new(repo.clone());
        let product = catalog
            .register_product("Organic Cotton Shirt", "", "Acme Textiles")
            .unwrap();
        (repo, catalog, product)
    }

    fn new_supplier(product: &Product, name: &str, tier: u32, parent: Option<SupplierId>) -> NewSupplier {
        NewSupplier {
            product_id: product.id,
            name: name.to_string(),
            email: format!("{}@example.test", name.to_lowercase()),
            tier,
            parent_supplier_id: parent,
        }
    }

    fn question(id: &str, kind: QuestionKind, options: Option<Vec<&str>>) -> SurveyQuestion {
        SurveyQuestion {
            id: QuestionId::new(id).unwrap(),
            kind,
            question: format!("About {id}?"),
            options: options.map(|o| o.into_iter().map(String::from).collect()),
            required: true,
            category: QuestionCategory::Environmental,
        }
    }

    #[test]
    fn register_product_requires_names() {
        let (_, catalog, _) = service();
        assert!(catalog.register_product(" ", "", "Acme").is_err());
        assert!(catalog.register_product("Shirt", "", "").is_err());
    }

    #[test]
    fn builds_tiered_chain() {
        let (_, catalog, product) = service();
        let mill = catalog.add_supplier(new_supplier(&product, "Mill", 1, None)).unwrap();
        let farm = catalog
            .add_supplier(new_supplier(&product, "Farm", 2, Some(mill.id)))
            .unwrap();
        assert_eq!(farm.status, SupplierStatus::Pending);

        let forest = catalog.supply_chain(&product.id).unwrap();
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].children[0].id, farm.id);
        assert!(catalog.audit_hierarchy(&product.id).unwrap().is_empty());
    }

    #[test]
    fn add_supplier_rejects_bad_hierarchy() {
        let (repo, catalog, product) = service();
        let mill = catalog.add_supplier(new_supplier(&product, "Mill", 2, None)).unwrap();

        let cases = [
            new_supplier(&product, "Zero", 0, None),
            new_supplier(&product, "Orphan", 3, Some(SupplierId::new())),
            new_supplier(&product, "Same", 2, Some(mill.id)),
            new_supplier(&product, "Upper", 1, Some(mill.id)),
        ];
        for input in cases {
            let err = catalog.add_supplier(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{err}");
        }

        let other = catalog.register_product("Other", "", "Other Co").unwrap();
        let err = catalog
            .add_supplier(new_supplier(&other, "Cross", 3, Some(mill.id)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(repo.suppliers(&product.id).unwrap().len(), 1);
        assert!(repo.suppliers(&other.id).unwrap().is_empty());
    }

    #[test]
    fn add_supplier_to_unknown_product_is_not_found() {
        let (_, catalog, _) = service();
        let ghost = Product::new("Ghost", "", "Nobody");
        let err = catalog
            .add_supplier(new_supplier(&ghost, "Mill", 1, None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn create_survey_checks_questions() {
        let (_, catalog, product) = service();
        let ok = catalog
            .create_survey(
                product.id,
                1,
                vec![
                    question("origin", QuestionKind::Text, None),
                    question("certs", QuestionKind::Multiselect, Some(vec!["GOTS", "OEKO-TEX"])),
                ],
            )
            .unwrap();
        assert_eq!(ok.questions.len(), 2);

        let bad: Vec<(u32, Vec<SurveyQuestion>)> = vec![
            (1, vec![]),
            (0, vec![question("a", QuestionKind::Text, None)]),
            (
                1,
                vec![
                    question("a", QuestionKind::Text, None),
                    question("a", QuestionKind::Date, None),
                ],
            ),
            (1, vec![question("pick", QuestionKind::Select, Some(vec![]))]),
            (1, vec![question("pick", QuestionKind::Select, None)]),
        ];
        for (tier, questions) in bad {
            let err = catalog.create_survey(product.id, tier, questions).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{err}");
        }
    }

    #[test]
    fn confirm_verified_requires_response_first() {
        let (repo, catalog, product) = service();
        let mill = catalog.add_supplier(new_supplier(&product, "Mill", 1, None)).unwrap();
        let err = catalog.confirm_supplier_verified(&mill.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        repo.try_update_supplier(&mill.id, &mut |s| {
            SupplierLifecycle::record_response(s, Timestamp::now());
            Ok(())
        })
        .unwrap()
        .unwrap();
        let verified = catalog.confirm_supplier_verified(&mill.id).unwrap();
        assert_eq!(verified.status, SupplierStatus::Verified);
        assert_eq!(repo.supplier(&mill.id).unwrap().status, SupplierStatus::Verified);
    }
}
