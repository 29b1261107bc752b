//! # Supplier Invitations
//!
//! An invitation opens a `Pending` survey response for one supplier
//! address and mints the bearer token that gates it. Delivering the portal
//! link (email, chat, ...) is the caller's concern.

use std::sync::Arc;

use serde::Serialize;

use sct_core::{SctError, SupplierId, SurveyId, SurveyResponse};
use sct_crypto::TokenIssuer;
use sct_state::ResponseStateMachine;

use crate::config::InvitationConfig;
use crate::repository::DisclosureRepository;

/// A freshly issued invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// The pending response, carrying the token.
    pub response: SurveyResponse,
    /// Link that opens the response in the supplier portal.
    pub portal_url: String,
}

/// Issues survey invitations.
#[derive(Clone)]
pub struct InvitationService {
    config: InvitationConfig,
    repo: Arc<dyn DisclosureRepository>,
}

impl InvitationService {
    pub fn new(config: InvitationConfig, repo: Arc<dyn DisclosureRepository>) -> Self {
        Self { config, repo }
    }

    /// Invite `supplier_email` to answer `survey_id`.
    ///
    /// When `supplier_id` is given, the supplier must belong to the survey's
    /// product; a later submission then moves that supplier to `Responded`.
    pub fn invite(
        &self,
        survey_id: SurveyId,
        supplier_email: &str,
        supplier_id: Option<SupplierId>,
    ) -> Result<Invitation, SctError> {
        let email = supplier_email.trim();
        check_email(email)?;
        let survey = self.repo.survey(&survey_id)?;
        if let Some(sid) = supplier_id {
            let supplier = self.repo.supplier(&sid)?;
            if supplier.product_id != survey.product_id {
                return Err(SctError::InvalidInput(format!(
                    "supplier {sid} does not belong to product {}",
                    survey.product_id
                )));
            }
        }

        let token = TokenIssuer::issue()?;
        let response = ResponseStateMachine::open(survey_id, email, supplier_id, token);
        self.repo.insert_response(response.clone())?;
        let portal_url = self.config.portal_link(&response.token);
        tracing::info!(
            response_id = %response.id,
            survey_id = %survey_id,
            linked = supplier_id.is_some(),
            "supplier invited"
        );
        Ok(Invitation {
            response,
            portal_url,
        })
    }
}

/// Minimal address shape check: `local@domain.tld`, no whitespace.
pub(crate) fn check_email(email: &str) -> Result<(), SctError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SctError::InvalidInput(format!(
            "invalid email address {email:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sct_core::{ErrorKind, Product, ResponseStatus, Supplier, Survey, Timestamp};

    use crate::repository::InMemoryRepository;

    fn setup() -> (Arc<InMemoryRepository>, InvitationService, Product, Survey) {
        let repo = Arc::new(InMemoryRepository::new());
        let product = Product::new("Shirt", "", "Acme Textiles");
        let survey = Survey {
            id: SurveyId::new(),
            product_id: product.id,
            supplier_tier: 1,
            questions: vec![],
            created_at: Timestamp::now(),
        };
        repo.insert_product(product.clone()).unwrap();
        repo.insert_survey(survey.clone()).unwrap();
        let service = InvitationService::new(InvitationConfig::default(), repo.clone());
        (repo, service, product, survey)
    }

    #[test]
    fn invite_opens_pending_response_with_portal_link() {
        let (repo, service, product, survey) = setup();
        let supplier = Supplier::new(product.id, "Mill", "mill@example.test", 1, None);
        repo.insert_supplier(supplier.clone()).unwrap();

        let inv = service
            .invite(survey.id, " mill@example.test ", Some(supplier.id))
            .unwrap();
        assert_eq!(inv.response.status, ResponseStatus::Pending);
        assert_eq!(inv.response.supplier_email, "mill@example.test");
        assert!(inv.response.answers.is_empty());
        assert_eq!(
            inv.portal_url,
            format!(
                "http://localhost:3000/supplier-portal?token={}",
                inv.response.token.as_str()
            )
        );
        assert_eq!(repo.response_by_token(&inv.response.token).unwrap().id, inv.response.id);
    }

    #[test]
    fn each_invitation_gets_its_own_token() {
        let (_, service, _, survey) = setup();
        let a = service.invite(survey.id, "a@example.test", None).unwrap();
        let b = service.invite(survey.id, "a@example.test", None).unwrap();
        assert_ne!(a.response.token, b.response.token);
    }

    #[test]
    fn invite_rejects_bad_email_and_unknown_survey() {
        let (_, service, _, survey) = setup();
        for bad in ["", "no-at-sign", "@example.test", "a@b", "a b@example.test", "a@@x.test"] {
            let err = service.invite(survey.id, bad, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{bad:?}");
        }
        let err = service
            .invite(SurveyId::new(), "a@example.test", None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invite_rejects_supplier_of_another_product() {
        let (repo, service, _, survey) = setup();
        let foreign = Supplier::new(sct_core::ProductId::new(), "X", "x@example.test", 1, None);
        repo.insert_supplier(foreign.clone()).unwrap();
        let err = service
            .invite(survey.id, "x@example.test", Some(foreign.id))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
