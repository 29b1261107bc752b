//! # Token-Gated Supplier Submission
//!
//! Everything a supplier can do with an invitation token: read their
//! response and its survey, attach evidence while the response is still
//! `Pending`, and submit answers once. The operator side lists every
//! response to a survey.
//!
//! A malformed or unknown token is a client error (`InvalidInput`). The
//! submission itself is validated by [`ResponseStateMachine`] and then
//! committed through the repository's compare-and-swap, so a concurrent
//! second submission observes `AlreadySubmitted`.

use std::sync::Arc;

use serde::Serialize;

use sct_core::{
    AccessToken, Answers, Document, SctError, Supplier, Survey, SurveyId, SurveyResponse, Timestamp,
};
use sct_state::ResponseStateMachine;

use crate::integrity::{DocumentIntegrityService, Upload};
use crate::repository::{DisclosureRepository, RepositoryError, SubmissionCommit};

/// What the supplier portal shows for a token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub response: SurveyResponse,
    pub survey: Survey,
    pub documents: Vec<Document>,
}

/// One row of the operator's response listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub response: SurveyResponse,
    pub documents: Vec<Document>,
    /// The linked supplier, when the response has one and it still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
}

/// Supplier-facing operations gated by an access token, plus the
/// operator's response listing.
#[derive(Clone)]
pub struct SubmissionService {
    repo: Arc<dyn DisclosureRepository>,
    integrity: DocumentIntegrityService,
}

impl SubmissionService {
    pub fn new(repo: Arc<dyn DisclosureRepository>, integrity: DocumentIntegrityService) -> Self {
        Self { repo, integrity }
    }

    /// The response, survey and documents behind `token`, which must belong
    /// to `survey_id`.
    pub fn view(&self, survey_id: SurveyId, token: &str) -> Result<ResponseView, SctError> {
        let response = self.resolve_for_survey(survey_id, token)?;
        let survey = self.repo.survey(&response.survey_id)?;
        let documents = self.repo.documents_for_response(&response.id)?;
        Ok(ResponseView {
            response,
            survey,
            documents,
        })
    }

    /// Submit `answers` for the response behind `token` (PENDING → SUBMITTED).
    ///
    /// A linked supplier moves to `Responded` in the same atomic commit.
    pub fn submit(
        &self,
        survey_id: SurveyId,
        token: &str,
        answers: Answers,
    ) -> Result<SurveyResponse, SctError> {
        let token = token.trim();
        let response = self.resolve_for_survey(survey_id, token)?;
        let survey = self.repo.survey(&response.survey_id)?;
        ResponseStateMachine::check_submission(&response, &survey, token, &answers)?;

        let (submitted, supplier) = self.repo.commit_submission(SubmissionCommit {
            response_id: response.id,
            answers,
            submitted_at: Timestamp::now(),
        })?;
        tracing::info!(
            response_id = %submitted.id,
            survey_id = %survey_id,
            supplier_id = ?supplier.as_ref().map(|s| s.id.to_string()),
            supplier_status = ?supplier.as_ref().map(|s| s.status.as_str()),
            "survey response submitted"
        );
        Ok(submitted)
    }

    /// Attach an evidence file to the response behind `token`.
    pub fn attach_document(&self, token: &str, upload: &Upload) -> Result<Document, SctError> {
        let response = self.resolve(token)?;
        ResponseStateMachine::require_pending(&response)?;
        self.integrity.ingest(response.id, upload)
    }

    /// Every response to `survey_id` with its documents and linked
    /// supplier, newest invitation first. Operator-side; no token needed.
    pub fn responses(&self, survey_id: &SurveyId) -> Result<Vec<ResponseRecord>, SctError> {
        self.repo.survey(survey_id)?;
        let mut records = self
            .repo
            .responses_for_survey(survey_id)?
            .into_iter()
            .map(|response| -> Result<ResponseRecord, SctError> {
                let documents = self.repo.documents_for_response(&response.id)?;
                let supplier = match response.supplier_id {
                    Some(id) => match self.repo.supplier(&id) {
                        Ok(s) => Some(s),
                        Err(RepositoryError::NotFound { .. }) => None,
                        Err(e) => return Err(e.into()),
                    },
                    None => None,
                };
                Ok(ResponseRecord {
                    response,
                    documents,
                    supplier,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();
        records.sort_by(|a, b| b.response.created_at.cmp(&a.response.created_at));
        Ok(records)
    }

    fn resolve_for_survey(&self, survey_id: SurveyId, token: &str) -> Result<SurveyResponse, SctError> {
        let response = self.resolve(token)?;
        if response.survey_id != survey_id {
            return Err(SctError::InvalidInput(
                "access token is not valid for this survey".into(),
            ));
        }
        Ok(response)
    }

    fn resolve(&self, token: &str) -> Result<SurveyResponse, SctError> {
        let parsed = AccessToken::new(token.trim())?;
        let response = match self.repo.response_by_token(&parsed) {
            Ok(r) => r,
            Err(RepositoryError::NotFound { .. }) => {
                return Err(SctError::InvalidInput("unknown access token".into()))
            }
            Err(e) => return Err(e.into()),
        };
        ResponseStateMachine::authorize(&response, parsed.as_str())?;
        Ok(response)
    }
}
