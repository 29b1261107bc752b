//! # Survey Response Lifecycle
//!
//! ## States
//!
//! ```text
//! Pending ──submit──▶ Submitted (terminal)
//! ```
//!
//! `Pending` is entered when an invitation mints the response's token.
//! `submit` requires, in order:
//!
//! 1. the presented token matches the response's token (constant time),
//! 2. the response is still `Pending`,
//! 3. the answers belong to the response's own survey,
//! 4. the answers are non-empty,
//! 5. every required question of the survey has an answer.
//!
//! A rejected submission leaves the record untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sct_core::{
    AccessToken, Answers, ResponseStatus, SctError, SupplierId, Survey, SurveyId, SurveyResponse,
    Timestamp,
};
use sct_crypto::tokens_match;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from survey response transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The presented token does not grant access to this response.
    #[error("access token does not match this survey response")]
    TokenMismatch,

    /// The response already left `Pending`.
    #[error("survey response {response_id} has already been submitted")]
    AlreadySubmitted {
        /// The response that rejected the transition.
        response_id: String,
    },

    /// The response belongs to a different survey.
    #[error("survey response belongs to survey {actual}, not {expected}")]
    SurveyMismatch {
        /// Survey the caller addressed.
        expected: String,
        /// Survey the response belongs to.
        actual: String,
    },

    /// The answers payload is empty.
    #[error("answers must not be empty")]
    EmptyAnswers,

    /// Required questions were left unanswered.
    #[error("missing answers for required questions: {}", .questions.join(", "))]
    MissingRequired {
        /// Question ids in survey order.
        questions: Vec<String>,
    },
}

impl From<ResponseError> for SctError {
    fn from(e: ResponseError) -> Self {
        match e {
            ResponseError::AlreadySubmitted { response_id } => {
                SctError::AlreadySubmitted { response_id }
            }
            other => SctError::InvalidInput(other.to_string()),
        }
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a response state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTransitionRecord {
    /// State before the transition.
    pub from_state: ResponseStatus,
    /// State after the transition.
    pub to_state: ResponseStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
}

// ─── State Machine ───────────────────────────────────────────────────

/// Transition rules for [`SurveyResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseStateMachine;

impl ResponseStateMachine {
    /// Enter `Pending` for a freshly issued invitation.
    pub fn open(
        survey_id: SurveyId,
        supplier_email: impl Into<String>,
        supplier_id: Option<SupplierId>,
        token: AccessToken,
    ) -> SurveyResponse {
        SurveyResponse::pending(survey_id, supplier_email, supplier_id, token)
    }

    /// Check that `presented` is the token of `response`.
    pub fn authorize(response: &SurveyResponse, presented: &str) -> Result<(), ResponseError> {
        if tokens_match(presented, &response.token) {
            Ok(())
        } else {
            Err(ResponseError::TokenMismatch)
        }
    }

    /// Check that `response` still accepts changes (documents or answers).
    pub fn require_pending(response: &SurveyResponse) -> Result<(), ResponseError> {
        match response.status {
            ResponseStatus::Pending => Ok(()),
            ResponseStatus::Submitted => Err(ResponseError::AlreadySubmitted {
                response_id: response.id.to_string(),
            }),
        }
    }

    /// Run every submission precondition without mutating anything.
    pub fn check_submission(
        response: &SurveyResponse,
        survey: &Survey,
        presented: &str,
        answers: &Answers,
    ) -> Result<(), ResponseError> {
        Self::authorize(response, presented)?;
        Self::require_pending(response)?;
        if response.survey_id != survey.id {
            return Err(ResponseError::SurveyMismatch {
                expected: survey.id.to_string(),
                actual: response.survey_id.to_string(),
            });
        }
        if answers.is_empty() {
            return Err(ResponseError::EmptyAnswers);
        }
        let missing = survey.missing_required(answers);
        if !missing.is_empty() {
            return Err(ResponseError::MissingRequired {
                questions: missing.iter().map(|q| q.to_string()).collect(),
            });
        }
        Ok(())
    }

    /// Submit `answers` (PENDING → SUBMITTED).
    ///
    /// Sets `answers`, `status` and `submitted_at = at` together. On error
    /// the response is left exactly as it was.
    pub fn submit(
        response: &mut SurveyResponse,
        survey: &Survey,
        presented: &str,
        answers: Answers,
        at: Timestamp,
    ) -> Result<ResponseTransitionRecord, ResponseError> {
        Self::check_submission(response, survey, presented, &answers)?;
        response.answers = answers;
        response.submitted_at = Some(at);
        response.status = ResponseStatus::Submitted;
        tracing::debug!(response_id = %response.id, "survey response submitted");
        Ok(ResponseTransitionRecord {
            from_state: ResponseStatus::Pending,
            to_state: ResponseStatus::Submitted,
            timestamp: at,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
