//! # Surveys and Survey Responses
//!
//! A survey is a list of questions sent to the suppliers of one product.
//! Each invited supplier gets one [`SurveyResponse`], gated by a single-use
//! [`AccessToken`]. The response moves `Pending → Submitted` exactly once;
//! the transition rules live in `sct-state`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::{AccessToken, ProductId, QuestionId, ResponseId, SupplierId, SurveyId};
use crate::temporal::Timestamp;

/// Submitted answers keyed by question id.
pub type Answers = BTreeMap<String, serde_json::Value>;

/// Input widget type of a survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Select,
    Multiselect,
    File,
    Date,
    Number,
}

/// ESG grouping of a survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    General,
    Environmental,
    Social,
    Governance,
}

/// One question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyQuestion {
    /// Author-chosen identifier, unique within the survey.
    pub id: QuestionId,
    /// Input widget type.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Question text.
    pub question: String,
    /// Choices for select-style questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Whether an answer is mandatory for submission.
    pub required: bool,
    /// ESG grouping.
    pub category: QuestionCategory,
}

/// A questionnaire for the suppliers of one product tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    /// Unique survey identifier.
    pub id: SurveyId,
    /// The product this survey collects data for.
    pub product_id: ProductId,
    /// The supplier tier the survey is aimed at.
    pub supplier_tier: u32,
    /// Ordered questions.
    pub questions: Vec<SurveyQuestion>,
    /// When the survey was created.
    pub created_at: Timestamp,
}

impl Survey {
    /// Questions flagged `required`.
    pub fn required_questions(&self) -> impl Iterator<Item = &SurveyQuestion> {
        self.questions.iter().filter(|q| q.required)
    }

    /// Ids of required questions that `answers` leaves unanswered, in
    /// question order.
    pub fn missing_required<'a>(&'a self, answers: &Answers) -> Vec<&'a QuestionId> {
        self.required_questions()
            .filter(|q| !answers.get(q.id.as_str()).is_some_and(is_answered))
            .map(|q| &q.id)
            .collect()
    }
}

/// Whether an answer value carries content.
///
/// `null`, blank strings, and empty arrays count as unanswered.
pub fn is_answered(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Lifecycle state of a survey response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// Invitation issued; answers not yet submitted.
    Pending,
    /// Answers submitted (terminal).
    Submitted,
}

impl ResponseStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
        }
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One supplier's response to one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    /// Unique response identifier.
    pub id: ResponseId,
    /// The survey being answered.
    pub survey_id: SurveyId,
    /// Address the invitation was sent to.
    pub supplier_email: String,
    /// The supplier record this response is linked to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,
    /// Bearer capability for this response.
    pub token: AccessToken,
    /// Lifecycle state.
    pub status: ResponseStatus,
    /// Submitted answers; empty while pending.
    #[serde(default)]
    pub answers: Answers,
    /// Set once, on transition to `Submitted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,
    /// When the invitation was issued.
    pub created_at: Timestamp,
}

impl SurveyResponse {
    /// A fresh pending response for an invitation.
    pub fn pending(
        survey_id: SurveyId,
        supplier_email: impl Into<String>,
        supplier_id: Option<SupplierId>,
        token: AccessToken,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            survey_id,
            supplier_email: supplier_email.into(),
            supplier_id,
            token,
            status: ResponseStatus::Pending,
            answers: Answers::new(),
            submitted_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Whether the response has been submitted.
    pub fn is_submitted(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: &str, required: bool) -> SurveyQuestion {
        SurveyQuestion {
            id: QuestionId::new(id).unwrap(),
            kind: QuestionKind::Text,
            question: format!("Question {id}"),
            options: None,
            required,
            category: QuestionCategory::General,
        }
    }

    fn survey() -> Survey {
        Survey {
            id: SurveyId::new(),
            product_id: ProductId::new(),
            supplier_tier: 1,
            questions: vec![question("origin", true), question("notes", false), question("cert", true)],
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn missing_required_lists_unanswered_in_order() {
        let s = survey();
        let answers = Answers::new();
        let missing: Vec<&str> = s.missing_required(&answers).iter().map(|q| q.as_str()).collect();
        assert_eq!(missing, vec!["origin", "cert"]);
    }

    #[test]
    fn missing_required_ignores_optional_questions() {
        let s = survey();
        let mut answers = Answers::new();
        answers.insert("origin".into(), json!("India"));
        answers.insert("cert".into(), json!(["GOTS"]));
        assert!(s.missing_required(&answers).is_empty());
    }

    #[test]
    fn blank_and_null_answers_do_not_count() {
        assert!(!is_answered(&json!(null)));
        assert!(!is_answered(&json!("   ")));
        assert!(!is_answered(&json!([])));
        assert!(is_answered(&json!(0)));
        assert!(is_answered(&json!(false)));
        assert!(is_answered(&json!({"k": "v"})));
    }

    #[test]
    fn question_kind_serializes_as_type() {
        let value = serde_json::to_value(question("q", true)).unwrap();
        assert_eq!(value["type"], json!("text"));
        assert_eq!(value["category"], json!("general"));
    }

    #[test]
    fn pending_response_has_no_answers() {
        let token = AccessToken::new("a".repeat(64)).unwrap();
        let r = SurveyResponse::pending(SurveyId::new(), "s@example.test", None, token);
        assert_eq!(r.status, ResponseStatus::Pending);
        assert!(r.answers.is_empty());
        assert!(r.submitted_at.is_none());
        assert!(!r.is_submitted());
    }

    #[test]
    fn response_status_display() {
        assert_eq!(ResponseStatus::Pending.to_string(), "PENDING");
        assert_eq!(ResponseStatus::Submitted.to_string(), "SUBMITTED");
    }
}
