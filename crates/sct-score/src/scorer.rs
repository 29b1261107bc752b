//! # Transparency Scorer
//!
//! Four weighted components over the counts in [`ScoreInputs`]: a flat 20
//! points for having any supplier, up to 40 for the responded share, 5 per
//! supplier-linked document capped at 25, and 3 per verified document
//! capped at 15. The total is rounded half away from zero, then capped at
//! 100. Only documents on responses linked to one of the product's
//! suppliers are counted.

use serde::{Deserialize, Serialize};

use sct_core::ProductSnapshot;

const PRESENCE_POINTS: f64 = 20.0;
const COVERAGE_POINTS: f64 = 40.0;
const POINTS_PER_DOCUMENT: usize = 5;
const DOCUMENT_CAP: usize = 25;
const POINTS_PER_VERIFIED_DOCUMENT: usize = 3;
const VERIFIED_CAP: usize = 15;
const MAX_SCORE: f64 = 100.0;

/// The counts the score is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInputs {
    pub total_suppliers: usize,
    /// Suppliers whose status is `Responded` or `Verified`.
    pub responded_suppliers: usize,
    pub total_documents: usize,
    pub verified_documents: usize,
}

impl ScoreInputs {
    /// Count suppliers and supplier-linked documents in `snapshot`.
    pub fn from_snapshot(snapshot: &ProductSnapshot) -> Self {
        let (total_documents, verified_documents) = snapshot
            .supplier_documents()
            .fold((0, 0), |(total, verified), d| {
                (total + 1, verified + usize::from(d.verified))
            });
        Self {
            total_suppliers: snapshot.suppliers.len(),
            responded_suppliers: snapshot.responded_suppliers(),
            total_documents,
            verified_documents,
        }
    }

    /// Responded share in `[0, 1]`; zero when there are no suppliers.
    fn response_ratio(&self) -> f64 {
        if self.total_suppliers == 0 {
            return 0.0;
        }
        (self.responded_suppliers as f64 / self.total_suppliers as f64).min(1.0)
    }
}

/// Points contributed by each weighting component, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub presence: f64,
    pub response_coverage: f64,
    pub document_volume: f64,
    pub verified_documents: f64,
}

impl ScoreBreakdown {
    /// Unrounded sum of all components.
    pub fn total(&self) -> f64 {
        self.presence + self.response_coverage + self.document_volume + self.verified_documents
    }
}

/// Result of one scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyScore {
    /// Composite score in `0..=100`.
    pub transparency_score: u8,
    /// `round(100 × responded / total)`, or 0 with no suppliers.
    pub supplier_completion_rate: u8,
    pub breakdown: ScoreBreakdown,
}

/// Pure scoring over supplier and document counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransparencyScorer;

impl TransparencyScorer {
    /// Score a product snapshot.
    pub fn score(snapshot: &ProductSnapshot) -> TransparencyScore {
        Self::score_inputs(&ScoreInputs::from_snapshot(snapshot))
    }

    /// Score pre-computed counts.
    pub fn score_inputs(inputs: &ScoreInputs) -> TransparencyScore {
        let ratio = inputs.response_ratio();
        let breakdown = ScoreBreakdown {
            presence: if inputs.total_suppliers > 0 {
                PRESENCE_POINTS
            } else {
                0.0
            },
            response_coverage: COVERAGE_POINTS * ratio,
            document_volume: inputs
                .total_documents
                .saturating_mul(POINTS_PER_DOCUMENT)
                .min(DOCUMENT_CAP) as f64,
            verified_documents: inputs
                .verified_documents
                .saturating_mul(POINTS_PER_VERIFIED_DOCUMENT)
                .min(VERIFIED_CAP) as f64,
        };

        // Every component is non-negative, so the casts cannot wrap.
        let transparency_score = breakdown.total().round().min(MAX_SCORE) as u8;
        let supplier_completion_rate = (100.0 * ratio).round() as u8;

        tracing::debug!(
            total_suppliers = inputs.total_suppliers,
            responded_suppliers = inputs.responded_suppliers,
            total_documents = inputs.total_documents,
            verified_documents = inputs.verified_documents,
            transparency_score,
            supplier_completion_rate,
            "transparency score computed"
        );

        TransparencyScore {
            transparency_score,
            supplier_completion_rate,
            breakdown,
        }
    }
}
