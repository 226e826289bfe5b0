//! Final deliberation artifact

use super::outcome::FailureRecord;
use super::review::PeerReview;
use super::synthesis::{Confidence, Disagreement, Synthesis};
use serde::{Deserialize, Serialize};

/// One councilor's answer under its real name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualAnswer {
    /// Display name of the councilor
    pub model: String,
    /// The councilor's first-opinion answer
    pub answer: String,
}

impl IndividualAnswer {
    pub fn new(model: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            answer: answer.into(),
        }
    }
}

/// Complete result of one council deliberation
///
/// Constructed once by the orchestrator after the synthesis stage and
/// immutable thereafter. The field names here are the contract external
/// renderers depend on; do not change them without a version bump.
///
/// A populated `errors` list does not mean the run failed: success is
/// "quorum met and chairman output valid", not "zero errors".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilResult {
    /// The question put before the council
    pub question: String,
    /// The chairman's synthesized answer
    pub final_answer: String,
    /// Disagreements in the order the chairman emitted them
    pub disagreements: Vec<Disagreement>,
    /// Points all councilors agreed on
    pub consensus_points: Vec<String>,
    /// Chairman's confidence in the synthesis
    pub confidence: Confidence,
    /// Optional qualifier on the confidence level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_note: Option<String>,
    /// Every successful first opinion, under real names, in council order
    pub individual_answers: Vec<IndividualAnswer>,
    /// Completed cross-reviews (empty in fast mode)
    pub peer_reviews: Vec<PeerReview>,
    /// Display name of the chairman model
    pub chairman: String,
    /// Display names of the full councilor lineup
    pub council: Vec<String>,
    /// Whether the cross-review stage was skipped
    pub stage2_skipped: bool,
    /// UTC start of the run, RFC 3339
    pub run_started_at: String,
    /// Wall-clock duration of the run
    pub run_duration_seconds: f64,
    /// Non-fatal failures recorded across all stages, in stage order
    pub errors: Vec<FailureRecord>,
}

impl CouncilResult {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        question: impl Into<String>,
        synthesis: Synthesis,
        individual_answers: Vec<IndividualAnswer>,
        peer_reviews: Vec<PeerReview>,
        chairman: impl Into<String>,
        council: Vec<String>,
        stage2_skipped: bool,
        run_started_at: impl Into<String>,
        run_duration_seconds: f64,
        errors: Vec<FailureRecord>,
    ) -> Self {
        Self {
            question: question.into(),
            final_answer: synthesis.final_answer,
            disagreements: synthesis.disagreements,
            consensus_points: synthesis.consensus_points,
            confidence: synthesis.confidence,
            confidence_note: synthesis.confidence_note,
            individual_answers,
            peer_reviews,
            chairman: chairman.into(),
            council,
            stage2_skipped,
            run_started_at: run_started_at.into(),
            run_duration_seconds,
            errors,
        }
    }

    /// True if any non-fatal failure was recorded during the run
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
