//! Gateway call outcomes
//!
//! Every call to an upstream model normalizes to a [`ModelOutcome`] at the
//! gateway-client boundary. No raw transport error crosses into pipeline
//! logic; callers only ever branch on the outcome discriminant.

use crate::core::councilor::Councilor;
use serde::{Deserialize, Serialize};

/// Classification of a failed gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Transient errors (rate limit, server error, timeout) retried to exhaustion
    TransientExhausted,
    /// Bad request or authentication failure; never retried
    NonRetryable,
    /// The run's cancellation signal fired while the call was in flight
    Cancelled,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::TransientExhausted => "transient_exhausted",
            FailureClass::NonRetryable => "non_retryable",
            FailureClass::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one gateway call, immutable once produced
#[derive(Debug, Clone)]
pub enum ModelOutcome {
    /// The model answered
    Answered { councilor: Councilor, answer: String },
    /// The call failed after the gateway client's retry policy ran its course
    Failed {
        councilor: Councilor,
        class: FailureClass,
        message: String,
    },
}

impl ModelOutcome {
    pub fn councilor(&self) -> &Councilor {
        match self {
            ModelOutcome::Answered { councilor, .. } => councilor,
            ModelOutcome::Failed { councilor, .. } => councilor,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ModelOutcome::Answered { .. })
    }

    /// The answer text, if the call succeeded
    pub fn answer(&self) -> Option<&str> {
        match self {
            ModelOutcome::Answered { answer, .. } => Some(answer),
            ModelOutcome::Failed { .. } => None,
        }
    }

    /// A serializable failure record, if the call failed
    pub fn failure_record(&self) -> Option<FailureRecord> {
        match self {
            ModelOutcome::Answered { .. } => None,
            ModelOutcome::Failed {
                councilor,
                class,
                message,
            } => Some(FailureRecord {
                model: councilor.name.clone(),
                class: *class,
                error: message.clone(),
            }),
        }
    }
}

/// One recorded failure, surfaced in the final result's `errors` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Display name of the model that failed
    pub model: String,
    /// Failure classification
    pub class: FailureClass,
    /// Last error message observed for this call
    pub error: String,
}
