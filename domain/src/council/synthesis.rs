//! Chairman synthesis fragment and its validation
//!
//! The chairman is asked for a specific JSON shape but is a free-text
//! generator and not trusted to produce it. [`Synthesis::from_value`] is
//! the validation gate between "some JSON parsed" and "a usable result":
//! required fields must be present with the right shapes, and an
//! out-of-enum confidence is coerced to `low` with a note rather than
//! propagated downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Chairman's stated confidence in the synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    /// Parse a chairman-emitted confidence string, tolerating case and
    /// surrounding whitespace but nothing else
    pub fn from_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One disagreement the chairman observed between councilors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disagreement {
    /// Short label for what was disputed
    pub topic: String,
    /// What the disagreement was and why it matters
    pub summary: String,
    /// The chairman's ruling on which position is stronger
    pub chairman_verdict: String,
}

/// Validation errors for the chairman's parsed output
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has the wrong shape (expected {expected})")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `final_answer` is empty")]
    EmptyFinalAnswer,
}

/// The chairman's structured fragment of the final result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    /// The synthesized answer to the question
    pub final_answer: String,
    /// Disagreements in the order the chairman emitted them
    pub disagreements: Vec<Disagreement>,
    /// Points all councilors agreed on
    pub consensus_points: Vec<String>,
    /// Chairman's confidence, always one of the three enum values
    pub confidence: Confidence,
    /// Optional note qualifying the confidence level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_note: Option<String>,
}

impl Synthesis {
    /// Validate a parsed chairman payload into a `Synthesis`.
    ///
    /// `final_answer` must be a non-empty string. `disagreements` and
    /// `consensus_points` may be absent (treated as empty) but must have
    /// the right shape when present. `confidence` outside the enum is
    /// coerced to `low` with an explanatory note appended.
    pub fn from_value(value: Value) -> Result<Self, SynthesisError> {
        let obj = match value {
            Value::Object(map) => map,
            _ => {
                return Err(SynthesisError::WrongShape {
                    field: "<root>",
                    expected: "a JSON object",
                });
            }
        };

        let final_answer = match obj.get("final_answer") {
            None | Some(Value::Null) => return Err(SynthesisError::MissingField("final_answer")),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                return Err(SynthesisError::WrongShape {
                    field: "final_answer",
                    expected: "a string",
                });
            }
        };
        if final_answer.is_empty() {
            return Err(SynthesisError::EmptyFinalAnswer);
        }

        let disagreements = match obj.get("disagreements") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Self::disagreement_from_value(item)?);
                }
                out
            }
            Some(_) => {
                return Err(SynthesisError::WrongShape {
                    field: "disagreements",
                    expected: "a sequence of objects",
                });
            }
        };

        let consensus_points = match obj.get("consensus_points") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        _ => {
                            return Err(SynthesisError::WrongShape {
                                field: "consensus_points",
                                expected: "a sequence of strings",
                            });
                        }
                    }
                }
                out
            }
            Some(_) => {
                return Err(SynthesisError::WrongShape {
                    field: "consensus_points",
                    expected: "a sequence of strings",
                });
            }
        };

        let mut confidence_note = match obj.get("confidence_note") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };

        let confidence = match obj.get("confidence").and_then(Value::as_str) {
            Some(raw) => match Confidence::from_loose(raw) {
                Some(c) => c,
                None => {
                    Self::append_note(
                        &mut confidence_note,
                        format!("confidence \"{}\" was not recognized; coerced to low", raw),
                    );
                    Confidence::Low
                }
            },
            None => {
                Self::append_note(
                    &mut confidence_note,
                    "confidence was absent; coerced to low".to_string(),
                );
                Confidence::Low
            }
        };

        Ok(Self {
            final_answer,
            disagreements,
            consensus_points,
            confidence,
            confidence_note,
        })
    }

    fn disagreement_from_value(value: &Value) -> Result<Disagreement, SynthesisError> {
        let get_str = |field: &'static str| -> Result<String, SynthesisError> {
            value
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(SynthesisError::WrongShape {
                    field: "disagreements",
                    expected: "objects with string topic/summary/chairman_verdict",
                })
        };
        Ok(Disagreement {
            topic: get_str("topic")?,
            summary: get_str("summary")?,
            chairman_verdict: get_str("chairman_verdict")?,
        })
    }

    fn append_note(note: &mut Option<String>, addition: String) {
        match note {
            Some(existing) => {
                existing.push_str(" (");
                existing.push_str(&addition);
                existing.push(')');
            }
            None => *note = Some(addition),
        }
    }
}
