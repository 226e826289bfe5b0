//! Deliberation stages

use serde::{Deserialize, Serialize};

/// The three stages of a council deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage 1: every councilor answers independently
    FirstOpinions,
    /// Stage 2: each councilor reviews the others under anonymous labels
    CrossReview,
    /// Stage 3: the chairman synthesizes answers and reviews
    Synthesis,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FirstOpinions => "first_opinions",
            Stage::CrossReview => "cross_review",
            Stage::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::FirstOpinions => "Stage 1: First Opinions",
            Stage::CrossReview => "Stage 2: Cross-Review",
            Stage::Synthesis => "Stage 3: Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::FirstOpinions.as_str(), "first_opinions");
        assert_eq!(Stage::CrossReview.display_name(), "Stage 2: Cross-Review");
        assert_eq!(Stage::Synthesis.to_string(), "Stage 3: Synthesis");
    }
}
