//! Anonymized review assignments
//!
//! Stage 2 shows each reviewer the *other* successful answers under opaque
//! labels drawn from a fixed alphabet ("Model A", "Model B", ...). The
//! label-to-councilor mapping is private to one reviewer's invocation and
//! never crosses into later stages; only the labeled answer texts do.
//!
//! Fairness invariants:
//! - a reviewer never sees its own answer under any label
//! - each reviewer draws its own independent random permutation, so label
//!   ordering is never predictable across reviewers

use crate::core::councilor::Councilor;
use rand::Rng;
use rand::seq::SliceRandom;

/// Opaque label for the answer at `index` in a reviewer's assignment
pub fn label_for(index: usize) -> String {
    debug_assert!(index < 26, "label alphabet exhausted");
    format!("Model {}", (b'A' + index as u8) as char)
}

/// One labeled answer as shown to a reviewer
#[derive(Debug, Clone)]
pub struct LabeledAnswer {
    label: String,
    answer: String,
}

impl LabeledAnswer {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// One reviewer's anonymized view of the other successful answers
///
/// The mapping from label to real councilor stays inside this value and is
/// deliberately not exposed; downstream code sees labels only.
#[derive(Debug, Clone)]
pub struct ReviewAssignment {
    reviewer: Councilor,
    // (label, real councilor name, answer) - the middle element never leaves
    entries: Vec<(String, String, String)>,
}

impl ReviewAssignment {
    /// Build the assignment for `reviewer` from all successful answers.
    ///
    /// The reviewer's own answer is excluded; the rest are shuffled with the
    /// caller-supplied random source and labeled in shuffled order. Returns
    /// `None` when there is nothing for this reviewer to review.
    pub fn build<R: Rng>(
        reviewer: &Councilor,
        answers: &[(Councilor, String)],
        rng: &mut R,
    ) -> Option<Self> {
        let mut others: Vec<&(Councilor, String)> = answers
            .iter()
            .filter(|(c, _)| c.model != reviewer.model)
            .collect();

        if others.is_empty() {
            return None;
        }

        others.shuffle(rng);

        let entries = others
            .into_iter()
            .enumerate()
            .map(|(i, (councilor, answer))| {
                (label_for(i), councilor.name.clone(), answer.clone())
            })
            .collect();

        Some(Self {
            reviewer: reviewer.clone(),
            entries,
        })
    }

    pub fn reviewer(&self) -> &Councilor {
        &self.reviewer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The labeled answers in label order, identities stripped
    pub fn labeled_answers(&self) -> Vec<LabeledAnswer> {
        self.entries
            .iter()
            .map(|(label, _, answer)| LabeledAnswer {
                label: label.clone(),
                answer: answer.clone(),
            })
            .collect()
    }
}
