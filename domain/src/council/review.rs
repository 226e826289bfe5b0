//! Completed cross-reviews

use serde::{Deserialize, Serialize};

/// One councilor's critique of the other answers
///
/// The review text refers to the anonymous labels the reviewer was shown,
/// never to real model names. Only the text crosses into the chairman's
/// prompt; the reviewer name exists for the final report alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerReview {
    /// Display name of the reviewing councilor
    pub reviewer: String,
    /// Free-form review text, label-anonymized
    pub review: String,
}

impl PeerReview {
    pub fn new(reviewer: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            reviewer: reviewer.into(),
            review: review.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_review_serialization() {
        let review = PeerReview::new("Hermes 3 405B", "Model A is strongest on risk coverage.");
        let json = serde_json::to_string(&review).unwrap();
        assert!(json.contains("\"reviewer\":\"Hermes 3 405B\""));
        assert!(json.contains("Model A"));
    }
}
