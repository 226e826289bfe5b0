//! Council deliberation entities
//!
//! Value objects produced and consumed by the three deliberation stages:
//!
//! - [`outcome::ModelOutcome`] - result of one gateway call
//! - [`anonymize::ReviewAssignment`] - one reviewer's anonymized view of the others
//! - [`review::PeerReview`] - a completed cross-review
//! - [`synthesis::Synthesis`] - the chairman's structured fragment
//! - [`result::CouncilResult`] - the assembled final artifact

pub mod anonymize;
pub mod outcome;
pub mod parsing;
pub mod result;
pub mod review;
pub mod stage;
pub mod synthesis;
