//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects
//! of the council deliberation pipeline. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A small fixed panel of independently-queried models deliberates in
//! three stages:
//!
//! - **First Opinions**: every councilor answers the question independently
//! - **Cross-Review**: each councilor critiques the others' answers under
//!   anonymous labels
//! - **Synthesis**: a designated chairman model merges answers and reviews
//!   into one structured result
//!
//! ## Quorum
//!
//! The minimum number of successful councilor answers required to proceed
//! past the first stage. Below quorum the whole deliberation aborts.

pub mod core;
pub mod council;
pub mod prompt;

// Re-export commonly used types
pub use crate::core::{
    councilor::{CouncilConfig, Councilor, ModelId, Role},
    error::DomainError,
    question::Question,
};
pub use council::{
    anonymize::{LabeledAnswer, ReviewAssignment, label_for},
    outcome::{FailureClass, FailureRecord, ModelOutcome},
    parsing::extract_payload,
    result::{CouncilResult, IndividualAnswer},
    review::PeerReview,
    stage::Stage,
    synthesis::{Confidence, Disagreement, Synthesis, SynthesisError},
};
pub use prompt::PromptTemplate;
