//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Council has no councilors")]
    EmptyCouncil,

    #[error("Invalid quorum: {0} (must be at least 1)")]
    InvalidQuorum(usize),
}
