//! Core domain types
//!
//! Fundamental value objects shared across the deliberation pipeline.

pub mod councilor;
pub mod error;
pub mod question;
