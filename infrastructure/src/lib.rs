//! Infrastructure layer: outbound adapters and configuration
//!
//! Everything here sits behind ports defined in the application layer.
//! The OpenRouter adapter implements [`council_application::LlmGateway`];
//! configuration loading merges TOML files and environment variables into
//! the domain's [`council_domain::CouncilConfig`].

pub mod config;
pub mod openrouter;

pub use config::{ConfigLoader, FileConfig};
pub use openrouter::OpenRouterGateway;
