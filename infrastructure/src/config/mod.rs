//! Configuration: TOML files merged with environment overrides

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, CouncilorEntry, FileConfig};
pub use loader::ConfigLoader;
