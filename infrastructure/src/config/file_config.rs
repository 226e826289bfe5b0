//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They stay string-typed at the edges and convert into domain types on
//! demand, so a bad file fails with a configuration error instead of a
//! deserialization panic.

use council_application::RetryPolicy;
use council_domain::{CouncilConfig, Councilor, DomainError, Role};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("invalid council: {0}")]
    Council(#[from] DomainError),

    #[error("request_timeout_secs cannot be 0")]
    InvalidTimeout,
}

/// One model seat in the council, as written in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilorEntry {
    /// Provider-qualified model identifier
    pub model: String,
    /// Display name used in output and logs
    pub name: String,
    /// Advisory role; unknown strings become custom roles
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    Role::Generalist.as_str().to_string()
}

impl CouncilorEntry {
    fn to_councilor(&self) -> Councilor {
        let role = self.role.parse::<Role>().unwrap_or(Role::Generalist);
        Councilor::new(self.model.clone(), self.name.clone(), role)
    }

    fn from_councilor(councilor: &Councilor) -> Self {
        Self {
            model: councilor.model.as_str().to_string(),
            name: councilor.name.clone(),
            role: councilor.role.as_str().to_string(),
        }
    }
}

/// `[council]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilSection {
    pub councilors: Vec<CouncilorEntry>,
    pub chairman: CouncilorEntry,
    pub min_quorum: usize,
}

impl Default for FileCouncilSection {
    fn default() -> Self {
        let defaults = CouncilConfig::default_council();
        Self {
            councilors: defaults
                .councilors
                .iter()
                .map(CouncilorEntry::from_councilor)
                .collect(),
            chairman: CouncilorEntry::from_councilor(&defaults.chairman),
            min_quorum: defaults.min_quorum,
        }
    }
}

/// `[behavior]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorSection {
    /// Skip the cross-review stage
    pub fast: bool,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
    /// Base of the exponential backoff between retries
    pub retry_base_delay_secs: u64,
}

impl Default for FileBehaviorSection {
    fn default() -> Self {
        Self {
            fast: false,
            request_timeout_secs: 120,
            max_retries: 2,
            retry_base_delay_secs: 2,
        }
    }
}

/// Complete configuration file shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub council: FileCouncilSection,
    pub behavior: FileBehaviorSection,
}

impl FileConfig {
    /// Convert the `[council]` section into a validated domain config
    pub fn council_config(&self) -> Result<CouncilConfig, ConfigValidationError> {
        let config = CouncilConfig::new(
            self.council
                .councilors
                .iter()
                .map(CouncilorEntry::to_councilor)
                .collect(),
            self.council.chairman.to_councilor(),
        )
        .with_min_quorum(self.council.min_quorum);
        config.validate()?;
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.behavior.max_retries,
            base_delay: Duration::from_secs(self.behavior.retry_base_delay_secs),
        }
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigValidationError> {
        if self.behavior.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(Duration::from_secs(self.behavior.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lineup_matches_builtin_council() {
        let config = FileConfig::default();
        assert_eq!(config.council.councilors.len(), 4);
        assert_eq!(config.council.chairman.model, "moonshotai/kimi-k2.5:free");
        assert_eq!(config.council.min_quorum, 2);

        let council = config.council_config().unwrap();
        assert_eq!(council.councilors.len(), 4);
        assert_eq!(council.councilors[0].role, Role::Reasoner);
    }

    #[test]
    fn test_parse_full_toml() {
        let raw = r#"
            [council]
            min_quorum = 3

            [[council.councilors]]
            model = "a/one"
            name = "One"
            role = "reasoner"

            [[council.councilors]]
            model = "a/two"
            name = "Two"
            role = "skeptic"

            [[council.councilors]]
            model = "a/three"
            name = "Three"

            [council.chairman]
            model = "a/chair"
            name = "Chair"
            role = "chairman"

            [behavior]
            fast = true
            request_timeout_secs = 60
            max_retries = 1
            retry_base_delay_secs = 5
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        let council = config.council_config().unwrap();

        assert_eq!(council.min_quorum, 3);
        assert_eq!(council.councilors[1].role, Role::Custom("skeptic".to_string()));
        // Omitted role falls back to generalist
        assert_eq!(council.councilors[2].role, Role::Generalist);
        assert!(config.behavior.fast);
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(60));

        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.base_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_council_fails_validation() {
        let raw = r#"
            [council]
            councilors = []
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert!(matches!(
            config.council_config(),
            Err(ConfigValidationError::Council(DomainError::EmptyCouncil))
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let raw = r#"
            [behavior]
            request_timeout_secs = 0
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert!(matches!(
            config.request_timeout(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }
}
