//! Councilor identity and council configuration

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upstream model identifier (Value Object)
///
/// The fully-qualified model name as the serving API knows it,
/// e.g. `deepseek/deepseek-r1-0528:free`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId::new(s)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        ModelId::new(s)
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(ModelId(String::deserialize(deserializer)?))
    }
}

/// Cognitive role a councilor plays in the deliberation (Value Object)
///
/// Roles shape nothing mechanically; they document why a model is on
/// the council and are surfaced in logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Reasoner,
    Knowledge,
    Structuralist,
    Generalist,
    Custom(String),
}

impl Role {
    fn parse_loose(s: &str) -> Role {
        match s.to_ascii_lowercase().as_str() {
            "reasoner" => Role::Reasoner,
            "knowledge" => Role::Knowledge,
            "structuralist" => Role::Structuralist,
            "generalist" => Role::Generalist,
            _ => Role::Custom(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Reasoner => "reasoner",
            Role::Knowledge => "knowledge",
            Role::Structuralist => "structuralist",
            Role::Generalist => "generalist",
            Role::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Role::parse_loose(s))
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Role::parse_loose(&s))
    }
}

/// One named model on the council
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Councilor {
    /// Upstream model identifier
    pub model: ModelId,
    /// Human-readable display name
    pub name: String,
    /// Cognitive role on the council
    pub role: Role,
}

impl Councilor {
    pub fn new(model: impl Into<ModelId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
            role,
        }
    }
}

impl std::fmt::Display for Councilor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Immutable council lineup passed into the orchestrator
///
/// Carries the ordered councilor pool, the designated chairman (which
/// may reuse a councilor's model), and the quorum floor. Constructed
/// once per run; never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Ordered councilor pool queried in stages 1 and 2
    pub councilors: Vec<Councilor>,
    /// Model performing the final synthesis
    pub chairman: Councilor,
    /// Minimum successful first opinions required to proceed
    pub min_quorum: usize,
}

impl CouncilConfig {
    pub const DEFAULT_MIN_QUORUM: usize = 2;

    pub fn new(councilors: Vec<Councilor>, chairman: Councilor) -> Self {
        Self {
            councilors,
            chairman,
            min_quorum: Self::DEFAULT_MIN_QUORUM,
        }
    }

    pub fn with_min_quorum(mut self, min_quorum: usize) -> Self {
        self.min_quorum = min_quorum;
        self
    }

    /// The default council lineup
    pub fn default_council() -> Self {
        Self::new(
            vec![
                Councilor::new(
                    "deepseek/deepseek-r1-0528:free",
                    "DeepSeek R1",
                    Role::Reasoner,
                ),
                Councilor::new(
                    "nousresearch/hermes-3-llama-3.1-405b:free",
                    "Hermes 3 405B",
                    Role::Knowledge,
                ),
                Councilor::new("qwen/qwen3-coder:free", "Qwen3 Coder 480B", Role::Structuralist),
                Councilor::new(
                    "meta-llama/llama-3.3-70b-instruct:free",
                    "Llama 3.3 70B",
                    Role::Generalist,
                ),
            ],
            Councilor::new(
                "moonshotai/kimi-k2.5:free",
                "Kimi K2.5 (Chairman)",
                Role::Custom("chairman".to_string()),
            ),
        )
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.councilors.is_empty() {
            return Err(DomainError::EmptyCouncil);
        }
        if self.min_quorum == 0 {
            return Err(DomainError::InvalidQuorum(self.min_quorum));
        }
        Ok(())
    }

    /// Display names of all councilors, in council order
    pub fn councilor_names(&self) -> Vec<String> {
        self.councilors.iter().map(|c| c.name.clone()).collect()
    }
}
