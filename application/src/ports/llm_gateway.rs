//! LLM Gateway port
//!
//! Defines the one outbound call type this pipeline makes: a prompt to a
//! named model, answered with text. Implementations (adapters) live in the
//! infrastructure layer.

use async_trait::async_trait;
use council_domain::ModelId;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a single gateway call
///
/// The variants carry the classification the retry policy branches on:
/// [`is_transient`](GatewayError::is_transient) errors are retried with
/// backoff, everything else fails immediately.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("rate limited (HTTP 429)")]
    RateLimited {
        /// Server-suggested wait before retrying, if it sent one
        retry_after: Option<Duration>,
    },

    #[error("server error (HTTP {status})")]
    ServerError { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    #[error("call cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Whether the retry policy should give this error another attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited { .. }
                | GatewayError::ServerError { .. }
                | GatewayError::Timeout
                | GatewayError::Connection(_)
        )
    }

    /// Server-suggested retry delay, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// A two-part prompt for one model call
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Gateway for LLM communication
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one prompt to one model and return its raw text response
    async fn complete(&self, model: &ModelId, prompt: &ChatPrompt) -> Result<String, GatewayError>;
}
