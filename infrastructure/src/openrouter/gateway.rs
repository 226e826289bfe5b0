//! OpenRouter gateway implementation
//!
//! One call per [`complete`](LlmGateway::complete); retry lives upstream in
//! the application layer, so this adapter only classifies failures.

use super::protocol::{API_URL, ChatRequest, ChatResponse};
use async_trait::async_trait;
use council_application::{ChatPrompt, GatewayError, LlmGateway};
use council_domain::ModelId;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const KEY_PREFIX: &str = "sk-or-";

/// Gateway for the OpenRouter chat-completions API
pub struct OpenRouterGateway {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenRouterGateway {
    /// Build a gateway with the given key and per-request timeout.
    ///
    /// The key shape is checked up front so a misconfigured key fails at
    /// startup instead of surfacing as N identical HTTP 401s mid-run.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if !api_key.starts_with(KEY_PREFIX) {
            return Err(GatewayError::AuthFailure(format!(
                "API key does not look like an OpenRouter key (expected {KEY_PREFIX}... prefix)"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            endpoint: API_URL.to_string(),
        })
    }

    /// Build a gateway from the `OPENROUTER_API_KEY` environment variable
    pub fn from_env(timeout: Duration) -> Result<Self, GatewayError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| GatewayError::AuthFailure(format!("{API_KEY_ENV} is not set")))?;
        Self::new(key, timeout)
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, model: &ModelId, prompt: &ChatPrompt) -> Result<String, GatewayError> {
        let request = ChatRequest::new(model.as_str(), &prompt.system, &prompt.user);

        debug!(model = %model, "dispatching chat completion");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", "llm-council")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        match parsed.content() {
            Some(content) => Ok(content.trim().to_string()),
            None => Err(GatewayError::InvalidResponse(
                "response carried no message content".to_string(),
            )),
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Connection(error.to_string())
    }
}

/// Map a non-2xx status onto the retry classification
fn classify_status(status: StatusCode, retry_after: Option<Duration>, body: &str) -> GatewayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::AuthFailure(summarize(body))
        }
        s if s.is_server_error() => GatewayError::ServerError { status: s.as_u16() },
        s => GatewayError::BadRequest(format!("HTTP {}: {}", s.as_u16(), summarize(body))),
    }
}

/// `Retry-After` in delay-seconds form; HTTP-date form is ignored
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn summarize(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    match trimmed.char_indices().nth(LIMIT) {
        Some((offset, _)) => format!("{}...", &trimmed[..offset]),
        None => trimmed.to_string(),
    }
}
