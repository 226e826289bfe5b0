//! Retrying gateway client
//!
//! Wraps a raw [`LlmGateway`] in the bounded retry policy and normalizes
//! every failure path into a [`ModelOutcome`]. This is the seam that makes
//! every caller's error handling uniform: nothing downstream of
//! [`GatewayClient::call`] ever sees a transport error.

use crate::ports::llm_gateway::{ChatPrompt, GatewayError, LlmGateway};
use async_trait::async_trait;
use council_domain::{Councilor, FailureClass, ModelOutcome};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bounded-attempt retry configuration
///
/// A call is attempted `max_retries + 1` times. Only transient errors are
/// retried; the delay before retry `n` is `base_delay * 2^n` plus jitter,
/// unless the server suggested its own wait.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (0-based)
    fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
        self.base_delay * 2u32.saturating_pow(attempt) + jitter
    }
}

/// Async sleep, injectable so retry ceilings are testable without delays
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Gateway wrapper applying the retry policy to every call
pub struct GatewayClient<G> {
    gateway: Arc<G>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<G> Clone for GatewayClient<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            policy: self.policy,
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<G: LlmGateway> GatewayClient<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Call one model with bounded retry, never propagating an error.
    ///
    /// Transient failures are retried up to the policy ceiling with
    /// exponential backoff; non-transient failures return immediately.
    /// Every exit path is a [`ModelOutcome`].
    pub async fn call(&self, councilor: &Councilor, prompt: &ChatPrompt) -> ModelOutcome {
        let attempts = self.policy.max_retries + 1;

        for attempt in 0..attempts {
            match self.gateway.complete(&councilor.model, prompt).await {
                Ok(answer) => {
                    return ModelOutcome::Answered {
                        councilor: councilor.clone(),
                        answer,
                    };
                }
                Err(error) if error.is_transient() => {
                    if attempt + 1 < attempts {
                        let delay = error
                            .retry_after()
                            .unwrap_or_else(|| self.policy.delay_for(attempt));
                        warn!(
                            model = %councilor.name,
                            %error,
                            delay_ms = delay.as_millis() as u64,
                            "transient gateway error, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                    } else {
                        return ModelOutcome::Failed {
                            councilor: councilor.clone(),
                            class: FailureClass::TransientExhausted,
                            message: format!("{error} after {attempts} attempts"),
                        };
                    }
                }
                Err(GatewayError::Cancelled) => {
                    return ModelOutcome::Failed {
                        councilor: councilor.clone(),
                        class: FailureClass::Cancelled,
                        message: "call cancelled".to_string(),
                    };
                }
                Err(error) => {
                    return ModelOutcome::Failed {
                        councilor: councilor.clone(),
                        class: FailureClass::NonRetryable,
                        message: error.to_string(),
                    };
                }
            }
        }

        // attempts >= 1, so the loop always returns
        unreachable!("retry loop exited without an outcome")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ModelId, Role};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedGateway {
        scripts: Mutex<HashMap<String, Vec<Result<String, GatewayError>>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedGateway {
        fn new(scripts: Vec<(&str, Vec<Result<String, GatewayError>>)>) -> Self {
            Self {
                scripts: Mutex::new(
                    scripts
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                ),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(
            &self,
            model: &ModelId,
            _prompt: &ChatPrompt,
        ) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.get_mut(model.as_str()).expect("unscripted model");
            queue.remove(0)
        }
    }

    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn new() -> Self {
            Self {
                delays: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    fn councilor() -> Councilor {
        Councilor::new("test/model", "Test Model", Role::Generalist)
    }

    fn prompt() -> ChatPrompt {
        ChatPrompt::new("system", "user")
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![Ok("an answer".to_string())],
        )]));
        let client = GatewayClient::new(Arc::clone(&gateway));

        let outcome = client.call(&councilor(), &prompt()).await;
        assert_eq!(outcome.answer(), Some("an answer"));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_error_then_success() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![
                Err(GatewayError::ServerError { status: 502 }),
                Ok("recovered".to_string()),
            ],
        )]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = GatewayClient::new(Arc::clone(&gateway)).with_sleeper(sleeper.clone());

        let outcome = client.call(&councilor(), &prompt()).await;
        assert_eq!(outcome.answer(), Some("recovered"));
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(sleeper.delays.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transient_exhaustion() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![
                Err(GatewayError::RateLimited { retry_after: None }),
                Err(GatewayError::RateLimited { retry_after: None }),
                Err(GatewayError::RateLimited { retry_after: None }),
            ],
        )]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = GatewayClient::new(Arc::clone(&gateway)).with_sleeper(sleeper.clone());

        let outcome = client.call(&councilor(), &prompt()).await;
        match outcome {
            ModelOutcome::Failed { class, message, .. } => {
                assert_eq!(class, FailureClass::TransientExhausted);
                assert!(message.contains("3 attempts"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // default policy: initial attempt + 2 retries
        assert_eq!(gateway.call_count(), 3);
        assert_eq!(sleeper.delays.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![Err(GatewayError::AuthFailure("key rejected".to_string()))],
        )]));
        let client = GatewayClient::new(Arc::clone(&gateway));

        let outcome = client.call(&councilor(), &prompt()).await;
        match outcome {
            ModelOutcome::Failed { class, message, .. } => {
                assert_eq!(class, FailureClass::NonRetryable);
                assert!(message.contains("key rejected"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_overrides_backoff() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![
                Err(GatewayError::RateLimited {
                    retry_after: Some(Duration::from_secs(9)),
                }),
                Ok("ok".to_string()),
            ],
        )]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = GatewayClient::new(Arc::clone(&gateway)).with_sleeper(sleeper.clone());

        client.call(&councilor(), &prompt()).await;
        assert_eq!(sleeper.delays.lock().unwrap()[0], Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_backoff_doubles_per_attempt() {
        let gateway = Arc::new(ScriptedGateway::new(vec![(
            "test/model",
            vec![
                Err(GatewayError::Timeout),
                Err(GatewayError::Timeout),
                Ok("ok".to_string()),
            ],
        )]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = GatewayClient::new(Arc::clone(&gateway)).with_sleeper(sleeper.clone());

        client.call(&councilor(), &prompt()).await;

        let delays = sleeper.delays.lock().unwrap();
        let base = Duration::from_secs(2);
        let jitter_cap = Duration::from_millis(250);
        assert!(delays[0] >= base && delays[0] < base + jitter_cap);
        assert!(delays[1] >= base * 2 && delays[1] < base * 2 + jitter_cap);
    }
}
