//! Application layer for llm-council
//!
//! Use cases and ports. The [`use_cases::run_council::RunCouncilUseCase`]
//! orchestrates the three deliberation stages against any
//! [`ports::llm_gateway::LlmGateway`] implementation; adapters live in the
//! infrastructure layer.

pub mod gateway_client;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use gateway_client::{GatewayClient, RetryPolicy, Sleeper, TokioSleeper};
pub use ports::llm_gateway::{ChatPrompt, GatewayError, LlmGateway};
pub use ports::progress::{NoProgress, ProgressNotifier};
pub use use_cases::run_council::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
