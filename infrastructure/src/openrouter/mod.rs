//! OpenRouter adapter
//!
//! HTTP gateway speaking the OpenRouter chat-completions protocol.

mod gateway;
mod protocol;

pub use gateway::{DEFAULT_TIMEOUT, OpenRouterGateway};
