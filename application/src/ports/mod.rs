pub mod llm_gateway;
pub mod progress;
