//! Error types for the benchmap agents.

use thiserror::Error;

/// Errors raised by the requirement analyzer and summary agents.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The underlying chat completion call failed
    #[error(transparent)]
    Llm(#[from] benchmap_llm::LlmError),

    /// A recommended benchmark name is not in the registry
    #[error(transparent)]
    Registry(#[from] benchmap_core::RegistryError),

    /// The model's response could not be parsed as the expected structure
    #[error("Failed to parse agent response: {0}")]
    Parse(String),

    /// Writing the report to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
