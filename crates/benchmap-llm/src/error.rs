//! Error types for the chat completion client.

use thiserror::Error;

/// Errors that can occur when calling an OpenAI-compatible endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response carried no usable content
    #[error("Empty completion response")]
    EmptyResponse,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
