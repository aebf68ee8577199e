//! Minimal OpenAI-compatible chat completion client.
//!
//! The benchmap agents only need non-streaming chat completions against
//! OpenAI-compatible endpoints (DeepSeek, vLLM, and friends), so this crate
//! deliberately stays small: a [`Client`] holding credentials and base URL,
//! request/response types matching the wire format, and a typed error enum.

pub mod client;
pub mod error;
pub mod types;

pub use client::Client;
pub use error::LlmError;
pub use types::{
    ChatCompletion, ChatRequest, Choice, CompletionMessage, Message, ResponseFormat, Role, Usage,
};
