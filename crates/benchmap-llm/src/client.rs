//! Client for OpenAI-compatible chat completion endpoints.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::LlmError;
use crate::types::{ChatCompletion, ChatRequest};

/// Client for an OpenAI-compatible chat API.
///
/// # Example
///
/// ```rust,no_run
/// use benchmap_llm::{ChatRequest, Client, Message};
///
/// # async fn run() -> Result<(), benchmap_llm::LlmError> {
/// let client = Client::new("your-api-key", "https://api.deepseek.com");
/// let request = ChatRequest::new("deepseek-chat", vec![Message::user("hello")]);
/// let completion = client.chat(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    /// HTTP client
    http_client: reqwest::Client,
    /// API key
    api_key: String,
    /// Base URL for the API
    base_url: String,
}

impl Client {
    /// Create a new client for the given endpoint.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the endpoint URL for a given path.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| LlmError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Execute a non-streaming chat completion request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        let url = self.endpoint_url("/chat/completions");
        debug!(model = %request.model, url = %url, "sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(LlmError::Api { status, message });
        }

        let completion: ChatCompletion = response.json().await?;
        if completion.choices.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(completion)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Pull the human-readable message out of an OpenAI-style error body.
fn extract_api_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_normalizes_trailing_slash() {
        let client = Client::new("key", "https://api.deepseek.com/");
        assert_eq!(
            client.endpoint_url("/chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }

    #[test]
    fn test_build_headers() {
        let client = Client::new("test-api-key", "https://example.com");
        let headers = client.build_headers().unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-api-key");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_api_key_header_is_config_error() {
        let client = Client::new("bad\nkey", "https://example.com");
        assert!(matches!(
            client.build_headers(),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_extract_api_error_message() {
        let body = r#"{"error": {"message": "invalid api key", "type": "auth"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("invalid api key"));
        assert!(extract_api_error("not json").is_none());
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let client = Client::new("secret", "https://example.com");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }
}
