//! Anthropic Messages API provider
//!
//! Sends one non-streaming `POST /v1/messages` per call and returns the
//! concatenated text blocks of the reply.
//!
//! # Examples
//!
//! ```no_run
//! use mindmap_llm::{AnthropicProvider, ApiKey};
//!
//! let key = ApiKey::from_env("ANTHROPIC_API_KEY").unwrap();
//! let provider = AnthropicProvider::new(key, "claude-sonnet-4-20250514").unwrap();
//! ```

use crate::{ApiKey, LlmError};
use mindmap_domain::traits::{CompletionRequest, LlmProvider};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Longest response body excerpt carried in an error
const MAX_ERROR_BODY: usize = 500;

/// Provider for the Anthropic Messages API
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    /// Create a provider against [`DEFAULT_ENDPOINT`] with [`DEFAULT_TIMEOUT_SECS`]
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_options(
            api_key,
            model,
            DEFAULT_ENDPOINT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a provider with an explicit endpoint and request timeout
    pub fn with_options(
        api_key: ApiKey,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        })
    }

    /// Configured endpoint, without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(model = %self.model, prompt_chars = request.prompt.len(), "sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(status_error(status, &text));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        response_text(parsed)
    }
}

impl LlmProvider for AnthropicProvider {
    type Error = LlmError;

    async fn generate(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.send(request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(e.to_string())
    }
}

/// Map a non-success status to an error
fn status_error(status: StatusCode, body: &str) -> LlmError {
    let message: String = body.chars().take(MAX_ERROR_BODY).collect();
    let code = status.as_u16();

    match code {
        401 | 403 => LlmError::Authentication {
            status: code,
            message,
        },
        429 => LlmError::RateLimited,
        408 => LlmError::Timeout,
        // Includes 529 "overloaded"
        500..=599 => LlmError::Server {
            status: code,
            message,
        },
        400..=499 => LlmError::Rejected {
            status: code,
            message,
        },
        _ => LlmError::Communication(format!("Unexpected status {}: {}", code, message)),
    }
}

fn response_text(response: MessagesResponse) -> Result<String, LlmError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.trim().is_empty() {
        Err(LlmError::InvalidResponse(
            "Response contained no text".to_string(),
        ))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_domain::traits::Classify;

    fn key() -> ApiKey {
        ApiKey::parse("sk-ant-test").unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = AnthropicProvider::with_options(
            key(),
            "claude-sonnet-4-20250514",
            "http://localhost:8080/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080");
        assert_eq!(provider.model_name(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            LlmError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            LlmError::Authentication { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "max_tokens too large"),
            LlmError::Rejected { status: 400, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            LlmError::RateLimited
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            LlmError::Server { status: 503, .. }
        ));
        let overloaded = StatusCode::from_u16(529).unwrap();
        assert!(status_error(overloaded, "overloaded").is_retryable());
    }

    #[test]
    fn test_error_body_truncated() {
        let body = "x".repeat(10_000);
        match status_error(StatusCode::BAD_REQUEST, &body) {
            LlmError::Rejected { message, .. } => assert_eq!(message.len(), MAX_ERROR_BODY),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "{\"items\": "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "[]}"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response_text(response).unwrap(), r#"{"items": []}"#);
    }

    #[test]
    fn test_empty_response_is_invalid() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(
            response_text(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 4096,
            system: "sys",
            messages: [Message {
                role: "user",
                content: "USER: hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "USER: hi");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transient() {
        let provider = AnthropicProvider::with_options(
            key(),
            "m",
            "http://127.0.0.1:1",
            Duration::from_secs(5),
        )
        .unwrap();
        let request = CompletionRequest {
            system: String::new(),
            prompt: "hi".to_string(),
            max_tokens: 8,
        };

        let error = provider.generate(&request).await.unwrap_err();
        assert!(error.is_retryable());
    }
}
