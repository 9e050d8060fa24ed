//! Mindmap LLM Provider Layer
//!
//! Implementations of the [`LlmProvider`] trait from `mindmap-domain`.
//!
//! # Providers
//!
//! - [`AnthropicProvider`]: the Anthropic Messages API over HTTPS
//! - [`MockProvider`]: scripted responses and failures for tests, no network
//!
//! One `generate` call is exactly one attempt. Retrying is left to the caller,
//! which uses each error's [`Classify`] implementation to decide.
//!
//! # Credentials
//!
//! [`ApiKey`] validates the secret's shape before it is ever placed in a
//! request, and never prints it.
//!
//! # Examples
//!
//! ```
//! use mindmap_domain::traits::{CompletionRequest, LlmProvider};
//! use mindmap_llm::{LlmError, MockProvider};
//!
//! # tokio_test_block(async {
//! let provider = MockProvider::new(r#"{"items": []}"#);
//! provider.push_error(LlmError::RateLimited);
//!
//! let request = CompletionRequest {
//!     system: String::new(),
//!     prompt: "USER: hi".to_string(),
//!     max_tokens: 16,
//! };
//! assert!(provider.generate(&request).await.is_err());
//! assert_eq!(provider.generate(&request).await.unwrap(), r#"{"items": []}"#);
//! assert_eq!(provider.call_count(), 2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread()
//! #         .enable_all()
//! #         .build()
//! #         .unwrap()
//! #         .block_on(f);
//! # }
//! ```
//!
//! [`LlmProvider`]: mindmap_domain::traits::LlmProvider
//! [`Classify`]: mindmap_domain::traits::Classify

#![warn(missing_docs)]

pub mod anthropic;
pub mod credential;
mod mock;

use mindmap_domain::traits::{Classify, RetryClass};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use credential::{ApiKey, CredentialError, API_KEY_PREFIX};
pub use mock::MockProvider;

/// Errors that can occur during a single generation attempt
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// The service asked us to slow down
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 5xx-class failure on the service side
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The credential was refused
    #[error("Authentication failed ({status}): {message}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The service rejected the request as malformed
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Classify for LlmError {
    fn retry_class(&self) -> RetryClass {
        match self {
            LlmError::Authentication { .. } | LlmError::Rejected { .. } => RetryClass::Fatal,
            LlmError::Timeout
            | LlmError::RateLimited
            | LlmError::Server { .. }
            | LlmError::Communication(_)
            | LlmError::InvalidResponse(_) => RetryClass::Retryable,
        }
    }

    fn is_authentication(&self) -> bool {
        matches!(self, LlmError::Authentication { .. })
    }
}
