//! Trait definitions for external interactions
//!
//! These traits define the boundaries between pipeline logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// A single request to a text-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User message: context documents, transcript and extraction instruction
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Whether a failed attempt is worth repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Transient: timeout, rate limit, server error, unparseable response
    Retryable,
    /// Permanent: bad credential, rejected request
    Fatal,
}

/// Errors that know their own retry classification
pub trait Classify {
    /// Classify this failure
    fn retry_class(&self) -> RetryClass;

    /// Convenience for `retry_class() == Retryable`
    fn is_retryable(&self) -> bool {
        self.retry_class() == RetryClass::Retryable
    }

    /// True if the service refused the credential
    fn is_authentication(&self) -> bool {
        false
    }
}

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (mindmap-llm). One call is one
/// attempt; retrying is the caller's concern.
pub trait LlmProvider {
    /// Error type for provider operations
    type Error: Classify + std::fmt::Display;

    /// Generate a completion for `request`
    fn generate(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}
