//! Scripted provider for tests

use crate::LlmError;
use mindmap_domain::traits::{CompletionRequest, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Mock LLM provider for deterministic testing
///
/// Returns scripted outcomes in order, then the default response once the
/// script runs out. Every call is counted and its request recorded. Clones
/// share the script, the counter and the record.
///
/// # Examples
///
/// ```
/// use mindmap_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// provider.push_error(LlmError::Timeout);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Option<Duration>,
    model: String,
}

impl MockProvider {
    /// Create a provider that answers every call with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
            model: "mock".to_string(),
        }
    }

    /// Delay every call by `latency` (virtual time under a paused test clock)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful response
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Number of `generate` calls so far
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    fn next_outcome(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        lock(&self.requests).push(request.clone());
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"items": []}"#)
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let outcome = self.next_outcome(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        outcome
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// A poisoned lock only means another test thread panicked mid-call
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system: "sys".to_string(),
            prompt: prompt.to_string(),
            max_tokens: 16,
        }
    }

    #[tokio::test]
    async fn test_default_response() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate(&request("a")).await.unwrap(), "Test response");
        assert_eq!(provider.generate(&request("b")).await.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_script_then_default() {
        let provider = MockProvider::new("default");
        provider.push_error(LlmError::RateLimited);
        provider.push_response("scripted");

        assert!(matches!(
            provider.generate(&request("a")).await,
            Err(LlmError::RateLimited)
        ));
        assert_eq!(provider.generate(&request("a")).await.unwrap(), "scripted");
        assert_eq!(provider.generate(&request("a")).await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_call_count_and_requests() {
        let provider = MockProvider::default();
        assert_eq!(provider.call_count(), 0);

        provider.generate(&request("one")).await.unwrap();
        provider.generate(&request("two")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        let prompts: Vec<_> = provider.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider2.push_response("from clone");
        assert_eq!(provider1.generate(&request("x")).await.unwrap(), "from clone");
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_uses_tokio_clock() {
        let provider = MockProvider::new("slow").with_latency(Duration::from_secs(30));
        let start = tokio::time::Instant::now();
        provider.generate(&request("x")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
