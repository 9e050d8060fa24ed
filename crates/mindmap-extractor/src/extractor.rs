//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::retry::{retry_with_backoff, RetryError};
use crate::types::{ExtractionOutcome, ExtractionRequest};
use mindmap_domain::traits::{Classify, CompletionRequest, LlmProvider, RetryClass};
use mindmap_domain::SummaryDocument;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns a normalized transcript into extracted items
pub struct Extractor<L>
where
    L: LlmProvider,
{
    provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
{
    /// Create a new Extractor
    ///
    /// # Errors
    ///
    /// [`ExtractorError::Config`] if `config` does not validate.
    pub fn new(provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { provider, config })
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract items from one conversation
    ///
    /// Transient failures (timeouts, rate limits, server errors, unparseable
    /// responses) are retried with exponential backoff up to
    /// `max_attempts`. Authentication failures and rejected requests end the
    /// call at once.
    pub async fn extract(
        &self,
        request: ExtractionRequest<'_>,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        let prompt = PromptBuilder::new(request.transcript, request.platform, request.source_date)
            .with_context(request.context)
            .build();

        let completion = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt,
            max_tokens: self.config.max_tokens,
        };

        info!(
            platform = %request.platform,
            source_date = %request.source_date,
            turns = request.transcript.len(),
            context_docs = request.context.len(),
            model = self.provider.model_name(),
            "requesting extraction"
        );
        debug!(prompt_chars = completion.prompt.len(), "prompt assembled");

        let policy = self.config.retry_policy();
        let attempt_timeout = self.config.request_timeout();
        let completion = &completion;

        let retried = retry_with_backoff(&policy, |attempt| async move {
            debug!(attempt, "extraction attempt");
            let response = match timeout(attempt_timeout, self.provider.generate(completion)).await {
                Err(_) => return Err(AttemptError::Timeout(attempt_timeout)),
                Ok(Err(e)) => return Err(AttemptError::Provider(e)),
                Ok(Ok(response)) => response,
            };
            debug!(attempt, response_chars = response.len(), "response received");
            parse_response(&response).map_err(AttemptError::InvalidFormat)
        })
        .await
        .map_err(|e| match e {
            RetryError::Fatal { error, .. } if error.is_authentication() => {
                ExtractorError::Authentication(error.to_string())
            }
            RetryError::Fatal { error, .. } => ExtractorError::Rejected(error.to_string()),
            RetryError::Exhausted { last, attempts } => ExtractorError::Exhausted {
                attempts,
                last: last.to_string(),
            },
        })?;

        let parsed = retried.value;
        let mut skipped = parsed.skipped;
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(parsed.candidates.len());

        for candidate in parsed.candidates {
            let item = candidate.into_item(request.platform, request.source_file, request.source_date);
            if !seen.insert(item.id.clone()) {
                warn!(id = %item.id, title = %item.title, "duplicate item in response; skipping");
                skipped += 1;
                continue;
            }
            items.push(item);
        }

        let summary = SummaryDocument::from_items(
            &items,
            request.platform,
            request.source_date,
            request.source_file,
            parsed.conversation_summary,
            parsed.primary_themes,
        );

        info!(
            items = items.len(),
            skipped,
            attempts = retried.attempts,
            "extraction complete"
        );

        Ok(ExtractionOutcome {
            items,
            summary,
            attempts: retried.attempts,
            skipped_items: skipped,
            model: self.provider.model_name().to_string(),
        })
    }
}

/// Failure of a single attempt
enum AttemptError<E> {
    Provider(E),
    Timeout(Duration),
    InvalidFormat(String),
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Provider(e) => write!(f, "{}", e),
            AttemptError::Timeout(after) => write!(f, "Attempt timed out after {}s", after.as_secs()),
            AttemptError::InvalidFormat(reason) => write!(f, "Invalid response format: {}", reason),
        }
    }
}

impl<E: Classify> Classify for AttemptError<E> {
    fn retry_class(&self) -> RetryClass {
        match self {
            AttemptError::Provider(e) => e.retry_class(),
            AttemptError::Timeout(_) | AttemptError::InvalidFormat(_) => RetryClass::Retryable,
        }
    }

    fn is_authentication(&self) -> bool {
        matches!(self, AttemptError::Provider(e) if e.is_authentication())
    }
}
