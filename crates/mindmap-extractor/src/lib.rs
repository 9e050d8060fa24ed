//! Mindmap Extractor
//!
//! Turns a normalized conversation into typed knowledge items using a
//! text-generation service.
//!
//! # Architecture
//!
//! ```text
//! Transcript + Context → PromptBuilder → LlmProvider (retry_with_backoff) → parser → ExtractedItems
//! ```
//!
//! # Key Features
//!
//! - **Request assembly**: optional context documents, the transcript, and a fixed instruction
//! - **Bounded retries**: transient failures back off exponentially; permanent ones stop at once
//! - **Tolerant parsing**: code fences are stripped, invalid items skipped with a warning
//! - **Deterministic identifiers**: identical responses always yield identical item ids
//!
//! # Example Usage
//!
//! ```no_run
//! use mindmap_domain::{NormalizedTranscript, Platform, Role, SourceDate, Turn};
//! use mindmap_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
//! use mindmap_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new(MockProvider::default(), ExtractorConfig::default())?;
//! let transcript = NormalizedTranscript::new(vec![Turn::new(Role::User, "hi")]);
//!
//! let outcome = extractor
//!     .extract(ExtractionRequest {
//!         transcript: &transcript,
//!         platform: Platform::Claude,
//!         source_date: SourceDate::from_ymd(2024, 12, 7).unwrap(),
//!         source_file: "00-Inbox/claude/2024-12-07-demo.txt",
//!         context: &[],
//!     })
//!     .await?;
//!
//! println!("Extracted {} items in {} attempts", outcome.items.len(), outcome.attempts);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod retry;
mod types;


pub use config::{ExtractorConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use prompt::{render_context, PromptBuilder, SYSTEM_PROMPT};
pub use retry::{retry_with_backoff, Retried, RetryError, RetryPolicy};
pub use types::{ContextDocument, ExtractionOutcome, ExtractionRequest};
