//! Mindmap Domain Layer
//!
//! Core value types shared by every stage of the ingestion-and-staging pipeline.
//! This crate holds no I/O: it defines what a conversation file, a transcript,
//! an extracted item and a summary *are*, plus the trait seams that
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **ConversationFile**: an immutable snapshot of one export file (bytes, hash, date)
//! - **Platform**: the closed set of sources (`claude`, `chatgpt`, `gemini`)
//! - **NormalizedTranscript**: ordered `(role, text)` turns, platform-agnostic
//! - **ExtractedItem**: a theme, decision, action or insight with a deterministic id
//! - **SummaryDocument**: the per-source-file aggregate written beside the items
//!
//! ## Pipeline
//!
//! ```text
//! Inbox → ChangeTracker → Normalizer → Extractor → StagingWriter → ChangeTracker
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod item;
pub mod platform;
pub mod summary;
pub mod traits;
pub mod transcript;

// Re-exports for convenience
pub use conversation::{ContentHash, ConversationFile, SourceDate};
pub use item::{Confidence, ExtractedItem, ItemId, ItemType};
pub use platform::Platform;
pub use summary::{SummaryDocument, SummaryEntry};
pub use transcript::{NormalizedTranscript, Role, Turn};
