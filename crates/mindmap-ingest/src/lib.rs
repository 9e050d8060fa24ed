//! Mindmap Ingest Layer
//!
//! Turns inbox folders into [`ConversationFile`] snapshots and snapshots into
//! platform-agnostic [`NormalizedTranscript`]s.
//!
//! ## Discovery
//!
//! Each configured inbox is scanned for `*.txt` files, non-recursively, in
//! path order. The platform is decided by which inbox a file sits in; the
//! content is never sniffed.
//!
//! ## Normalization
//!
//! | Platform | Format |
//! |----------|--------|
//! | `claude`, `gemini` | Pasted dialogue with `User:` / `Assistant:` style labels |
//! | `chatgpt` | JSON export (mapping tree or message list), falling back to pasted dialogue |
//!
//! Malformed input never fails normalization. Empty or whitespace-only input
//! yields an empty transcript, which callers skip.
//!
//! # Examples
//!
//! ```
//! use mindmap_domain::{Platform, Role};
//! use mindmap_ingest::normalize_text;
//!
//! let transcript = normalize_text(Platform::Claude, "User: hi\nAssistant: hello");
//! assert_eq!(transcript.len(), 2);
//! assert_eq!(transcript.turns()[1].role, Role::Assistant);
//! ```
//!
//! [`ConversationFile`]: mindmap_domain::ConversationFile
//! [`NormalizedTranscript`]: mindmap_domain::NormalizedTranscript

#![warn(missing_docs)]

mod chatgpt;
pub mod date;
pub mod discovery;
pub mod normalize;
mod plain;

use std::path::PathBuf;
use thiserror::Error;

pub use date::{parse_source_date, source_date_for};
pub use discovery::{inbox_for, load_conversation, scan_inboxes, Candidate, Inbox};
pub use normalize::{normalize, normalize_text, Format};

/// Errors raised while reading inbox contents
#[derive(Error, Debug)]
pub enum IngestError {
    /// An inbox directory exists but could not be listed
    #[error("Failed to scan inbox {path}: {source}")]
    Scan {
        /// Inbox directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A conversation file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Conversation file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
