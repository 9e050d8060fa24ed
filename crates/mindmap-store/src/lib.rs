//! Mindmap Storage Layer
//!
//! Content-addressed change detection backed by a flat JSON registry, one per
//! vault (`<vault>/_meta/processing_log.json` by default).
//!
//! # Format
//!
//! ```json
//! {
//!   "entries": [
//!     { "path": "00-Inbox/claude/2024-12-07-demo.txt",
//!       "hash": "9f86d0…",
//!       "last_processed": "2024-12-07T10:00:00Z",
//!       "status": "success" }
//!   ],
//!   "last_run": "2024-12-07T10:00:00Z"
//! }
//! ```
//!
//! The whole file is rewritten through a temporary file and an atomic rename
//! on every update. A registry that exists but cannot be read or parsed is an
//! error at open time; it is never silently replaced.
//!
//! # Examples
//!
//! ```no_run
//! use mindmap_domain::ContentHash;
//! use mindmap_store::{ChangeTracker, ProcessingStatus};
//!
//! let mut tracker = ChangeTracker::open("/vault/_meta/processing_log.json").unwrap();
//! let hash = ContentHash::of(b"User: hi");
//! if tracker.should_process("00-Inbox/claude/a.txt", &hash).process {
//!     // ... extract and stage ...
//!     tracker.record("00-Inbox/claude/a.txt", &hash, ProcessingStatus::Success).unwrap();
//! }
//! ```

#![warn(missing_docs)]

mod log;
mod tracker;

use std::path::PathBuf;
use thiserror::Error;

pub use log::{ProcessingLog, ProcessingLogEntry, ProcessingStatus};
pub use tracker::{ChangeDecision, ChangeReason, ChangeTracker};

/// Errors that can occur during registry operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The registry exists but could not be read
    #[error("Failed to read processing log {path}: {source}")]
    Read {
        /// Registry location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The registry exists but is not valid
    #[error("Corrupt processing log {path}: {reason}")]
    Corrupt {
        /// Registry location
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Persisting the registry failed
    #[error("Failed to write processing log {path}: {source}")]
    Write {
        /// Registry location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
