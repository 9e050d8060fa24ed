//! Mindmap Pipeline
//!
//! Wires the components into one run over a vault:
//!
//! ```text
//! scan inboxes ─► change gate ─► normalize ─► extract ─► stage ─► record
//! ```
//!
//! # Run modes
//!
//! - [`Pipeline::dry_run`]: discovery, change detection and normalization
//!   only. No service calls, no writes.
//! - [`Pipeline::run`] with [`Scope::All`]: every new or changed file.
//! - [`Pipeline::run`] with [`Scope::SingleFile`]: one file, even if
//!   unchanged. The path must resolve inside the vault and sit in an inbox.
//!
//! # Failure handling
//!
//! Problems with the run as a whole ([`PipelineError`]) abort before any file
//! is touched. Problems with one file become a [`FileFailure`] in the
//! [`RunReport`]; the file is recorded as failed and retried next run, and
//! the run moves on.
//!
//! # Example
//!
//! ```no_run
//! use mindmap_pipeline::{anthropic_extractor, Pipeline, PipelineConfig, Scope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::for_vault("/home/me/ObsidianVault");
//! let extractor = anthropic_extractor(&config)?;
//! let mut pipeline = Pipeline::open(config)?;
//!
//! let report = pipeline.run(&extractor, &Scope::All).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
mod pipeline;
pub mod report;

pub use config::{InboxPaths, PipelineConfig, DEFAULT_API_KEY_ENV};
pub use context::load_context;
pub use pipeline::{anthropic_extractor, anthropic_extractor_with_key, Pipeline, Scope};
pub use report::{FailureKind, FileFailure, FileOutcome, FileReport, RunReport};

use mindmap_ingest::IngestError;
use mindmap_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration, vault, credential or processing log
    #[error("Configuration error: {0}")]
    Config(String),

    /// An explicitly named file resolves outside the vault
    #[error("Path escapes vault root: {path}")]
    PathSecurity {
        /// Path as given
        path: PathBuf,
    },

    /// An explicitly named file cannot be processed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An inbox could not be listed
    #[error(transparent)]
    Scan(#[from] IngestError),

    /// The processing log could not be updated
    #[error("Processing log error: {0}")]
    Registry(#[from] StoreError),
}
