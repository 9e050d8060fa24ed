//! Error types for the CLI application.

use mindmap_pipeline::PipelineError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal pipeline error
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit status when the run could not start or was aborted
pub const EXIT_FATAL: i32 = 1;

/// Exit status when the run completed but some files failed
pub const EXIT_FILE_FAILURES: i32 = 2;
