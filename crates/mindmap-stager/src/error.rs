//! Error types for staging

use mindmap_gatekeeper::GatekeeperError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging a document
#[derive(Error, Debug)]
pub enum StagerError {
    /// A target path failed validation
    #[error("Path security: {0}")]
    PathSecurity(#[from] GatekeeperError),

    /// Local filesystem failure
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        /// What was being attempted
        operation: &'static str,
        /// Affected path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Frontmatter could not be serialized
    #[error("Failed to render frontmatter: {0}")]
    Render(#[from] serde_yaml::Error),

    /// Every version suffix up to the limit is taken by different content
    #[error("No free version of {stem} (tried up to v{max})")]
    TooManyVersions {
        /// Base name without extension
        stem: String,
        /// Highest version tried
        max: u32,
    },
}

impl StagerError {
    /// True if the failure came from path validation
    pub fn is_path_security(&self) -> bool {
        matches!(self, StagerError::PathSecurity(_))
    }
}
