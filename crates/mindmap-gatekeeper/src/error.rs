//! Gatekeeper error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path validation
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// The vault root itself is unusable
    #[error("Invalid vault root {path}: {reason}")]
    InvalidRoot {
        /// Configured root
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// A candidate path resolves outside the vault root
    #[error("Path escapes vault root: {path}")]
    PathSecurity {
        /// Candidate as given
        path: PathBuf,
    },

    /// Resolving a candidate failed for a reason other than containment
    #[error("Failed to resolve {path}: {source}")]
    Resolve {
        /// Candidate as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
