//! Error types for the Extractor

use thiserror::Error;

/// Terminal outcomes of an extraction call
///
/// Transient failures never reach the caller on their own; they are retried
/// and only surface as [`ExtractorError::Exhausted`].
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Every attempt failed transiently
    #[error("Extraction failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Last failure
        last: String,
    },

    /// The service refused the credential
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The service rejected the request as malformed
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// True for failures where the service refused to serve this file at all
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractorError::Authentication(_) | ExtractorError::Rejected(_)
        )
    }
}
