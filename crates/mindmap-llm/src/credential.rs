//! API credential validation

use std::fmt;
use thiserror::Error;

/// Prefix every Anthropic API key carries
pub const API_KEY_PREFIX: &str = "sk-ant-";

/// Reasons a credential is refused before use
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The environment variable is not set
    #[error("Environment variable {var} is not set")]
    Missing {
        /// Variable name
        var: String,
    },

    /// The value is empty
    #[error("API key is empty")]
    Empty,

    /// The value does not start with the expected prefix
    #[error("API key does not start with sk-ant-")]
    WrongPrefix,

    /// The value contains whitespace
    #[error("API key contains whitespace")]
    EmbeddedWhitespace,
}

/// A validated API key
///
/// `Debug` and `Display` never show the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw key
    ///
    /// Surrounding whitespace (such as a trailing newline from a secrets file)
    /// is trimmed; whitespace inside the key is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap_llm::{ApiKey, CredentialError};
    ///
    /// assert!(ApiKey::parse("sk-ant-api03-abc").is_ok());
    /// assert_eq!(ApiKey::parse("sk-live-abc"), Err(CredentialError::WrongPrefix));
    /// assert_eq!(ApiKey::parse("sk-ant- abc"), Err(CredentialError::EmbeddedWhitespace));
    /// assert_eq!(format!("{:?}", ApiKey::parse("sk-ant-secret").unwrap()), "ApiKey(sk-ant-***)");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if key.chars().any(char::is_whitespace) {
            return Err(CredentialError::EmbeddedWhitespace);
        }
        if !key.starts_with(API_KEY_PREFIX) || key.len() == API_KEY_PREFIX.len() {
            return Err(CredentialError::WrongPrefix);
        }
        Ok(Self(key.to_string()))
    }

    /// Read and validate the key from environment variable `var`
    pub fn from_env(var: &str) -> Result<Self, CredentialError> {
        let raw = std::env::var(var).map_err(|_| CredentialError::Missing {
            var: var.to_string(),
        })?;
        Self::parse(&raw)
    }

    /// The raw secret, for placing in a request header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({}***)", API_KEY_PREFIX)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}***", API_KEY_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key() {
        let key = ApiKey::parse("sk-ant-api03-XYZ_123").unwrap();
        assert_eq!(key.expose(), "sk-ant-api03-XYZ_123");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let key = ApiKey::parse("  sk-ant-abc\n").unwrap();
        assert_eq!(key.expose(), "sk-ant-abc");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(ApiKey::parse(""), Err(CredentialError::Empty));
        assert_eq!(ApiKey::parse("   "), Err(CredentialError::Empty));
    }

    #[test]
    fn test_prefix_required() {
        assert_eq!(ApiKey::parse("sk-abc"), Err(CredentialError::WrongPrefix));
        assert_eq!(ApiKey::parse("SK-ANT-abc"), Err(CredentialError::WrongPrefix));
        // Prefix alone is not a key
        assert_eq!(ApiKey::parse("sk-ant-"), Err(CredentialError::WrongPrefix));
    }

    #[test]
    fn test_embedded_whitespace_rejected() {
        assert_eq!(
            ApiKey::parse("sk-ant-abc\tdef"),
            Err(CredentialError::EmbeddedWhitespace)
        );
        assert_eq!(
            ApiKey::parse("sk-ant-abc\ndef"),
            Err(CredentialError::EmbeddedWhitespace)
        );
    }

    #[test]
    fn test_secret_never_formatted() {
        let key = ApiKey::parse("sk-ant-very-secret").unwrap();
        assert!(!format!("{:?}", key).contains("very-secret"));
        assert!(!format!("{}", key).contains("very-secret"));
    }

    #[test]
    fn test_missing_env_var() {
        let result = ApiKey::from_env("MINDMAP_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(CredentialError::Missing { .. })));
    }
}
