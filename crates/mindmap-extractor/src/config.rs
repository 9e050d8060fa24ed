//! Configuration for the Extractor

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default Messages API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Upper bound on generated tokens per request
    pub max_tokens: u32,

    /// Total attempts per file, including the first
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    pub initial_backoff_ms: u64,

    /// Factor applied to the delay after each retry
    pub backoff_multiplier: u32,

    /// Maximum time for a single attempt (seconds)
    pub request_timeout_secs: u64,

    /// Base URL of the Messages API
    pub endpoint: String,
}

impl ExtractorConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry policy described by this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            self.backoff_multiplier,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.initial_backoff_ms == 0 {
            return Err("initial_backoff_ms must be greater than 0".to_string());
        }
        if self.backoff_multiplier < 2 {
            return Err("backoff_multiplier must be at least 2".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(format!("endpoint must be an http(s) URL: {}", self.endpoint));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            max_attempts: 3,
            initial_backoff_ms: 1000,
            backoff_multiplier: 2,
            request_timeout_secs: 120,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_default_backoff_schedule() {
        let policy = ExtractorConfig::default().retry_policy();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases: Vec<fn(&mut ExtractorConfig)> = vec![
            |c: &mut ExtractorConfig| c.max_attempts = 0,
            |c: &mut ExtractorConfig| c.max_tokens = 0,
            |c: &mut ExtractorConfig| c.backoff_multiplier = 1,
            |c: &mut ExtractorConfig| c.initial_backoff_ms = 0,
            |c: &mut ExtractorConfig| c.request_timeout_secs = 0,
            |c: &mut ExtractorConfig| c.model = "  ".to_string(),
            |c: &mut ExtractorConfig| c.endpoint = "api.anthropic.com".to_string(),
        ];
        for mutate in cases {
            let mut config = ExtractorConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("max_attempts = 5\nmodel = \"other\"").unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.model, "other");
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(ExtractorConfig::from_toml(&toml_str).unwrap(), config);
    }
}
