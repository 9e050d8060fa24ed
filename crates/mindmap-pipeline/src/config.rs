//! Configuration for a pipeline run

use mindmap_domain::Platform;
use mindmap_extractor::ExtractorConfig;
use mindmap_stager::ConflictPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default environment variable holding the service credential
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Vault-relative inbox folder per platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxPaths {
    /// Claude transcripts
    pub claude: PathBuf,
    /// ChatGPT exports
    pub chatgpt: PathBuf,
    /// Gemini transcripts
    pub gemini: PathBuf,
}

impl InboxPaths {
    /// Folder for `platform`
    pub fn get(&self, platform: Platform) -> &Path {
        match platform {
            Platform::Claude => &self.claude,
            Platform::ChatGpt => &self.chatgpt,
            Platform::Gemini => &self.gemini,
        }
    }
}

impl Default for InboxPaths {
    fn default() -> Self {
        Self {
            claude: PathBuf::from("00-Inbox/claude"),
            chatgpt: PathBuf::from("00-Inbox/chatgpt"),
            gemini: PathBuf::from("00-Inbox/gemini"),
        }
    }
}

/// Configuration for the pipeline
///
/// Built once at startup (file, then command-line overrides, then
/// [`validate`](Self::validate)) and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vault root. Required; there is no sensible default at this layer.
    pub vault_path: Option<PathBuf>,

    /// Staging folder, relative to the vault
    pub staging_path: PathBuf,

    /// Metadata folder, relative to the vault
    pub meta_path: PathBuf,

    /// Processing log file name inside `meta_path`
    pub processing_log: String,

    /// Context documents, relative to the vault
    pub bible_files: Vec<PathBuf>,

    /// What to do when a staged name is taken by different content
    pub conflict_policy: ConflictPolicy,

    /// Environment variable holding the service credential
    pub api_key_env: String,

    /// Inbox folders, relative to the vault
    pub inbox_paths: InboxPaths,

    /// Extraction settings
    pub extractor: ExtractorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vault_path: None,
            staging_path: PathBuf::from("01-Processed"),
            meta_path: PathBuf::from("_meta"),
            processing_log: "processing_log.json".to_string(),
            bible_files: Vec::new(),
            conflict_policy: ConflictPolicy::default(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            inbox_paths: InboxPaths::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration rooted at `vault`
    pub fn for_vault(vault: impl Into<PathBuf>) -> Self {
        Self {
            vault_path: Some(vault.into()),
            ..Self::default()
        }
    }

    /// Vault-relative location of the processing log
    pub fn processing_log_path(&self) -> PathBuf {
        self.meta_path.join(&self.processing_log)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.vault_path.is_none() {
            return Err("vault_path is not set".to_string());
        }

        for platform in Platform::ALL {
            let inbox = self.inbox_paths.get(platform);
            if inbox.as_os_str().is_empty() {
                return Err(format!("inbox path for {} must not be empty", platform));
            }
            if inbox.is_absolute() {
                return Err(format!(
                    "inbox path for {} must be relative to the vault",
                    platform
                ));
            }
        }

        for (name, path) in [
            ("staging_path", &self.staging_path),
            ("meta_path", &self.meta_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
            if path.is_absolute() {
                return Err(format!("{} must be relative to the vault", name));
            }
        }

        let log_name = Path::new(&self.processing_log);
        if self.processing_log.is_empty() || log_name.components().count() != 1 {
            return Err("processing_log must be a plain file name".to_string());
        }

        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env must not be empty".to_string());
        }

        self.extractor.validate()
    }

    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_vault_layout() {
        let config = PipelineConfig::for_vault("/vault");
        assert!(config.validate().is_ok());
        assert_eq!(config.inbox_paths.get(Platform::ChatGpt), Path::new("00-Inbox/chatgpt"));
        assert_eq!(
            config.processing_log_path(),
            PathBuf::from("_meta/processing_log.json")
        );
        assert_eq!(config.conflict_policy, ConflictPolicy::VersionSuffix);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert!(config.bible_files.is_empty());
    }

    #[test]
    fn test_vault_is_required() {
        assert!(PipelineConfig::default().validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = PipelineConfig::from_toml(
            r#"
vault_path = "/home/me/ObsidianVault"
bible_files = ["06-Bibles/Gumroad_Launch_Bible.md"]
conflict_policy = "skip"

[inbox_paths]
gemini = "Inbox/Bard"

[extractor]
max_attempts = 5
"#,
        )
        .unwrap();

        assert_eq!(config.vault_path, Some(PathBuf::from("/home/me/ObsidianVault")));
        assert_eq!(config.inbox_paths.gemini, PathBuf::from("Inbox/Bard"));
        assert_eq!(config.inbox_paths.claude, PathBuf::from("00-Inbox/claude"));
        assert_eq!(config.conflict_policy, ConflictPolicy::Skip);
        assert_eq!(config.extractor.max_attempts, 5);
        assert_eq!(config.extractor.max_tokens, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(PipelineConfig::from_toml("conflict_policy = \"overwrite\"").is_err());
    }

    #[test]
    fn test_absolute_paths_rejected() {
        let mut config = PipelineConfig::for_vault("/vault");
        config.staging_path = PathBuf::from("/tmp/out");
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::for_vault("/vault");
        config.inbox_paths.claude = PathBuf::from("/tmp/in");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_name_must_be_flat() {
        let mut config = PipelineConfig::for_vault("/vault");
        config.processing_log = "../log.json".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extractor_settings_validated() {
        let mut config = PipelineConfig::for_vault("/vault");
        config.extractor.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::for_vault("/vault");
        let toml_str = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&toml_str).unwrap(), config);
    }
}
