//! Configuration assembly: file, then command-line overrides, then validation.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use mindmap_pipeline::PipelineConfig;
use std::path::PathBuf;

/// Default configuration file, `~/.mindmap/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = home_dir()?;
    Ok(home.join(".mindmap").join("config.toml"))
}

/// Default vault, `~/ObsidianVault`.
pub fn default_vault_path() -> Result<PathBuf> {
    let home = home_dir()?;
    Ok(home.join("ObsidianVault"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))
}

/// Build the run configuration.
///
/// An explicit `--config` file must exist; the default file is optional.
pub fn load(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path).map_err(CliError::Config)?,
        None => {
            let path = default_config_path()?;
            if path.exists() {
                PipelineConfig::from_file(&path).map_err(CliError::Config)?
            } else {
                PipelineConfig::default()
            }
        }
    };

    apply_overrides(&mut config, cli)?;
    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

/// Apply command-line overrides on top of `config`.
pub fn apply_overrides(config: &mut PipelineConfig, cli: &Cli) -> Result<()> {
    if let Some(vault) = &cli.vault {
        config.vault_path = Some(vault.clone());
    }
    if config.vault_path.is_none() {
        config.vault_path = Some(default_vault_path()?);
    }
    if let Some(policy) = cli.conflict_policy {
        config.conflict_policy = policy;
    }
    if let Some(model) = &cli.model {
        config.extractor.model = model.clone();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mindmap_stager::ConflictPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_win() {
        let mut config = PipelineConfig::for_vault("/from/file");
        let cli = Cli::parse_from([
            "mindmap",
            "--vault",
            "/from/cli",
            "--conflict-policy",
            "skip",
            "--model",
            "claude-test",
        ]);
        apply_overrides(&mut config, &cli).unwrap();

        assert_eq!(config.vault_path, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.conflict_policy, ConflictPolicy::Skip);
        assert_eq!(config.extractor.model, "claude-test");
    }

    #[test]
    fn test_file_values_kept_without_overrides() {
        let mut config = PipelineConfig::for_vault("/from/file");
        let cli = Cli::parse_from(["mindmap"]);
        apply_overrides(&mut config, &cli).unwrap();
        assert_eq!(config.vault_path, Some(PathBuf::from("/from/file")));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mindmap.toml");
        fs::write(
            &path,
            "vault_path = \"/vault\"\nbible_files = [\"06-Bibles/Gumroad_Launch_Bible.md\"]\n",
        )
        .unwrap();

        let cli = Cli::parse_from(["mindmap", "--config", path.to_str().unwrap()]);
        let config = load(&cli).unwrap();
        assert_eq!(config.vault_path, Some(PathBuf::from("/vault")));
        assert_eq!(config.bible_files.len(), 1);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let cli = Cli::parse_from(["mindmap", "--config", "/definitely/not/here.toml"]);
        assert!(matches!(load(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mindmap.toml");
        fs::write(&path, "[extractor]\nmax_attempts = 0\n").unwrap();

        let cli = Cli::parse_from(["mindmap", "--config", path.to_str().unwrap(), "--vault", "/v"]);
        assert!(matches!(load(&cli), Err(CliError::Config(_))));
    }
}
