//! Command-line arguments.

use clap::Parser;
use mindmap_stager::ConflictPolicy;
use std::path::PathBuf;

/// Mindmap - process conversation exports into staged knowledge items.
#[derive(Debug, Parser)]
#[command(name = "mindmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show what would be processed without calling the service or writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Process a single file, even if it has not changed
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Vault root
    #[arg(long, env = "MINDMAP_VAULT")]
    pub vault: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to do when a staged name holds different content (version-suffix, skip)
    #[arg(long)]
    pub conflict_policy: Option<ConflictPolicy>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mindmap"]);
        assert!(!cli.dry_run);
        assert!(cli.file.is_none());
        assert!(cli.conflict_policy.is_none());
    }

    #[test]
    fn test_single_file_dry_run() {
        let cli = Cli::parse_from([
            "mindmap",
            "--dry-run",
            "--file",
            "00-Inbox/claude/2024-12-07-demo.txt",
        ]);
        assert!(cli.dry_run);
        assert_eq!(
            cli.file,
            Some(PathBuf::from("00-Inbox/claude/2024-12-07-demo.txt"))
        );
    }

    #[test]
    fn test_conflict_policy() {
        let cli = Cli::parse_from(["mindmap", "--conflict-policy", "skip"]);
        assert_eq!(cli.conflict_policy, Some(ConflictPolicy::Skip));
        assert!(Cli::try_parse_from(["mindmap", "--conflict-policy", "clobber"]).is_err());
    }
}
