//! Output formatting for the CLI.

use colored::*;
use mindmap_pipeline::{FileOutcome, FileReport, RunReport};
use std::path::Path;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Banner printed before a run.
    pub fn header(&self, dry_run: bool, vault: &Path) -> String {
        let rule = "=".repeat(60);
        let mode = if dry_run { " [DRY RUN]" } else { "" };
        format!(
            "{}\n{}{}\nVault: {}\n{}",
            rule,
            self.colorize("Mindmap Pipeline", "cyan"),
            self.colorize(mode, "yellow"),
            vault.display(),
            rule
        )
    }

    /// Full report: previous run, per-file lines, totals.
    pub fn format_report(&self, report: &RunReport, vault: &Path) -> String {
        let mut lines = Vec::new();

        let last_run = report
            .previous_run
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Never".to_string());
        lines.push(format!("Last run: {}", last_run));
        lines.push(format!(
            "Context documents: {}",
            report.context_documents
        ));
        lines.push(String::new());

        if report.files.is_empty() {
            lines.push(self.colorize("No files found in inbox folders.", "yellow"));
        }
        for file in &report.files {
            lines.push(self.format_file(file, vault));
        }

        lines.push(String::new());
        lines.push(format!("Complete: {}", report.summary()));
        lines.join("\n")
    }

    fn format_file(&self, file: &FileReport, vault: &Path) -> String {
        let path = file.path.strip_prefix(vault).unwrap_or(&file.path);
        let path = path.display();

        match &file.outcome {
            FileOutcome::Pending { reason, turns } => format!(
                "  {} {} ({}, {} turns)",
                self.colorize("pending  ", "blue"),
                path,
                reason,
                turns
            ),
            FileOutcome::Unchanged => format!("  {} {}", self.colorize("unchanged", "magenta"), path),
            FileOutcome::Empty => format!(
                "  {} {} (empty transcript)",
                self.colorize("skipped  ", "yellow"),
                path
            ),
            FileOutcome::Staged {
                items,
                written,
                unchanged,
                ..
            } => format!(
                "  {} {} ({} items, {} written, {} already present)",
                self.colorize("staged   ", "green"),
                path,
                items,
                written,
                unchanged
            ),
            FileOutcome::Failed(failure) => format!(
                "  {} {} [{}] {}",
                self.colorize("failed   ", "red"),
                path,
                failure.kind,
                failure.cause
            ),
        }
    }

    /// Colorize text if colors are enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
