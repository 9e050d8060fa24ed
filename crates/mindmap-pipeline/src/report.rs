//! Run reports

use chrono::{DateTime, Utc};
use mindmap_domain::Platform;
use mindmap_extractor::ExtractorError;
use mindmap_store::ChangeReason;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Category of a per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file or one of its targets resolved outside the vault
    PathSecurity,
    /// Every extraction attempt failed transiently
    TerminalService,
    /// The service refused the credential
    Authentication,
    /// The service rejected the request
    Rejected,
    /// Local read or write failure
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::PathSecurity => "path-security",
            FailureKind::TerminalService => "terminal-service",
            FailureKind::Authentication => "authentication",
            FailureKind::Rejected => "rejected",
            FailureKind::Io => "io",
        };
        f.write_str(s)
    }
}

/// A file whose run ended in failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Category
    pub kind: FailureKind,
    /// Affected file
    pub path: PathBuf,
    /// Human-readable cause
    pub cause: String,
}

impl FileFailure {
    /// Create a failure record
    pub fn new(kind: FailureKind, path: impl Into<PathBuf>, cause: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            cause: cause.into(),
        }
    }

    /// Failure for an extraction error on `path`
    pub fn from_extraction(path: &Path, error: &ExtractorError) -> Self {
        let kind = match error {
            ExtractorError::Exhausted { .. } => FailureKind::TerminalService,
            ExtractorError::Authentication(_) => FailureKind::Authentication,
            _ => FailureKind::Rejected,
        };
        Self::new(kind, path, error.to_string())
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path.display(), self.cause)
    }
}

/// What happened to one candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Dry run: the file would be extracted
    Pending {
        /// Why it needs processing
        reason: ChangeReason,
        /// Turns in the normalized transcript
        turns: usize,
    },
    /// Content hash matches a successful earlier run
    Unchanged,
    /// The transcript is empty; nothing was sent
    Empty,
    /// Items and summary are in staging
    Staged {
        /// Items extracted
        items: usize,
        /// Documents newly written by this run
        written: usize,
        /// Documents that were already present and identical
        unchanged: usize,
        /// Path of the summary document
        summary: PathBuf,
    },
    /// The file failed and will be retried next run
    Failed(FileFailure),
}

/// Outcome for one candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Candidate path
    pub path: PathBuf,
    /// Platform of its inbox
    pub platform: Platform,
    /// Outcome
    pub outcome: FileOutcome,
}

/// Summary of a pipeline invocation
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier attached to every log line of this run
    pub run_id: Uuid,
    /// True if nothing was sent or written
    pub dry_run: bool,
    /// End of the previous live run, if any
    pub previous_run: Option<DateTime<Utc>>,
    /// Context documents loaded
    pub context_documents: usize,
    /// One entry per candidate, in processing order
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub(crate) fn new(
        dry_run: bool,
        previous_run: Option<DateTime<Utc>>,
        context_documents: usize,
    ) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            dry_run,
            previous_run,
            context_documents,
            files: Vec::new(),
        }
    }

    /// Files the dry run would extract
    pub fn pending(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Pending { .. }))
    }

    /// Files skipped as unchanged
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    /// Files skipped as empty
    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Empty))
    }

    /// Files staged successfully
    pub fn staged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Staged { .. }))
    }

    /// Files that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    /// Items staged across all files
    pub fn items_staged(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Staged { items, .. } => items,
                _ => 0,
            })
            .sum()
    }

    /// Every per-file failure
    pub fn failures(&self) -> impl Iterator<Item = &FileFailure> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Failed(failure) => Some(failure),
            _ => None,
        })
    }

    /// True if at least one file failed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// One-line totals
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "{} pending, {} unchanged, {} empty",
                self.pending(),
                self.unchanged(),
                self.empty()
            )
        } else {
            format!(
                "{} staged ({} items), {} unchanged, {} empty, {} failed",
                self.staged(),
                self.items_staged(),
                self.unchanged(),
                self.empty(),
                self.failed()
            )
        }
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.outcome)).count()
    }
}
