//! Staging writes with no-clobber semantics

use crate::render::{render_item, render_summary};
use crate::StagerError;
use mindmap_domain::{ExtractedItem, SourceDate, SummaryDocument};
use mindmap_gatekeeper::{sanitize_filename, PathGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Highest version suffix tried before giving up on a name
pub const MAX_VERSIONS: u32 = 99;

/// What to do when a target name already holds different content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Write alongside as `<stem>-v2.md`, `<stem>-v3.md`, ...
    #[default]
    VersionSuffix,
    /// Leave the existing item document and write nothing
    Skip,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::VersionSuffix => f.write_str("version-suffix"),
            ConflictPolicy::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "version-suffix" | "version" => Ok(ConflictPolicy::VersionSuffix),
            "skip" => Ok(ConflictPolicy::Skip),
            other => Err(format!(
                "Unknown conflict policy: {} (expected version-suffix or skip)",
                other
            )),
        }
    }
}

/// How a document ended up on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Written under its base name
    Created,
    /// Written under a version suffix because the base name was taken
    Versioned(u32),
    /// An identical file was already present
    Unchanged,
    /// The name was taken by different content and the policy is `Skip`
    SkippedConflict,
}

/// One document handled by the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDocument {
    /// Final path of the document (or of the conflicting file when skipped)
    pub path: PathBuf,
    /// Outcome
    pub status: WriteStatus,
}

impl StagedDocument {
    /// File name without the `.md` extension, as used in wiki links
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// True if this call put new bytes on disk
    pub fn is_new(&self) -> bool {
        matches!(self.status, WriteStatus::Created | WriteStatus::Versioned(_))
    }
}

/// A document that could not be staged
#[derive(Debug)]
pub struct WriteFailure {
    /// Title of the item, or the summary's file stem
    pub target: String,
    /// Cause
    pub error: StagerError,
}

/// Outcome of staging one source file's output
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Item documents, in input order
    pub items: Vec<StagedDocument>,
    /// The summary document, unless it failed
    pub summary: Option<StagedDocument>,
    /// Everything that failed
    pub failures: Vec<WriteFailure>,
}

impl WriteReport {
    /// True if every document was staged or already present and the
    /// summary on disk is this call's own
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
            && self
                .summary
                .as_ref()
                .is_some_and(|s| s.status != WriteStatus::SkippedConflict)
    }

    /// Paths of documents written by this call
    pub fn written_paths(&self) -> Vec<&Path> {
        self.documents()
            .filter(|d| d.is_new())
            .map(|d| d.path.as_path())
            .collect()
    }

    /// Number of documents with `status`
    pub fn count(&self, status: WriteStatus) -> usize {
        self.documents().filter(|d| d.status == status).count()
    }

    fn documents(&self) -> impl Iterator<Item = &StagedDocument> {
        self.items.iter().chain(self.summary.iter())
    }
}

/// Writes staged documents under `<vault>/<staging_dir>/<YYYY-MM-DD>/`
#[derive(Debug, Clone)]
pub struct StagingWriter {
    guard: PathGuard,
    staging_dir: PathBuf,
    policy: ConflictPolicy,
}

impl StagingWriter {
    /// Create a writer for the vault behind `guard`
    ///
    /// `staging_dir` is relative to the vault root.
    pub fn new(guard: PathGuard, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            guard,
            staging_dir: staging_dir.into(),
            policy: ConflictPolicy::default(),
        }
    }

    /// Use `policy` for name conflicts
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active conflict policy
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Directory receiving documents for `date`
    pub fn date_dir(&self, date: SourceDate) -> PathBuf {
        self.guard
            .root()
            .join(&self.staging_dir)
            .join(date.to_string())
    }

    /// Base file stem of an item: sanitized title plus identifier
    pub fn item_stem(item: &ExtractedItem) -> String {
        format!("{}-{}", sanitize_filename(&item.title), item.id)
    }

    /// Base file stem of a summary
    pub fn summary_stem(summary: &SummaryDocument) -> String {
        format!("_summary-{}-{}", summary.platform, summary.source_date)
    }

    /// Stage `items` and their `summary`
    ///
    /// Items are written first so the summary can link to the names they
    /// actually landed under. A failed document is reported and the rest
    /// are still attempted.
    ///
    /// The conflict policy applies to items only. Every source file gets its
    /// own summary, so a summary whose name is taken is always versioned.
    pub fn write(&self, items: &[ExtractedItem], summary: &SummaryDocument) -> WriteReport {
        let mut report = WriteReport::default();

        let dir = match self.prepare_dir(summary.source_date) {
            Ok(dir) => dir,
            Err(error) => {
                warn!("Staging directory unavailable: {}", error);
                report.failures.push(WriteFailure {
                    target: Self::summary_stem(summary),
                    error,
                });
                return report;
            }
        };

        let mut stems = HashMap::new();
        for item in items {
            let staged = render_item(item).and_then(|content| {
                self.stage(&dir, &Self::item_stem(item), &content, self.policy)
            });
            match staged {
                Ok(doc) => {
                    stems.insert(item.id.clone(), doc.stem());
                    report.items.push(doc);
                }
                Err(error) => {
                    warn!("Failed to stage item {}: {}", item.id, error);
                    report.failures.push(WriteFailure {
                        target: item.title.clone(),
                        error,
                    });
                }
            }
        }

        let summary_stem = Self::summary_stem(summary);
        let staged = render_summary(summary, &stems).and_then(|content| {
            self.stage(&dir, &summary_stem, &content, ConflictPolicy::VersionSuffix)
        });
        match staged {
            Ok(doc) => report.summary = Some(doc),
            Err(error) => {
                warn!("Failed to stage summary {}: {}", summary_stem, error);
                report.failures.push(WriteFailure {
                    target: summary_stem,
                    error,
                });
            }
        }

        info!(
            dir = %dir.display(),
            written = report.written_paths().len(),
            unchanged = report.count(WriteStatus::Unchanged),
            failed = report.failures.len(),
            "staging complete"
        );
        report
    }

    fn prepare_dir(&self, date: SourceDate) -> Result<PathBuf, StagerError> {
        let relative = self.staging_dir.join(date.to_string());
        let dir = self.guard.validate(&relative)?;
        fs::create_dir_all(&dir).map_err(|source| StagerError::Io {
            operation: "create",
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Put `content` under `stem` in `dir`, honouring `policy`
    fn stage(
        &self,
        dir: &Path,
        stem: &str,
        content: &str,
        policy: ConflictPolicy,
    ) -> Result<StagedDocument, StagerError> {
        let mut version = 1;

        while version <= MAX_VERSIONS {
            let target = self.guard.validate(dir.join(versioned_name(stem, version)))?;

            if let Some(existing) = read_existing(&target)? {
                if existing == content.as_bytes() {
                    debug!(path = %target.display(), "identical document already staged");
                    return Ok(StagedDocument {
                        path: target,
                        status: WriteStatus::Unchanged,
                    });
                }
                if policy == ConflictPolicy::Skip {
                    warn!(path = %target.display(), "name taken by different content; skipping");
                    return Ok(StagedDocument {
                        path: target,
                        status: WriteStatus::SkippedConflict,
                    });
                }
                version += 1;
                continue;
            }

            match write_new(dir, &target, content) {
                Ok(()) => {
                    let status = if version == 1 {
                        WriteStatus::Created
                    } else {
                        WriteStatus::Versioned(version)
                    };
                    debug!(path = %target.display(), ?status, "document staged");
                    return Ok(StagedDocument {
                        path: target,
                        status,
                    });
                }
                // Created between the check and the rename; look at it again
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(source) => {
                    return Err(StagerError::Io {
                        operation: "write",
                        path: target,
                        source,
                    })
                }
            }
        }

        Err(StagerError::TooManyVersions {
            stem: stem.to_string(),
            max: MAX_VERSIONS,
        })
    }
}

fn versioned_name(stem: &str, version: u32) -> String {
    if version == 1 {
        format!("{}.md", stem)
    } else {
        format!("{}-v{}.md", stem, version)
    }
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, StagerError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StagerError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write via a temp file in `dir`, then rename without replacing
fn write_new(dir: &Path, target: &Path, content: &str) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(target).map_err(|e| e.error)?;
    Ok(())
}
