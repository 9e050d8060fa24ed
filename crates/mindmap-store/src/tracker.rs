//! Change detection over the processing log

use crate::{ProcessingLog, ProcessingLogEntry, ProcessingStatus, StoreError};
use chrono::{DateTime, Utc};
use mindmap_domain::ContentHash;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Why a file does or does not need processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// No registry entry for the path
    New,
    /// The stored hash differs from the current one
    Modified,
    /// Same content, but the last run for it failed
    PreviouslyFailed,
    /// Same content, already staged successfully
    Unchanged,
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeReason::New => "new",
            ChangeReason::Modified => "modified",
            ChangeReason::PreviouslyFailed => "previously failed",
            ChangeReason::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// Result of [`ChangeTracker::should_process`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDecision {
    /// Whether the file must go through the pipeline
    pub process: bool,
    /// Why
    pub reason: ChangeReason,
}

/// Registry of content hashes per input file
///
/// Not safe for concurrent invocations against the same vault; one pipeline
/// run owns the registry at a time.
#[derive(Debug)]
pub struct ChangeTracker {
    path: PathBuf,
    log: ProcessingLog,
}

impl ChangeTracker {
    /// Open the registry at `path`
    ///
    /// A missing file yields an empty registry. A file that exists but cannot
    /// be read or parsed is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let log = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no processing log yet; starting empty");
                ProcessingLog::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(Self { path, log })
    }

    /// Location of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory registry
    pub fn log(&self) -> &ProcessingLog {
        &self.log
    }

    /// End of the most recent live run
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.log.last_run
    }

    /// Decide whether the file at `relative_path` with content `hash` must be processed
    pub fn should_process(&self, relative_path: &str, hash: &ContentHash) -> ChangeDecision {
        let reason = match self.log.entry(relative_path) {
            None => ChangeReason::New,
            Some(entry) if entry.hash != hash.as_str() => ChangeReason::Modified,
            Some(entry) if entry.status == ProcessingStatus::Failed => {
                ChangeReason::PreviouslyFailed
            }
            Some(_) => ChangeReason::Unchanged,
        };

        ChangeDecision {
            process: reason != ChangeReason::Unchanged,
            reason,
        }
    }

    /// Record the concluded outcome of a file's run and persist the registry
    ///
    /// Call only once the outcome is final: after success, or after a
    /// non-retryable failure or exhausted retries.
    pub fn record(
        &mut self,
        relative_path: &str,
        hash: &ContentHash,
        status: ProcessingStatus,
    ) -> Result<(), StoreError> {
        self.log.upsert(ProcessingLogEntry {
            path: relative_path.to_string(),
            hash: hash.as_str().to_string(),
            last_processed: Utc::now(),
            status,
        });
        self.save()
    }

    /// Stamp `last_run` and persist
    pub fn finish_run(&mut self) -> Result<(), StoreError> {
        self.log.last_run = Some(Utc::now());
        self.save()
    }

    /// Replace the registry file atomically
    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.log)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), entries = self.log.entries.len(), "processing log saved");
        Ok(())
    }
}
