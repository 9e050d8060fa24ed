//! Persisted registry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final outcome of a file's processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Items and summary were staged
    Success,
    /// The run ended in a terminal failure; the file is retried next time
    Failed,
}

/// Registry entry for one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingLogEntry {
    /// Path relative to the vault root
    pub path: String,
    /// Content hash the outcome refers to
    pub hash: String,
    /// When the outcome was recorded
    pub last_processed: DateTime<Utc>,
    /// Outcome
    pub status: ProcessingStatus,
}

/// The whole registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingLog {
    /// One entry per distinct path
    #[serde(default)]
    pub entries: Vec<ProcessingLogEntry>,
    /// End of the most recent live run
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
}

impl ProcessingLog {
    /// Entry for `path`, if any
    pub fn entry(&self, path: &str) -> Option<&ProcessingLogEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Insert or update the entry for `entry.path`
    pub fn upsert(&mut self, entry: ProcessingLogEntry) {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, hash: &str, status: ProcessingStatus) -> ProcessingLogEntry {
        ProcessingLogEntry {
            path: path.to_string(),
            hash: hash.to_string(),
            last_processed: Utc::now(),
            status,
        }
    }

    #[test]
    fn test_upsert_replaces_existing_entry() {
        let mut log = ProcessingLog::default();
        log.upsert(entry("a.txt", "h1", ProcessingStatus::Failed));
        log.upsert(entry("a.txt", "h2", ProcessingStatus::Success));
        log.upsert(entry("b.txt", "h3", ProcessingStatus::Success));

        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entry("a.txt").unwrap().hash, "h2");
        assert_eq!(log.entry("a.txt").unwrap().status, ProcessingStatus::Success);
    }

    #[test]
    fn test_status_serialized_lowercase() {
        let json = serde_json::to_string(&ProcessingStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
    }

    #[test]
    fn test_missing_fields_default() {
        let log: ProcessingLog = serde_json::from_str("{}").unwrap();
        assert!(log.entries.is_empty());
        assert!(log.last_run.is_none());
    }
}
