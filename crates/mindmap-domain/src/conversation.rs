//! Conversation files as read from an inbox

use crate::Platform;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// SHA-256 digest of a file's raw bytes, as 64 lowercase hex characters
///
/// The hash alone decides whether a file needs reprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash raw bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap_domain::ContentHash;
    ///
    /// let hash = ContentHash::of(b"hello");
    /// assert_eq!(hash.as_str().len(), 64);
    /// assert_eq!(hash, ContentHash::of(b"hello"));
    /// ```
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(format!("{:x}", digest))
    }

    /// Wrap a previously persisted hex digest
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar date a conversation took place, rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceDate(NaiveDate);

impl SourceDate {
    /// Wrap a calendar date
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month and day; `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse exactly `YYYY-MM-DD`
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }

    /// The underlying date
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SourceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One conversation export, read once and never mutated
#[derive(Debug, Clone)]
pub struct ConversationFile {
    /// Absolute path of the file
    pub path: PathBuf,

    /// Path relative to the vault root, with `/` separators
    pub relative_path: String,

    /// Platform decided by the containing inbox folder
    pub platform: Platform,

    /// Raw bytes as read from disk
    pub content: Vec<u8>,

    /// Date from the filename, or the modification time
    pub source_date: SourceDate,

    /// Digest of `content`
    pub hash: ContentHash,
}

impl ConversationFile {
    /// Build a file snapshot, hashing the content
    pub fn new(
        path: PathBuf,
        relative_path: String,
        platform: Platform,
        content: Vec<u8>,
        source_date: SourceDate,
    ) -> Self {
        let hash = ContentHash::of(&content);
        Self {
            path,
            relative_path,
            platform,
            content,
            source_date,
            hash,
        }
    }

    /// Content as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.relative_path.clone())
    }
}
