//! Extracted knowledge items

use crate::{Platform, SourceDate};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Number of hex characters kept from the identifier digest
pub const ITEM_ID_LEN: usize = 12;

/// Kind of knowledge item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemType {
    /// Recurring topic; becomes a hub note
    Theme,
    /// A choice that was made
    Decision,
    /// A concrete next step
    Action,
    /// A realization or reframe
    Insight,
}

impl ItemType {
    /// Every type, in summary rendering order
    pub const ALL: [ItemType; 4] = [
        ItemType::Theme,
        ItemType::Decision,
        ItemType::Action,
        ItemType::Insight,
    ];

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Theme => "theme",
            ItemType::Decision => "decision",
            ItemType::Action => "action",
            ItemType::Insight => "insight",
        }
    }

    /// Plural heading used in summaries
    pub fn plural_heading(&self) -> &'static str {
        match self {
            ItemType::Theme => "Themes",
            ItemType::Decision => "Decisions",
            ItemType::Action => "Actions",
            ItemType::Insight => "Insights",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theme" => Ok(ItemType::Theme),
            "decision" => Ok(ItemType::Decision),
            "action" => Ok(ItemType::Action),
            "insight" => Ok(ItemType::Insight),
            other => Err(format!("Unknown item type: {}", other)),
        }
    }
}

/// How strongly the conversation supports an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confidence {
    /// Explicitly stated
    High,
    /// Strongly implied
    #[default]
    Medium,
    /// Loosely connected
    Low,
}

impl Confidence {
    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    /// Lenient parse; anything unrecognised is `Medium`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Confidence::High,
            "low" => Confidence::Low,
            _ => Confidence::Medium,
        }
    }
}

/// Deterministic identifier of an extracted item
///
/// Derived from type, title, source platform and source date only, so the
/// same extraction output always yields the same identifier across retries
/// and reruns.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    /// Derive the identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap_domain::{ItemId, ItemType, Platform, SourceDate};
    ///
    /// let date = SourceDate::from_ymd(2024, 12, 7).unwrap();
    /// let a = ItemId::derive(ItemType::Theme, "Launch", Platform::Claude, date);
    /// let b = ItemId::derive(ItemType::Theme, "Launch", Platform::Claude, date);
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str().len(), 12);
    /// ```
    pub fn derive(
        item_type: ItemType,
        title: &str,
        source: Platform,
        source_date: SourceDate,
    ) -> Self {
        let material = format!("{}-{}-{}-{}", item_type, title, source, source_date);
        let digest = format!("{:x}", Sha256::digest(material.as_bytes()));
        Self(digest[..ITEM_ID_LEN].to_string())
    }

    /// The hex identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A knowledge item produced by the extraction service
///
/// Created by response parsing, written once by the staging writer, never
/// mutated in between.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedItem {
    /// Deterministic identifier
    pub id: ItemId,
    /// Kind of item
    pub item_type: ItemType,
    /// Short title; untrusted text
    pub title: String,
    /// Explanation of the item
    pub body: String,
    /// Verbatim quote for search-back
    pub key_quote: Option<String>,
    /// Related themes, usually `[[Wiki Link]]` strings
    pub tags: Vec<String>,
    /// Support level reported by the service
    pub confidence: Confidence,
    /// Platform of the source conversation
    pub source: Platform,
    /// Vault-relative path of the source conversation
    pub source_file: String,
    /// Date of the source conversation
    pub source_date: SourceDate,
}

impl ExtractedItem {
    /// Create an item, computing its identifier from its own fields
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_type: ItemType,
        title: impl Into<String>,
        body: impl Into<String>,
        key_quote: Option<String>,
        tags: Vec<String>,
        confidence: Confidence,
        source: Platform,
        source_file: impl Into<String>,
        source_date: SourceDate,
    ) -> Self {
        let title = title.into();
        let id = ItemId::derive(item_type, &title, source, source_date);
        Self {
            id,
            item_type,
            title,
            body: body.into(),
            key_quote,
            tags,
            confidence,
            source,
            source_file: source_file.into(),
            source_date,
        }
    }
}
