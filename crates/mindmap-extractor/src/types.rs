//! Request and response types for extraction

use mindmap_domain::{
    Confidence, ExtractedItem, ItemType, NormalizedTranscript, Platform, SourceDate,
    SummaryDocument,
};

/// Supplementary reference text injected ahead of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDocument {
    /// Display name, usually the file name
    pub name: String,
    /// Full text
    pub content: String,
}

impl ContextDocument {
    /// Create a context document
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Request to extract items from one conversation
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Normalized conversation
    pub transcript: &'a NormalizedTranscript,

    /// Platform of the source file
    pub platform: Platform,

    /// Date of the source file
    pub source_date: SourceDate,

    /// Vault-relative path of the source file
    pub source_file: &'a str,

    /// Context documents, possibly empty
    pub context: &'a [ContextDocument],
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Items in response order, with deterministic identifiers
    pub items: Vec<ExtractedItem>,

    /// Summary over `items`
    pub summary: SummaryDocument,

    /// Attempts used, including the successful one
    pub attempts: u32,

    /// Response items dropped as invalid or duplicate
    pub skipped_items: usize,

    /// Model that produced the response
    pub model: String,
}

/// Internal representation of an item from the service response
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ItemCandidate {
    pub item_type: ItemType,
    pub title: String,
    pub content: String,
    pub key_quote: Option<String>,
    pub related_themes: Vec<String>,
    pub confidence: Confidence,
}

impl ItemCandidate {
    /// Validate that the candidate carries usable text
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content cannot be empty".to_string());
        }
        Ok(())
    }

    /// Attach provenance and derive the identifier
    pub fn into_item(self, platform: Platform, source_file: &str, source_date: SourceDate) -> ExtractedItem {
        ExtractedItem::new(
            self.item_type,
            self.title,
            self.content,
            self.key_quote,
            self.related_themes,
            self.confidence,
            platform,
            source_file,
            source_date,
        )
    }
}

/// Parsed service response before provenance is attached
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParsedResponse {
    pub candidates: Vec<ItemCandidate>,
    pub conversation_summary: Option<String>,
    pub primary_themes: Vec<String>,
    pub skipped: usize,
}
