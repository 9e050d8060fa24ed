//! YAML frontmatter blocks

use mindmap_domain::{ExtractedItem, SummaryDocument};
use serde::Serialize;

/// Review status of every freshly staged item
pub const STAGED_STATUS: &str = "staged";

/// Frontmatter of an item document
///
/// The first six fields are the contract with downstream tooling; the rest
/// are informational.
#[derive(Debug, Serialize)]
pub struct ItemFrontmatter<'a> {
    /// Item title
    pub title: &'a str,
    /// Item type
    #[serde(rename = "type")]
    pub item_type: &'static str,
    /// Source platform
    pub source: &'static str,
    /// Source date, `YYYY-MM-DD`
    pub source_date: String,
    /// Always [`STAGED_STATUS`]
    pub status: &'static str,
    /// Deterministic identifier
    pub id: &'a str,
    /// Vault-relative source path
    pub source_file: &'a str,
    /// Related themes
    pub tags: &'a [String],
    /// Support level
    pub confidence: &'static str,
}

impl<'a> ItemFrontmatter<'a> {
    /// Frontmatter for `item`
    pub fn for_item(item: &'a ExtractedItem) -> Self {
        Self {
            title: &item.title,
            item_type: item.item_type.as_str(),
            source: item.source.as_str(),
            source_date: item.source_date.to_string(),
            status: STAGED_STATUS,
            id: item.id.as_str(),
            source_file: &item.source_file,
            tags: &item.tags,
            confidence: item.confidence.as_str(),
        }
    }
}

/// Frontmatter of a summary document
#[derive(Debug, Serialize)]
pub struct SummaryFrontmatter<'a> {
    /// Always `extraction-summary`
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    /// Source platform
    pub source: &'static str,
    /// Source date, `YYYY-MM-DD`
    pub source_date: String,
    /// Vault-relative source path
    pub source_file: &'a str,
    /// Number of items extracted
    pub item_count: usize,
}

impl<'a> SummaryFrontmatter<'a> {
    /// Frontmatter for `summary`
    pub fn for_summary(summary: &'a SummaryDocument) -> Self {
        Self {
            doc_type: "extraction-summary",
            source: summary.platform.as_str(),
            source_date: summary.source_date.to_string(),
            source_file: &summary.source_file,
            item_count: summary.item_count(),
        }
    }
}

/// Serialize `value` as a `---` delimited block, ending in a newline
pub(crate) fn to_block<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(value)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Split a document into its frontmatter YAML and body
///
/// Returns `None` if the document does not open with a `---` line or the
/// block is never closed.
///
/// # Examples
///
/// ```
/// use mindmap_stager::split_frontmatter;
///
/// let (yaml, body) = split_frontmatter("---\nid: abc\n---\n\n# Title\n").unwrap();
/// assert_eq!(yaml, "id: abc\n");
/// assert_eq!(body, "\n# Title\n");
/// ```
pub fn split_frontmatter(document: &str) -> Option<(&str, &str)> {
    let rest = document.strip_prefix("---\n")?;
    let end = rest.find("\n---\n")?;
    Some((&rest[..end + 1], &rest[end + 5..]))
}
