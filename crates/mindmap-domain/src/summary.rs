//! Per-source-file extraction summaries

use crate::{ExtractedItem, ItemId, ItemType, Platform, SourceDate};
use std::collections::BTreeMap;

/// Reference from a summary to one of its items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Identifier of the referenced item
    pub id: ItemId,
    /// Title of the referenced item
    pub title: String,
}

/// Aggregate of one source file's extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryDocument {
    /// Platform of the source conversation
    pub platform: Platform,
    /// Date of the source conversation
    pub source_date: SourceDate,
    /// Vault-relative path of the source conversation
    pub source_file: String,
    /// One or two sentence synopsis from the service, if any
    pub conversation_summary: Option<String>,
    /// Main themes named by the service
    pub primary_themes: Vec<String>,
    groups: BTreeMap<ItemType, Vec<SummaryEntry>>,
    item_count: usize,
}

impl SummaryDocument {
    /// Build a summary over `items`, grouping them by type
    pub fn from_items(
        items: &[ExtractedItem],
        platform: Platform,
        source_date: SourceDate,
        source_file: impl Into<String>,
        conversation_summary: Option<String>,
        primary_themes: Vec<String>,
    ) -> Self {
        let mut groups: BTreeMap<ItemType, Vec<SummaryEntry>> = BTreeMap::new();
        for item in items {
            groups.entry(item.item_type).or_default().push(SummaryEntry {
                id: item.id.clone(),
                title: item.title.clone(),
            });
        }

        Self {
            platform,
            source_date,
            source_file: source_file.into(),
            conversation_summary,
            primary_themes,
            groups,
            item_count: items.len(),
        }
    }

    /// Number of items summarised
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Entries of one type, in extraction order
    pub fn entries(&self, item_type: ItemType) -> &[SummaryEntry] {
        self.groups
            .get(&item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty groups in `ItemType::ALL` order
    pub fn groups(&self) -> impl Iterator<Item = (ItemType, &[SummaryEntry])> {
        ItemType::ALL
            .into_iter()
            .filter_map(|t| self.groups.get(&t).map(|e| (t, e.as_slice())))
    }
}
