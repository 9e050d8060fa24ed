//! Markdown rendering of staged documents

use crate::frontmatter::{to_block, ItemFrontmatter, SummaryFrontmatter};
use crate::StagerError;
use mindmap_domain::{ExtractedItem, ItemId, SummaryDocument};
use std::collections::HashMap;

const NO_QUOTE: &str = "_No quote captured._";
const NO_SUMMARY: &str = "No summary available";
const NO_THEMES: &str = "_None identified._";
const REVIEW_PLACEHOLDER: &str = "_Add your notes here when reviewing this item._";
const REVIEW_ACTION: &str = "- [ ] Review and route to appropriate folder";

/// Render one item document
///
/// The output depends only on the item, never on the clock.
pub fn render_item(item: &ExtractedItem) -> Result<String, StagerError> {
    let mut doc = to_block(&ItemFrontmatter::for_item(item))?;

    doc.push_str(&format!("\n# {}\n\n", single_line(&item.title)));
    doc.push_str(item.body.trim());
    doc.push_str("\n\n## Key Quote\n\n");
    match item.key_quote.as_deref().map(str::trim) {
        Some(quote) if !quote.is_empty() => {
            for line in quote.lines().map(str::trim_end) {
                if line.is_empty() {
                    doc.push_str(">\n");
                } else {
                    doc.push_str(&format!("> {}\n", line));
                }
            }
        }
        _ => {
            doc.push_str(NO_QUOTE);
            doc.push('\n');
        }
    }
    doc.push_str(&format!("\n## Review Notes\n\n{}\n", REVIEW_PLACEHOLDER));
    doc.push_str(&format!("\n## Actions\n\n{}\n", REVIEW_ACTION));

    Ok(doc)
}

/// Render the summary document
///
/// `stems` maps item identifiers to the file stems they were written under,
/// so links follow any version suffix. Items missing from the map are listed
/// without a link.
pub fn render_summary(
    summary: &SummaryDocument,
    stems: &HashMap<ItemId, String>,
) -> Result<String, StagerError> {
    let mut doc = to_block(&SummaryFrontmatter::for_summary(summary))?;

    doc.push_str(&format!(
        "\n# Extraction Summary: {} ({})\n",
        summary.platform, summary.source_date
    ));

    let synopsis = summary
        .conversation_summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY);
    doc.push_str(&format!("\n## Conversation Summary\n\n{}\n", synopsis));

    doc.push_str("\n## Primary Themes\n\n");
    if summary.primary_themes.is_empty() {
        doc.push_str(NO_THEMES);
        doc.push('\n');
    } else {
        for theme in &summary.primary_themes {
            doc.push_str(&format!("- {}\n", single_line(theme)));
        }
    }

    doc.push_str("\n## Extracted Items\n");
    if summary.item_count() == 0 {
        doc.push_str("\nNo items extracted.\n");
    }
    for (item_type, entries) in summary.groups() {
        doc.push_str(&format!(
            "\n### {} ({})\n\n",
            item_type.plural_heading(),
            entries.len()
        ));
        for entry in entries {
            let label = link_label(&entry.title);
            match stems.get(&entry.id) {
                Some(stem) => doc.push_str(&format!("- [[{}|{}]]\n", stem, label)),
                None => doc.push_str(&format!("- {}\n", label)),
            }
        }
    }

    Ok(doc)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Link labels cannot contain the link delimiters
fn link_label(title: &str) -> String {
    single_line(title)
        .replace('|', "-")
        .replace("[[", "")
        .replace("]]", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split_frontmatter;
    use mindmap_domain::{Confidence, ItemType, Platform, SourceDate};

    fn date() -> SourceDate {
        SourceDate::from_ymd(2024, 12, 7).unwrap()
    }

    fn item(item_type: ItemType, title: &str, quote: Option<&str>) -> ExtractedItem {
        ExtractedItem::new(
            item_type,
            title,
            "Launch after the holidays.\n",
            quote.map(str::to_string),
            vec![],
            Confidence::High,
            Platform::Claude,
            "00-Inbox/claude/2024-12-07-demo.txt",
            date(),
        )
    }

    #[test]
    fn test_item_sections() {
        let item = item(ItemType::Decision, "Launch in March", Some("Let's wait."));
        let doc = render_item(&item).unwrap();
        let (_, body) = split_frontmatter(&doc).unwrap();

        assert!(body.starts_with("\n# Launch in March\n\nLaunch after the holidays.\n"));
        assert!(body.contains("## Key Quote\n\n> Let's wait.\n"));
        assert!(body.contains("## Review Notes\n\n_Add your notes here"));
        assert!(body.ends_with("## Actions\n\n- [ ] Review and route to appropriate folder\n"));
    }

    #[test]
    fn test_multiline_quote_is_blockquoted() {
        let item = item(ItemType::Insight, "Pricing", Some("first\n\nsecond"));
        let doc = render_item(&item).unwrap();
        assert!(doc.contains("> first\n>\n> second\n"));
    }

    #[test]
    fn test_missing_quote_placeholder() {
        let doc = render_item(&item(ItemType::Insight, "Pricing", None)).unwrap();
        assert!(doc.contains(NO_QUOTE));
        let doc = render_item(&item(ItemType::Insight, "Pricing", Some("  "))).unwrap();
        assert!(doc.contains(NO_QUOTE));
    }

    #[test]
    fn test_rendering_is_stable() {
        let item = item(ItemType::Theme, "Launch timing", None);
        assert_eq!(render_item(&item).unwrap(), render_item(&item).unwrap());
    }

    #[test]
    fn test_summary_links_and_groups() {
        let items = vec![
            item(ItemType::Decision, "Launch in March", None),
            item(ItemType::Theme, "Launch timing", None),
        ];
        let summary = SummaryDocument::from_items(
            &items,
            Platform::Claude,
            date(),
            "00-Inbox/claude/2024-12-07-demo.txt",
            Some("Planning the launch.".to_string()),
            vec!["Launch".to_string()],
        );
        let mut stems = HashMap::new();
        stems.insert(items[0].id.clone(), "launch-in-march-abc-v2".to_string());
        stems.insert(items[1].id.clone(), "launch-timing-def".to_string());

        let doc = render_summary(&summary, &stems).unwrap();
        let (yaml, body) = split_frontmatter(&doc).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(value["type"].as_str(), Some("extraction-summary"));
        assert_eq!(value["item_count"].as_u64(), Some(2));

        assert!(body.contains("# Extraction Summary: claude (2024-12-07)"));
        assert!(body.contains("## Conversation Summary\n\nPlanning the launch.\n"));
        assert!(body.contains("## Primary Themes\n\n- Launch\n"));

        let themes = body.find("### Themes (1)").unwrap();
        let decisions = body.find("### Decisions (1)").unwrap();
        assert!(themes < decisions);
        assert!(body.contains("- [[launch-in-march-abc-v2|Launch in March]]"));
        assert!(body.contains("- [[launch-timing-def|Launch timing]]"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = SummaryDocument::from_items(
            &[],
            Platform::Gemini,
            date(),
            "00-Inbox/gemini/x.txt",
            None,
            vec![],
        );
        let doc = render_summary(&summary, &HashMap::new()).unwrap();
        assert!(doc.contains(NO_SUMMARY));
        assert!(doc.contains(NO_THEMES));
        assert!(doc.contains("No items extracted."));
        assert!(!doc.contains("###"));
    }

    #[test]
    fn test_link_label_strips_delimiters() {
        assert_eq!(link_label("a | b ]] [[c"), "a - b  c");
    }
}
