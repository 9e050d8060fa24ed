//! Per-platform normalization into transcripts

use crate::{chatgpt, plain};
use mindmap_domain::{ConversationFile, NormalizedTranscript, Platform};
use tracing::debug;

/// Input format expected from a platform's inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Copy-pasted dialogue with speaker labels
    PlainDialogue,
    /// ChatGPT data export JSON, falling back to [`Format::PlainDialogue`]
    ChatGptExport,
}

impl Format {
    /// Format used for files from `platform`
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Claude | Platform::Gemini => Format::PlainDialogue,
            Platform::ChatGpt => Format::ChatGptExport,
        }
    }

    /// Normalize `text` in this format
    pub fn normalize(&self, text: &str) -> NormalizedTranscript {
        if text.trim().is_empty() {
            return NormalizedTranscript::empty();
        }

        match self {
            Format::PlainDialogue => plain::parse(text),
            Format::ChatGptExport => chatgpt::parse(text).unwrap_or_else(|| {
                debug!("not a usable ChatGPT export; reading as plain dialogue");
                plain::parse(text)
            }),
        }
    }
}

/// Normalize a loaded conversation file
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn normalize(file: &ConversationFile) -> NormalizedTranscript {
    normalize_text(file.platform, &file.text())
}

/// Normalize raw text as if it came from `platform`'s inbox
pub fn normalize_text(platform: Platform, text: &str) -> NormalizedTranscript {
    Format::for_platform(platform).normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_domain::Role;

    #[test]
    fn test_empty_and_whitespace_yield_empty() {
        for platform in Platform::ALL {
            assert!(normalize_text(platform, "").is_empty());
            assert!(normalize_text(platform, "  \n\t \r\n").is_empty());
        }
    }

    #[test]
    fn test_platform_decides_format() {
        let json = r#"[{"role": "user", "content": "hi"}]"#;

        let as_chatgpt = normalize_text(Platform::ChatGpt, json);
        assert_eq!(as_chatgpt.turns()[0].text, "hi");

        // The same bytes in the Claude inbox are treated as pasted text
        let as_claude = normalize_text(Platform::Claude, json);
        assert_eq!(as_claude.len(), 1);
        assert!(as_claude.turns()[0].text.contains("\"role\""));
    }

    #[test]
    fn test_malformed_chatgpt_json_falls_back() {
        let transcript = normalize_text(Platform::ChatGpt, "{ not json\nUser: still here");
        assert!(!transcript.is_empty());
        assert!(transcript
            .turns()
            .iter()
            .any(|t| t.role == Role::User && t.text == "still here"));
    }

    #[test]
    fn test_gemini_is_plain_dialogue() {
        let transcript = normalize_text(Platform::Gemini, "You: what?\nGemini: this.");
        assert_eq!(transcript.turns()[0].role, Role::User);
        assert_eq!(transcript.turns()[1].role, Role::Assistant);
    }
}
