//! Prompt assembly for knowledge extraction

use crate::types::ContextDocument;
use mindmap_domain::{NormalizedTranscript, Platform, SourceDate};

/// Builds the user message for one extraction request
pub struct PromptBuilder<'a> {
    transcript: &'a NormalizedTranscript,
    platform: Platform,
    source_date: SourceDate,
    context: &'a [ContextDocument],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(transcript: &'a NormalizedTranscript, platform: Platform, source_date: SourceDate) -> Self {
        Self {
            transcript,
            platform,
            source_date,
            context: &[],
        }
    }

    /// Add context documents
    pub fn with_context(mut self, context: &'a [ContextDocument]) -> Self {
        self.context = context;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Project context
        prompt.push_str("## Project Context\n");
        prompt.push_str(&render_context(self.context));
        prompt.push_str("\n\n");

        // 2. The conversation
        prompt.push_str("## Conversation\n");
        prompt.push_str(&format!("Source: {}\n", self.platform));
        prompt.push_str(&format!("Date: {}\n\n", self.source_date));
        prompt.push_str(&self.transcript.render());
        prompt.push_str("\n\n---\n\n");

        // 3. What to extract and how to answer
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);

        prompt
    }
}

/// Render context documents as `### <name>` sections separated by `---`
pub fn render_context(context: &[ContextDocument]) -> String {
    if context.is_empty() {
        return NO_CONTEXT.to_string();
    }
    context
        .iter()
        .map(|doc| format!("### {}\n{}", doc.name, doc.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// System instruction sent with every request
pub const SYSTEM_PROMPT: &str = r#"You extract structured knowledge from conversation transcripts for a personal note vault.
Each extracted item becomes a note that the user reviews by hand.

Rules:
- Extract only what the conversation actually contains; do not extrapolate
- Give every item a key_quote copied verbatim from the transcript so it can be searched
- Write related themes as [[Wiki Link]] strings
- Prefer a few strong items over many weak ones
- confidence is "high" when stated outright, "medium" when strongly implied, "low" when loosely connected

Answer with a single JSON object and nothing else."#;

const NO_CONTEXT: &str = "(No project context provided)";

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract items of these types:

- theme: a topic discussed in substance, not just mentioned
- decision: a choice the user actually made, with its reasoning when given
- action: a concrete next step with a clear done state
- insight: a realization, reframe, or non-obvious connection

Most conversations yield between three and eight items."#;

const OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{
  "items": [
    {
      "type": "theme|decision|action|insight",
      "title": "Short title, 3-7 words",
      "content": "2-4 sentences explaining the item",
      "key_quote": "Exact quote from the conversation",
      "related_themes": ["[[Theme Name]]"],
      "confidence": "high|medium|low"
    }
  ],
  "conversation_summary": "1-2 sentences on what the conversation was about",
  "primary_themes": ["[[Main Theme]]"]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_domain::{Role, Turn};

    fn transcript() -> NormalizedTranscript {
        NormalizedTranscript::new(vec![
            Turn::new(Role::User, "Should we launch in March?"),
            Turn::new(Role::Assistant, "March works if pricing is settled."),
        ])
    }

    fn date() -> SourceDate {
        SourceDate::from_ymd(2024, 12, 7).unwrap()
    }

    #[test]
    fn test_prompt_includes_transcript_and_source() {
        let transcript = transcript();
        let prompt = PromptBuilder::new(&transcript, Platform::ChatGpt, date()).build();

        assert!(prompt.contains("USER: Should we launch in March?"));
        assert!(prompt.contains("ASSISTANT: March works"));
        assert!(prompt.contains("Source: chatgpt"));
        assert!(prompt.contains("Date: 2024-12-07"));
    }

    #[test]
    fn test_prompt_without_context() {
        let transcript = transcript();
        let prompt = PromptBuilder::new(&transcript, Platform::Claude, date()).build();
        assert!(prompt.contains(NO_CONTEXT));
    }

    #[test]
    fn test_prompt_includes_context_before_transcript() {
        let transcript = transcript();
        let context = vec![
            ContextDocument::new("Launch_Bible.md", "Launch is Q1.\n"),
            ContextDocument::new("Pricing.md", "Tiered pricing."),
        ];
        let prompt = PromptBuilder::new(&transcript, Platform::Claude, date())
            .with_context(&context)
            .build();

        let bible = prompt.find("### Launch_Bible.md\nLaunch is Q1.").unwrap();
        let pricing = prompt.find("### Pricing.md").unwrap();
        let conversation = prompt.find("USER:").unwrap();
        assert!(bible < pricing && pricing < conversation);
        assert!(prompt.contains("Launch is Q1.\n\n---\n\n### Pricing.md"));
        assert!(!prompt.contains(NO_CONTEXT));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let transcript = transcript();
        let prompt = PromptBuilder::new(&transcript, Platform::Gemini, date()).build();
        assert!(prompt.contains("key_quote"));
        assert!(prompt.contains("primary_themes"));
        assert!(prompt.contains("theme|decision|action|insight"));
    }
}
