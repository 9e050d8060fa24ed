//! Platform-agnostic conversation transcripts

use std::fmt;

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The human side of the conversation
    User,
    /// The model side of the conversation
    Assistant,
}

impl Role {
    /// Uppercase label used when rendering a transcript for the extraction request
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single speaker turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Who spoke
    pub role: Role,
    /// What was said, trimmed
    pub text: String,
}

impl Turn {
    /// Create a turn
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Ordered sequence of turns produced by normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTranscript {
    turns: Vec<Turn>,
}

impl NormalizedTranscript {
    /// Build a transcript, dropping turns whose text is blank
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns: turns
                .into_iter()
                .filter(|t| !t.text.trim().is_empty())
                .collect(),
        }
    }

    /// An empty transcript
    pub fn empty() -> Self {
        Self::default()
    }

    /// The turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when there is nothing to extract from
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render as `ROLE: text` blocks separated by blank lines
    ///
    /// ```
    /// use mindmap_domain::{NormalizedTranscript, Role, Turn};
    ///
    /// let transcript = NormalizedTranscript::new(vec![
    ///     Turn::new(Role::User, "Hi"),
    ///     Turn::new(Role::Assistant, "Hello"),
    /// ]);
    /// assert_eq!(transcript.render(), "USER: Hi\n\nASSISTANT: Hello");
    /// ```
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total characters across all turns
    pub fn char_count(&self) -> usize {
        self.turns.iter().map(|t| t.text.chars().count()).sum()
    }
}
