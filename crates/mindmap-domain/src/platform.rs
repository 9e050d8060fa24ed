//! Source platforms for conversation exports

use std::fmt;
use std::str::FromStr;

/// The platform a conversation export came from.
///
/// The platform is decided once, at discovery time, from the inbox folder a
/// file sits in. Content is never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    /// Claude copy/paste transcripts
    Claude,
    /// ChatGPT exports (JSON or pasted text)
    ChatGpt,
    /// Gemini copy/paste transcripts
    Gemini,
}

impl Platform {
    /// Every platform, in inbox scan order
    pub const ALL: [Platform; 3] = [Platform::Claude, Platform::ChatGpt, Platform::Gemini];

    /// Lowercase identifier used in config keys, frontmatter and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Claude => "claude",
            Platform::ChatGpt => "chatgpt",
            Platform::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    /// Parse a platform identifier. Matching is exact: inbox folder names are
    /// configuration, not user prose.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Platform::Claude),
            "chatgpt" => Ok(Platform::ChatGpt),
            "gemini" => Ok(Platform::Gemini),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}
