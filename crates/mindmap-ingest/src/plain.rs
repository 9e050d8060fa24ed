//! Pasted dialogue with line-leading speaker labels

use mindmap_domain::{NormalizedTranscript, Role, Turn};

/// Labels longer than this are treated as ordinary text
const MAX_LABEL_LEN: usize = 16;

pub(crate) fn parse(text: &str) -> NormalizedTranscript {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut turns = Vec::new();
    let mut current: Option<(Role, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some((role, rest)) = split_label(line) {
            if let Some((role, lines)) = current.take() {
                turns.push(Turn::new(role, lines.join("\n").trim()));
            }
            current = Some((role, vec![rest]));
        } else {
            match current.as_mut() {
                Some((_, lines)) => lines.push(line),
                // Text before the first label is the user's
                None => current = Some((Role::User, vec![line])),
            }
        }
    }
    if let Some((role, lines)) = current {
        turns.push(Turn::new(role, lines.join("\n").trim()));
    }

    NormalizedTranscript::new(turns)
}

fn split_label(line: &str) -> Option<(Role, &str)> {
    let (label, rest) = line.trim_start().split_once(':')?;
    if label.len() > MAX_LABEL_LEN {
        return None;
    }

    let label = label.trim().trim_matches('*').trim();
    let role = match label.to_ascii_lowercase().as_str() {
        "user" | "human" | "you" | "me" => Role::User,
        "assistant" | "claude" | "chatgpt" | "gemini" | "ai" | "model" => Role::Assistant,
        _ => return None,
    };

    Some((role, rest.trim_start_matches('*').trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_turns() {
        let transcript = parse("User: What should I build?\nAssistant: A small tool.\nUser: Why?");
        let turns = transcript.turns();

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], Turn::new(Role::User, "What should I build?"));
        assert_eq!(turns[1], Turn::new(Role::Assistant, "A small tool."));
        assert_eq!(turns[2].role, Role::User);
    }

    #[test]
    fn test_multiline_turns() {
        let transcript = parse("Human: line one\nline two\n\nClaude: reply\n- a\n- b\n");
        let turns = transcript.turns();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, "line one\nline two");
        assert_eq!(turns[1].text, "reply\n- a\n- b");
    }

    #[test]
    fn test_labels_case_insensitive() {
        let transcript = parse("HUMAN: a\nassistant: b\nMe: c\nAI: d");
        let roles: Vec<_> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn test_bold_labels() {
        let transcript = parse("**User:** hi\n**Assistant:** hello");
        assert_eq!(transcript.turns()[0].text, "hi");
        assert_eq!(transcript.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_unlabeled_text_is_user() {
        let transcript = parse("Just some notes I pasted.\nNo labels here.");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::User);
    }

    #[test]
    fn test_preamble_before_first_label() {
        let transcript = parse("Context first\nAssistant: answer");
        assert_eq!(transcript.turns()[0], Turn::new(Role::User, "Context first"));
        assert_eq!(transcript.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_colon_in_ordinary_text_is_not_a_label() {
        let transcript = parse("User: Note: this matters\nThe ratio is 3:1");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].text, "Note: this matters\nThe ratio is 3:1");
    }

    #[test]
    fn test_crlf_normalised() {
        let transcript = parse("User: a\r\nb\r\nAssistant: c\r\n");
        assert_eq!(transcript.turns()[0].text, "a\nb");
        assert_eq!(transcript.turns()[1].text, "c");
    }

    #[test]
    fn test_empty_labeled_turns_dropped() {
        let transcript = parse("User:\nAssistant: only this");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::Assistant);
    }
}
