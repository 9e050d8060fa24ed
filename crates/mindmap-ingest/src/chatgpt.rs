//! ChatGPT data-export JSON

use mindmap_domain::{NormalizedTranscript, Role, Turn};
use serde_json::{Map, Value};

/// Parse a ChatGPT export, or `None` if the text is not one
///
/// Accepted shapes:
/// - a conversation object with a `mapping` tree
/// - an array of such conversations (`conversations.json`)
/// - a bare array of messages
/// - an object with a `messages` array
pub(crate) fn parse(text: &str) -> Option<NormalizedTranscript> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;

    let turns = match &value {
        Value::Object(obj) => from_conversation(obj)?,
        Value::Array(elements) => {
            if elements.iter().any(|e| e.get("mapping").is_some()) {
                elements
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(from_conversation)
                    .flatten()
                    .collect()
            } else {
                from_messages(elements)
            }
        }
        _ => return None,
    };

    let transcript = NormalizedTranscript::new(turns);
    (!transcript.is_empty()).then_some(transcript)
}

fn from_conversation(obj: &Map<String, Value>) -> Option<Vec<Turn>> {
    if let Some(Value::Object(mapping)) = obj.get("mapping") {
        Some(from_mapping(mapping))
    } else if let Some(Value::Array(messages)) = obj.get("messages") {
        Some(from_messages(messages))
    } else {
        None
    }
}

/// Nodes in document order, re-sorted by `create_time` only when every
/// message carries one
fn from_mapping(mapping: &Map<String, Value>) -> Vec<Turn> {
    let mut timed: Vec<(Option<f64>, Turn)> = mapping
        .values()
        .filter_map(|node| node.get("message"))
        .filter_map(|message| {
            let turn = turn_from_message(message)?;
            let created = message.get("create_time").and_then(Value::as_f64);
            Some((created, turn))
        })
        .collect();

    if timed.iter().all(|(created, _)| created.is_some()) {
        timed.sort_by(|(a, _), (b, _)| a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0)));
    }

    timed.into_iter().map(|(_, turn)| turn).collect()
}

fn from_messages(messages: &[Value]) -> Vec<Turn> {
    messages.iter().filter_map(turn_from_message).collect()
}

/// `None` for system/tool messages and messages without text
fn turn_from_message(message: &Value) -> Option<Turn> {
    let role = message
        .get("author")
        .and_then(|a| a.get("role"))
        .or_else(|| message.get("role"))
        .and_then(Value::as_str)?;

    let role = match role {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        _ => return None,
    };

    let text = match message.get("content") {
        Some(Value::Object(content)) => match content.get("parts") {
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            _ => content.get("text").and_then(Value::as_str)?.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        _ => message.get("text").and_then(Value::as_str)?.to_string(),
    };

    let text = text.trim();
    (!text.is_empty()).then(|| Turn::new(role, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_EXPORT: &str = r#"{
        "title": "Launch plan",
        "mapping": {
            "root": { "message": null, "children": ["a"] },
            "sys": { "message": { "author": { "role": "system" }, "content": { "parts": ["You are helpful"] }, "create_time": 1.0 } },
            "a": { "message": { "author": { "role": "user" }, "content": { "parts": ["Should I", "launch?"] }, "create_time": 2.0 } },
            "b": { "message": { "author": { "role": "assistant" }, "content": { "parts": ["Yes.", {"image": "x"}] }, "create_time": 3.0 } }
        }
    }"#;

    #[test]
    fn test_mapping_tree() {
        let transcript = parse(MAPPING_EXPORT).unwrap();
        let turns = transcript.turns();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::new(Role::User, "Should I launch?"));
        assert_eq!(turns[1], Turn::new(Role::Assistant, "Yes."));
    }

    #[test]
    fn test_mapping_ordered_by_create_time() {
        let json = r#"{"mapping": {
            "late": { "message": { "author": { "role": "assistant" }, "content": { "parts": ["second"] }, "create_time": 20.5 } },
            "early": { "message": { "author": { "role": "user" }, "content": { "parts": ["first"] }, "create_time": 10.0 } }
        }}"#;
        let transcript = parse(json).unwrap();
        assert_eq!(transcript.turns()[0].text, "first");
        assert_eq!(transcript.turns()[1].text, "second");
    }

    #[test]
    fn test_mapping_document_order_without_times() {
        let json = r#"{"mapping": {
            "x": { "message": { "author": { "role": "assistant" }, "content": { "parts": ["one"] }, "create_time": 99.0 } },
            "y": { "message": { "author": { "role": "user" }, "content": { "parts": ["two"] } } }
        }}"#;
        let transcript = parse(json).unwrap();
        assert_eq!(transcript.turns()[0].text, "one");
        assert_eq!(transcript.turns()[1].text, "two");
    }

    #[test]
    fn test_conversation_array() {
        let json = format!("[{}, {}]", MAPPING_EXPORT, MAPPING_EXPORT);
        assert_eq!(parse(&json).unwrap().len(), 4);
    }

    #[test]
    fn test_bare_message_array() {
        let json = r#"[
            {"role": "user", "content": "hi"},
            {"role": "tool", "content": "ignored"},
            {"role": "assistant", "content": "hello"}
        ]"#;
        let transcript = parse(json).unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_messages_object() {
        let json = r#"{"messages": [{"author": {"role": "user"}, "text": "hey"}]}"#;
        assert_eq!(parse(json).unwrap().turns()[0].text, "hey");
    }

    #[test]
    fn test_unusable_json_is_none() {
        assert!(parse("not json").is_none());
        assert!(parse("42").is_none());
        assert!(parse(r#"{"title": "no messages"}"#).is_none());
        assert!(parse(r#"{"mapping": {}}"#).is_none());
        assert!(parse(r#"[{"role": "system", "content": "only system"}]"#).is_none());
    }
}
