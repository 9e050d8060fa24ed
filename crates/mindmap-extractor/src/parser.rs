//! Parse service output into item candidates

use crate::types::{ItemCandidate, ParsedResponse};
use mindmap_domain::{Confidence, ItemType};
use serde_json::{Map, Value};
use tracing::warn;

/// Parse the service's JSON response
///
/// Fails only when the response as a whole is unusable; individual invalid
/// items are skipped and counted.
pub(crate) fn parse_response(response: &str) -> Result<ParsedResponse, String> {
    let json_str = extract_json(response)?;

    let json: Value =
        serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    let obj = json
        .as_object()
        .ok_or_else(|| "Expected a JSON object".to_string())?;

    let items: &[Value] = match obj.get("items") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => return Err("'items' is not an array".to_string()),
    };

    let mut parsed = ParsedResponse {
        conversation_summary: obj
            .get("conversation_summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        primary_themes: string_list(obj.get("primary_themes")),
        ..ParsedResponse::default()
    };

    for (idx, item_json) in items.iter().enumerate() {
        match parse_item_json(item_json) {
            Ok(candidate) => {
                if let Err(e) = candidate.validate() {
                    warn!("Item {} failed validation: {}", idx, e);
                    parsed.skipped += 1;
                    continue;
                }
                parsed.candidates.push(candidate);
            }
            Err(e) => {
                warn!("Failed to parse item {}: {}", idx, e);
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, String> {
    let trimmed = response.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the opening fence line, including any language tag
        let body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => return Err("Empty code block".to_string()),
        };
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        return Ok(body.trim());
    }

    Ok(trimmed)
}

/// Parse a single item from JSON
fn parse_item_json(json: &Value) -> Result<ItemCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Item is not a JSON object".to_string())?;

    let item_type = required_str(obj, "type")?
        .parse::<ItemType>()?;
    let title = required_str(obj, "title")?.trim().to_string();
    let content = required_str(obj, "content")?.trim().to_string();

    let key_quote = obj
        .get("key_quote")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_str)
        .map(Confidence::parse_lenient)
        .unwrap_or_default();

    Ok(ItemCandidate {
        item_type,
        title,
        content,
        key_quote,
        related_themes: string_list(obj.get("related_themes")),
        confidence,
    })
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Missing or invalid '{}'", key))
}

/// Non-empty strings of a JSON array; anything else is ignored
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
