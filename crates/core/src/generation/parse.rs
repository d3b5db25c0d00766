//! # Response Parsing
//!
//! Turns provider text into tags. Models are asked for a bare JSON array but
//! often wrap it in prose or a code fence, so a failed direct parse falls
//! back to the outermost bracketed span.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{TierError, TierResult};
use crate::state::{IdPrefix, Tag};

/// Keys that may carry an item's name, in priority order
const NAME_KEYS: [&str; 3] = ["name", "brand", "content"];

fn bracketed_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("static pattern compiles"))
}

/// Extract the JSON array from provider text
pub fn parse_items(text: &str) -> TierResult<Vec<Value>> {
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(text.trim()) {
        return Ok(items);
    }

    let span = bracketed_span()
        .find(text)
        .ok_or_else(|| TierError::Parse("no JSON array in provider response".to_string()))?;

    serde_json::from_str::<Vec<Value>>(span.as_str())
        .map_err(|e| TierError::Parse(format!("bracketed span is not a JSON array: {}", e)))
}

/// Display name for one item: the value of the first of `name`, `brand`,
/// `content` that is present and not blank; otherwise the item itself as
/// text. Strings are trimmed, other values render as JSON.
pub fn item_name(item: &Value) -> String {
    let keyed = NAME_KEYS
        .iter()
        .filter_map(|key| item.get(key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        });

    match keyed.unwrap_or(item) {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Parse provider text into at most `count` text tags, in response order.
/// Items with a blank name are skipped.
pub fn tags_from_response(text: &str, count: usize) -> TierResult<Vec<Tag>> {
    let tags = parse_items(text)?
        .iter()
        .map(item_name)
        .filter(|name| !name.is_empty())
        .take(count)
        .map(|name| Tag::text(IdPrefix::Ai, name))
        .collect();
    Ok(tags)
}
