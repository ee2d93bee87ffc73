//! Alias lookup over loosely-shaped backend JSON.
//!
//! The backend mixes PascalCase and camelCase field names between endpoints.
//! Each model lists the aliases it accepts and resolves them through these
//! helpers, in order, taking the first present non-null value.

use serde_json::Value;

/// First non-null value under any of `keys`.
pub(crate) fn first<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| raw.get(*k).filter(|v| !v.is_null()))
}

/// First value rendered as a string; numbers and bools are stringified.
pub(crate) fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    first(raw, keys).and_then(scalar_to_string)
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First value as a list of non-empty strings; a lone string becomes a one-element list.
pub(crate) fn first_string_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    match first(raw, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
