//! Dotted-path selection into JSON responses.

use serde_json::Value;
use crate::error::{Error, Result};

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// The value at `path` (e.g. `playerReportData.summary`), or `None` when any
/// segment is missing. Numeric segments index arrays; an empty path selects
/// the whole value.
pub fn select_view<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, step)
}

/// Like [`select_view`] but a missing segment is a validation error listing
/// the keys available at that level.
pub fn select_view_strict<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    if path.is_empty() {
        return Ok(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        let parent = current;
        current = step(parent, segment).ok_or_else(|| {
            let valid = match parent {
                Value::Object(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
                Value::Array(items) => format!("indices 0..{}", items.len()),
                _ => "none".to_string(),
            };
            Error::validation(format!(
                "invalid view '{}': field '{}' not found; valid fields at this level: {}",
                path, segment, valid
            ))
        })?;
    }
    Ok(current)
}

/// Owned view; `Value::Null` when the path is missing and `strict` is off.
pub fn take_view(value: Value, path: &str, strict: bool) -> Result<Value> {
    if strict {
        select_view_strict(&value, path).cloned()
    } else {
        Ok(select_view(&value, path).cloned().unwrap_or(Value::Null))
    }
}

/// Value at a dotted key inside one record; `null` and missing are both `None`.
pub fn nested_value<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    select_view(record, key).filter(|v| !v.is_null())
}
