//! Filtered-array cache.
//!
//! Materializes a named array once so that `<path>[?(<filter>)]` queries can
//! be answered by re-filtering the in-memory list instead of re-streaming the
//! file.

use std::collections::HashMap;

use json_query_scan::JsonValue;

/// Cached array contents keyed by textual array path.
#[derive(Debug, Default)]
pub struct ArrayCache {
    entries: HashMap<String, Vec<JsonValue>>,
}

impl ArrayCache {
    pub fn store(&mut self, key: impl Into<String>, values: Vec<JsonValue>) {
        self.entries.insert(key.into(), values);
    }

    pub fn get(&self, key: &str) -> Option<&[JsonValue]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Split `<path>[?(<filter>)]` into the array path and the filter expression.
///
/// The closing `]` is located by a paren-balanced scan, and must terminate
/// the path: a filter followed by further segments cannot be served from the
/// cache and falls back to streaming.
pub fn split_filtered_path(path: &str) -> Option<(&str, &str)> {
    let open = path.find("[?")?;
    let rest = &path[open + 2..];
    let mut depth = 0i32;
    for (i, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ']' if depth == 0 => {
                if open + 2 + i + 1 != path.len() {
                    return None;
                }
                return Some((&path[..open], rest[..i].trim()));
            }
            _ => {}
        }
    }
    None
}
