#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Resolves local `$ref` pointers (`#/...`) against the loaded document root.
//!
//! External documents are never fetched: any pointer that is not rooted at the
//! current document resolves to an empty mapping, as does a pointer whose path
//! is missing or runs through a non-mapping node.

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// Resolves a `$ref` string to the mapping it points at.
///
/// Returns an empty mapping when the reference is external, dangling, or does
/// not land on a mapping.
pub fn resolve_ref(ref_str: &str, root: &Value) -> Map<String, Value> {
    let Some(pointer) = ref_str.strip_prefix("#/") else {
        return Map::new();
    };

    let mut current = root;
    for segment in pointer.split('/') {
        let key = decode_pointer_segment(segment);
        match current.as_object().and_then(|obj| obj.get(&key)) {
            Some(next) => current = next,
            None => return Map::new(),
        }
    }

    current.as_object().cloned().unwrap_or_default()
}

/// Returns `value` as a mapping, following a `$ref` if it is a reference.
///
/// Non-mapping values yield an empty mapping.
pub fn resolve_object(value: &Value, root: &Value) -> Map<String, Value> {
    let Some(obj) = value.as_object() else {
        return Map::new();
    };
    match obj.get("$ref").and_then(Value::as_str) {
        Some(ref_str) => resolve_ref(ref_str, root),
        None => obj.clone(),
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
