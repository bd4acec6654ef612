#![deny(missing_docs)]

//! # Body Resolution
//!
//! Extracts the request body's content type and top-level schema properties.
//! JSON content is preferred; otherwise the first declared media type is used.

use crate::oas::models::RequestBody;
use crate::oas::ref_utils::resolve_object;
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Parses a `requestBody` (inline or `$ref`).
///
/// Missing content or schema yields an empty property set.
pub fn parse_request_body(body: &Value, root: &Value) -> RequestBody {
    let body = resolve_object(body, root);
    let content = body
        .get("content")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let content_type = if content.contains_key(JSON_CONTENT_TYPE) {
        JSON_CONTENT_TYPE.to_string()
    } else {
        content
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string())
    };

    let schema = content
        .get(&content_type)
        .and_then(|media| media.get("schema"))
        .map(|schema| resolve_object(schema, root))
        .unwrap_or_default();

    RequestBody {
        content_type,
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        properties: schema
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        required_props: schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}
