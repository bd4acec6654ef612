#![deny(missing_docs)]

//! # Resolver Module
//!
//! Reads individual OpenAPI fragments out of the generic document tree,
//! following local `$ref`s and applying documented defaults.
//!
//! - **params**: `parameters` lists (path-level and operation-level).
//! - **body**: `requestBody` content negotiation and schema properties.
//! - **security**: `securitySchemes` and `security` requirement lists.

pub mod body;
pub mod params;
pub mod security;

pub use body::parse_request_body;
pub use params::parse_parameters;
pub use security::{parse_security_requirements, parse_security_schemes};

use serde_json::{Map, Value};

/// Reads a string field, treating non-strings as absent.
pub(crate) fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Renders a scalar as text: strings verbatim, numbers and booleans via JSON.
///
/// Returns `None` for null, arrays and objects.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
