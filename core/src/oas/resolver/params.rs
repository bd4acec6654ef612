#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Turns a `parameters` list into `Parameter` models. Entries may be inline
//! objects or local `$ref`s; their schemas may be references too.

use crate::oas::models::{ParamLocation, Parameter};
use crate::oas::ref_utils::resolve_object;
use crate::oas::resolver::{scalar_text, str_field};
use serde_json::{Map, Value};

/// Parses a `parameters` list. Non-list input yields no parameters.
pub fn parse_parameters(params: Option<&Value>, root: &Value) -> Vec<Parameter> {
    let Some(items) = params.and_then(Value::as_array) else {
        return Vec::new();
    };
    items.iter().map(|item| parse_parameter(item, root)).collect()
}

fn parse_parameter(item: &Value, root: &Value) -> Parameter {
    let param = resolve_object(item, root);
    let schema = param
        .get("schema")
        .map(|schema| resolve_object(schema, root))
        .unwrap_or_default();

    let location = ParamLocation::parse(str_field(&param, "in").unwrap_or("query"));
    // Path templates cannot omit a segment.
    let required = location == ParamLocation::Path
        || param.get("required").and_then(Value::as_bool).unwrap_or(false);

    Parameter {
        name: str_field(&param, "name").unwrap_or_default().to_string(),
        location,
        required,
        description: str_field(&param, "description")
            .unwrap_or_default()
            .to_string(),
        schema_type: schema_type(&schema),
        default: schema.get("default").filter(|v| !v.is_null()).cloned(),
        enum_values: schema
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(scalar_text).collect())
            .unwrap_or_default(),
    }
}

/// Reads a schema's `type`.
///
/// OpenAPI 3.1 allows a list of types; the first non-`null` entry wins.
/// Missing types default to `string`.
pub(crate) fn schema_type(schema: &Map<String, Value>) -> String {
    match schema.get("type") {
        Some(Value::String(ty)) => ty.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .unwrap_or("string")
            .to_string(),
        _ => "string".to_string(),
    }
}
