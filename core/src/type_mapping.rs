#![deny(missing_docs)]

//! # Type Mapping
//!
//! Maps OpenAPI schema types onto the small set of value types a generated
//! command-line flag can carry. Arrays and objects travel as serialized text.

use std::fmt::Display;

/// Value type of a generated flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliValueType {
    /// Free text. Also used for serialized arrays/objects and unknown types.
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// `true` / `false`.
    Boolean,
}

impl CliValueType {
    /// Lowercase name used in generated code and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            CliValueType::String => "string",
            CliValueType::Integer => "integer",
            CliValueType::Float => "float",
            CliValueType::Boolean => "boolean",
        }
    }
}

impl Display for CliValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an OpenAPI `type` to a flag value type.
///
/// Unknown or missing types map to `String`.
pub fn map_schema_type(schema_type: &str) -> CliValueType {
    match schema_type {
        "integer" => CliValueType::Integer,
        "number" => CliValueType::Float,
        "boolean" => CliValueType::Boolean,
        _ => CliValueType::String,
    }
}
