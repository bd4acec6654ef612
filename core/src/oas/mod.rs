#![deny(missing_docs)]

//! # OpenAPI Parsing Module
//!
//! - **loader**: Reading local/remote documents into a generic tree.
//! - **ref_utils**: Local `$ref` resolution.
//! - **models**: Intermediate Representation definitions.
//! - **resolver**: Parameters, request bodies and security.
//! - **routes**: Parsing logic for API paths/endpoints.

pub mod loader;
pub mod models;
pub mod ref_utils;
pub mod resolver;
pub mod routes;

pub use loader::{load_document, LoaderConfig};
pub use models::{
    AuthKind, AuthScheme, Endpoint, HttpMethod, ParamLocation, Parameter, ParsedSpec,
    RequestBody,
};

use crate::error::AppResult;
use crate::oas::resolver::{parse_security_schemes, scalar_text, str_field};
use crate::oas::routes::parse_paths;
use serde_json::{Map, Value};

/// Loads a spec from a local path or URL and parses it.
pub fn parse_openapi_spec(source: &str, config: &LoaderConfig) -> AppResult<ParsedSpec> {
    let document = load_document(source, config)?;
    Ok(parse_openapi_document(&document))
}

/// Parses a decoded document tree.
///
/// Absent fields take documented defaults; this never fails.
pub fn parse_openapi_document(root: &Value) -> ParsedSpec {
    let info = root
        .get("info")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    let base_url = root
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let auth_schemes = parse_security_schemes(
        root.get("components")
            .and_then(|components| components.get("securitySchemes")),
        root,
    );

    ParsedSpec {
        title: str_field(&info, "title").unwrap_or("API").to_string(),
        version: info
            .get("version")
            .and_then(scalar_text)
            .unwrap_or_else(|| "1.0.0".to_string()),
        description: str_field(&info, "description")
            .unwrap_or_default()
            .to_string(),
        base_url,
        endpoints: parse_paths(root.get("paths"), root.get("security"), root),
        auth_schemes,
    }
}
