#![deny(missing_docs)]

//! # Routes
//!
//! Walks the `paths` object into `Endpoint`s: one per path × HTTP verb, in
//! document order. Path-level parameters are prepended to each operation's own
//! parameters; deduplication is left to the CLI model builder.

use crate::oas::models::{Endpoint, HttpMethod, Parameter, DEFAULT_TAG};
use crate::oas::ref_utils::resolve_object;
use crate::oas::resolver::{
    parse_parameters, parse_request_body, parse_security_requirements, str_field,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Parses every path item under `paths`.
///
/// `global_security` is the document-level `security` list, applied to
/// operations that do not declare their own.
pub fn parse_paths(
    paths: Option<&Value>,
    global_security: Option<&Value>,
    root: &Value,
) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    let Some(paths) = paths.and_then(Value::as_object) else {
        return endpoints;
    };

    for (path, item) in paths {
        let item = resolve_object(item, root);
        let path_params = parse_parameters(item.get("parameters"), root);

        for (key, operation) in &item {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let Some(operation) = operation.as_object() else {
                continue;
            };
            let endpoint = parse_endpoint(
                path,
                method,
                operation,
                &path_params,
                global_security,
                root,
            );
            debug!("Parsed {} {}", endpoint.method, endpoint.path);
            endpoints.push(endpoint);
        }
    }

    endpoints
}

fn parse_endpoint(
    path: &str,
    method: HttpMethod,
    operation: &Map<String, Value>,
    path_params: &[Parameter],
    global_security: Option<&Value>,
    root: &Value,
) -> Endpoint {
    let mut parameters = path_params.to_vec();
    parameters.extend(parse_parameters(operation.get("parameters"), root));

    let mut tags: Vec<String> = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if tags.is_empty() {
        tags.push(DEFAULT_TAG.to_string());
    }

    let security = match operation.get("security") {
        Some(own) => parse_security_requirements(Some(own)),
        None => parse_security_requirements(global_security),
    };

    Endpoint {
        path: path.to_string(),
        method,
        operation_id: str_field(operation, "operationId").map(str::to_string),
        summary: str_field(operation, "summary").unwrap_or_default().to_string(),
        description: str_field(operation, "description")
            .unwrap_or_default()
            .to_string(),
        tags,
        parameters,
        request_body: operation
            .get("requestBody")
            .map(|body| parse_request_body(body, root)),
        security,
    }
}
