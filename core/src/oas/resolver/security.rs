#![deny(missing_docs)]

//! # Security Resolution
//!
//! Parses `components.securitySchemes` and flattens `security` requirement
//! lists into scheme names. Scopes are not tracked.

use crate::oas::models::{AuthKind, AuthScheme};
use crate::oas::ref_utils::resolve_object;
use crate::oas::resolver::str_field;
use serde_json::Value;
use tracing::debug;

/// Parses the `securitySchemes` mapping in declaration order.
pub fn parse_security_schemes(schemes: Option<&Value>, root: &Value) -> Vec<AuthScheme> {
    let Some(schemes) = schemes.and_then(Value::as_object) else {
        return Vec::new();
    };

    schemes
        .iter()
        .map(|(name, details)| {
            let details = resolve_object(details, root);
            let kind = AuthKind::parse(str_field(&details, "type").unwrap_or_default());

            let mut scheme = AuthScheme {
                name: name.clone(),
                kind,
                location: String::new(),
                scheme: String::new(),
                param_name: String::new(),
            };
            match scheme.kind {
                AuthKind::ApiKey => {
                    scheme.location = str_field(&details, "in").unwrap_or("header").to_string();
                    scheme.param_name = str_field(&details, "name").unwrap_or_default().to_string();
                }
                AuthKind::Http => {
                    scheme.scheme = str_field(&details, "scheme")
                        .unwrap_or("bearer")
                        .to_ascii_lowercase();
                }
                _ => {}
            }
            debug!("Security scheme {} ({})", scheme.name, scheme.kind);
            scheme
        })
        .collect()
}

/// Flattens a list of requirement objects into scheme names.
///
/// Names are deduplicated, keeping first-seen order.
pub fn parse_security_requirements(requirements: Option<&Value>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let Some(requirements) = requirements.and_then(Value::as_array) else {
        return names;
    };
    for requirement in requirements.iter().filter_map(Value::as_object) {
        for name in requirement.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}
