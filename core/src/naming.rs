#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives CLI-facing names from API-facing identifiers: option flags from
//! parameter names, group/field identifiers from tags and body properties, and
//! command names from operation ids or, failing that, method and path.
//!
//! Every function here is total. Unusual input degrades to a permissive name
//! instead of failing.

use crate::oas::models::Endpoint;
use regex::Regex;
use std::sync::LazyLock;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));
static INVALID_IDENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("valid regex"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Verbs that trigger operation-id shortening.
const SHORTENED_VERBS: &[&str] = &[
    "get", "list", "find", "add", "create", "update", "delete", "remove",
];

/// Inserts a hyphen at every lower→upper case boundary (`petId` → `pet-Id`).
pub fn hyphenate_camel(name: &str) -> String {
    CAMEL_BOUNDARY.replace_all(name, "$1-$2").into_owned()
}

/// Derives the `--flag` for a parameter name.
///
/// `petId` → `--pet-id`, `api_key` → `--api-key`.
pub fn option_name(name: &str) -> String {
    let kebab = hyphenate_camel(name).replace('_', "-").to_lowercase();
    format!("--{kebab}")
}

/// Sanitizes a tag or body property into a kebab-case identifier.
///
/// `Store Inventory` → `store-inventory`, `user.name` → `user-name`.
pub fn sanitize_name(name: &str) -> String {
    let name = hyphenate_camel(name).replace(['_', ' ', '.'], "-");
    let name = INVALID_IDENT_CHARS.replace_all(&name, "");
    let name = HYPHEN_RUNS.replace_all(&name, "-");
    name.trim_matches('-').to_lowercase()
}

/// Shortens an operation id into a command name.
///
/// `getPetById` → `get-by-id`, `listPets` → `list`, `findAll` → `find`.
/// Ids that do not start with a known verb are only kebab-cased.
pub fn simplify_operation_id(operation_id: &str) -> String {
    let name = hyphenate_camel(operation_id).to_lowercase();
    let parts: Vec<&str> = name.split('-').collect();

    if parts.len() >= 2 && SHORTENED_VERBS.contains(&parts[0]) {
        let verb = parts[0];
        let last = parts[parts.len() - 1];
        if parts.len() > 2 && last != "by" && last != "all" {
            return std::iter::once(verb)
                .chain(parts[2..].iter().copied())
                .collect::<Vec<_>>()
                .join("-");
        }
        return verb.to_string();
    }
    name
}

/// Command name for an endpoint without an operation id.
///
/// Joins the lowercased method with the last two literal (non-placeholder)
/// path segments: `POST /users/{id}/orders` → `post-users-orders`.
pub fn fallback_command_name(method: &str, path: &str) -> String {
    let method = method.to_lowercase();
    let literals: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .collect();
    if literals.is_empty() {
        return method;
    }
    let tail = &literals[literals.len().saturating_sub(2)..];
    format!("{}-{}", method, tail.join("-"))
}

/// Collapses whitespace runs into single spaces and trims.
///
/// Keeps free text safe to embed in generated single-line literals.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strategy for deriving a command name from an endpoint.
///
/// Lets alternative shortening heuristics be swapped in without touching the
/// CLI model builder.
pub trait CommandNamer {
    /// Returns the command name for `endpoint`.
    fn command_name(&self, endpoint: &Endpoint) -> String;
}

/// Default naming: shortened operation id, else method plus path tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbShortening;

impl CommandNamer for VerbShortening {
    fn command_name(&self, endpoint: &Endpoint) -> String {
        match endpoint.operation_id.as_deref() {
            Some(id) if !id.is_empty() => simplify_operation_id(id),
            _ => fallback_command_name(endpoint.method.as_str(), &endpoint.path),
        }
    }
}
