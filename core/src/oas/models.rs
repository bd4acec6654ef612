#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Intermediate Representation (IR) structures for parsed OpenAPI elements.
//!
//! These structs transport parsed data from the decoded document into the
//! CLI model builder. They are created once during parsing and never mutated.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Tag used for endpoints that declare none.
pub const DEFAULT_TAG: &str = "default";

/// The HTTP verbs an endpoint may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl HttpMethod {
    /// Recognizes a path-item key as a verb, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    /// Uppercase wire form, e.g. `"GET"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Substituted into the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Sent inside the `Cookie` header.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` field. Unknown locations fall back to `Query`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "path" => Self::Path,
            "header" => Self::Header,
            "cookie" => Self::Cookie,
            _ => Self::Query,
        }
    }

    /// The OpenAPI spelling of the location.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An endpoint parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// API-facing name (e.g. `petId`).
    pub name: String,
    /// Location of the parameter.
    pub location: ParamLocation,
    /// Whether a value must be supplied. Always true for path parameters.
    pub required: bool,
    /// Free-text description.
    pub description: String,
    /// Scalar schema type (`string`, `integer`, ...).
    pub schema_type: String,
    /// Schema default, if declared.
    pub default: Option<Value>,
    /// Allowed values, rendered as text.
    pub enum_values: Vec<String>,
}

/// Request body schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    /// Negotiated content type.
    pub content_type: String,
    /// Whether a body is required.
    pub required: bool,
    /// Property name → raw schema fragment, in document order.
    pub properties: Map<String, Value>,
    /// Names listed in the schema's `required` array.
    pub required_props: Vec<String>,
}

impl Default for RequestBody {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
            required: false,
            properties: Map::new(),
            required_props: Vec::new(),
        }
    }
}

/// Classification of a security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthKind {
    /// `apiKey`
    ApiKey,
    /// `http` (bearer, basic, ...)
    Http,
    /// `oauth2`
    OAuth2,
    /// `openIdConnect`
    OpenIdConnect,
    /// Any other declared type.
    Other(String),
}

impl AuthKind {
    /// Parses the scheme's `type` field.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "apiKey" => Self::ApiKey,
            "http" => Self::Http,
            "oauth2" => Self::OAuth2,
            "openIdConnect" => Self::OpenIdConnect,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for AuthKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => f.write_str("apiKey"),
            Self::Http => f.write_str("http"),
            Self::OAuth2 => f.write_str("oauth2"),
            Self::OpenIdConnect => f.write_str("openIdConnect"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Authentication scheme declared under `components.securitySchemes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthScheme {
    /// Key of the scheme in `securitySchemes`.
    pub name: String,
    /// Scheme type.
    pub kind: AuthKind,
    /// apiKey only: `header`, `query` or `cookie`.
    pub location: String,
    /// http only: lowercased sub-scheme (`bearer`, `basic`).
    pub scheme: String,
    /// apiKey only: the header/query/cookie key.
    pub param_name: String,
}

impl AuthScheme {
    /// True for `http` schemes using bearer tokens.
    pub fn is_bearer(&self) -> bool {
        self.kind == AuthKind::Http && self.scheme == "bearer"
    }
}

/// One HTTP method bound to one path template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    /// Path template, e.g. `/pet/{petId}`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Document-declared operation id.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: String,
    /// Long description.
    pub description: String,
    /// Declared tags; `["default"]` when the operation has none.
    pub tags: Vec<String>,
    /// Path-level parameters followed by operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Request body, if declared.
    pub request_body: Option<RequestBody>,
    /// Required security scheme names, first-seen order.
    pub security: Vec<String>,
}

/// A parsed OpenAPI specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSpec {
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// `info.description`
    pub description: String,
    /// First server URL, or empty.
    pub base_url: String,
    /// Endpoints in path-then-verb document order.
    pub endpoints: Vec<Endpoint>,
    /// Declared security schemes.
    pub auth_schemes: Vec<AuthScheme>,
}

impl ParsedSpec {
    /// Groups endpoints by each of their tags.
    ///
    /// Grouping is non-exclusive: an endpoint tagged `{a, b}` is listed under
    /// both. Groups appear in first-seen order and keep endpoint order.
    pub fn group_by_tag(&self) -> IndexMap<String, Vec<&Endpoint>> {
        let mut groups: IndexMap<String, Vec<&Endpoint>> = IndexMap::new();
        for endpoint in &self.endpoints {
            if endpoint.tags.is_empty() {
                groups
                    .entry(DEFAULT_TAG.to_string())
                    .or_default()
                    .push(endpoint);
                continue;
            }
            for tag in &endpoint.tags {
                groups.entry(tag.clone()).or_default().push(endpoint);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(path: &str, tags: &[&str]) -> Endpoint {
        Endpoint {
            path: path.to_string(),
            method: HttpMethod::Get,
            operation_id: None,
            summary: String::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: vec![],
            request_body: None,
            security: vec![],
        }
    }

    fn spec(endpoints: Vec<Endpoint>) -> ParsedSpec {
        ParsedSpec {
            title: "API".into(),
            version: "1.0.0".into(),
            description: String::new(),
            base_url: String::new(),
            endpoints,
            auth_schemes: vec![],
        }
    }

    #[test]
    fn test_group_by_tag_is_non_exclusive_and_ordered() {
        let spec = spec(vec![
            endpoint("/a", &["pets", "admin"]),
            endpoint("/b", &["admin"]),
            endpoint("/c", &["pets"]),
        ]);

        let groups = spec.group_by_tag();
        let names: Vec<&String> = groups.keys().collect();
        assert_eq!(names, vec!["pets", "admin"]);

        let pets: Vec<&str> = groups["pets"].iter().map(|e| e.path.as_str()).collect();
        assert_eq!(pets, vec!["/a", "/c"]);
        let admin: Vec<&str> = groups["admin"].iter().map(|e| e.path.as_str()).collect();
        assert_eq!(admin, vec!["/a", "/b"]);
    }

    #[test]
    fn test_group_by_tag_untagged_goes_to_default() {
        let spec = spec(vec![endpoint("/x", &[]), endpoint("/y", &["default"])]);
        let groups = spec.group_by_tag();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[DEFAULT_TAG].len(), 2);
    }

    #[test]
    fn test_method_keys_are_case_insensitive() {
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::from_key("trace"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_param_location_defaults_to_query() {
        assert_eq!(ParamLocation::parse("path"), ParamLocation::Path);
        assert_eq!(ParamLocation::parse("querystring"), ParamLocation::Query);
        assert_eq!(ParamLocation::parse(""), ParamLocation::Query);
    }

    #[test]
    fn test_auth_kind_round_trips_unknown_types() {
        assert_eq!(AuthKind::parse("apiKey"), AuthKind::ApiKey);
        let other = AuthKind::parse("mutualTLS");
        assert_eq!(other, AuthKind::Other("mutualTLS".into()));
        assert_eq!(other.to_string(), "mutualTLS");
    }

    #[test]
    fn test_serialize_for_inspection() {
        let mut ep = endpoint("/pet/{petId}", &["pet"]);
        ep.parameters.push(Parameter {
            name: "petId".into(),
            location: ParamLocation::Path,
            required: true,
            description: String::new(),
            schema_type: "integer".into(),
            default: None,
            enum_values: vec![],
        });
        let value = serde_json::to_value(&ep).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["parameters"][0]["location"], "path");

        let scheme = AuthScheme {
            name: "api_key".into(),
            kind: AuthKind::ApiKey,
            location: "header".into(),
            scheme: String::new(),
            param_name: "X-API-Key".into(),
        };
        assert_eq!(serde_json::to_value(&scheme).unwrap()["kind"], "apiKey");
    }
}
