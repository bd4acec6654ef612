#![deny(missing_docs)]

//! # Spec Loader
//!
//! Obtains a spec document from a local path or an `http(s)` URL and decodes
//! it into a generic `serde_json::Value` tree.
//!
//! Local files are decoded by suffix. Remote documents are decoded by URL
//! suffix when it names YAML, and otherwise JSON-first with a YAML fallback.

use crate::error::{AppResult, LoadError};
use serde_json::{Map, Number, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Upper bound for the whole remote fetch.
    pub timeout: Duration,
}

impl LoaderConfig {
    /// Default fetch timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Overrides the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Loads and decodes a spec from a local path or URL.
///
/// The returned value is always a JSON object.
pub fn load_document(source: &str, config: &LoaderConfig) -> AppResult<Value> {
    let document = match remote_url(source) {
        Some(url) => {
            let body = fetch(&url, config)?;
            decode_remote(url.path(), &body)?
        }
        None => {
            let path = Path::new(source);
            if !path.exists() {
                return Err(LoadError::NotFound(path.to_path_buf()).into());
            }
            let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| has_yaml_suffix(&format!(".{ext}")));
            if is_yaml {
                decode_yaml(&content)?
            } else {
                decode_json(&content)?
            }
        }
    };

    if !document.is_object() {
        return Err(LoadError::NotAMapping.into());
    }
    Ok(document)
}

/// Decodes a fetched document.
///
/// A `url_path` ending in `.yaml`/`.yml` selects YAML; anything else is tried
/// as JSON first and as YAML second.
pub fn decode_remote(url_path: &str, body: &str) -> Result<Value, LoadError> {
    if has_yaml_suffix(url_path) {
        return decode_yaml(body);
    }
    serde_json::from_str::<Value>(body).or_else(|err| {
        debug!("JSON decode of {} failed ({}), retrying as YAML", url_path, err);
        decode_yaml(body)
    })
}

/// Decodes strict JSON.
pub fn decode_json(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Decode {
        format: "JSON",
        reason: e.to_string(),
    })
}

/// Decodes YAML into the generic tree.
pub fn decode_yaml(content: &str) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| LoadError::Decode {
        format: "YAML",
        reason: e.to_string(),
    })?;
    Ok(yaml_to_json(yaml))
}

/// Returns the parsed URL when `source` is an `http`/`https` URL.
fn remote_url(source: &str) -> Option<Url> {
    Url::parse(source)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn has_yaml_suffix(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

fn fetch(url: &Url, config: &LoaderConfig) -> Result<String, LoadError> {
    info!("Fetching spec from {}", url);
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(config.timeout))
        .build()
        .into();

    let fetch_error = |reason: String| LoadError::Fetch {
        url: url.to_string(),
        reason,
    };

    let mut response = agent
        .get(url.as_str())
        .call()
        .map_err(|e| fetch_error(e.to_string()))?;
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| fetch_error(e.to_string()))
}

/// Converts a YAML tree into a JSON tree.
///
/// Mapping keys that are not strings (e.g. response codes written as `200:`)
/// are rendered as text; tagged values are unwrapped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut obj = Map::new();
            for (key, value) in mapping {
                obj.insert(yaml_key_to_string(key), yaml_to_json(value));
            }
            Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_by_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spec.YML");
        fs::write(
            &path,
            "openapi: 3.0.0\ninfo: {title: T, version: 1.0}\npaths:\n  /x:\n    get:\n      responses:\n        200: {description: ok}\n",
        )
        .unwrap();

        let doc = load_document(path.to_str().unwrap(), &LoaderConfig::default()).unwrap();
        assert_eq!(doc["info"]["title"], json!("T"));
        assert_eq!(doc["info"]["version"], json!(1.0));
        assert_eq!(
            doc["paths"]["/x"]["get"]["responses"]["200"]["description"],
            json!("ok")
        );
    }

    #[test]
    fn test_load_json_is_strict() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, "openapi: 3.0.0\n").unwrap();

        let err = load_document(path.to_str().unwrap(), &LoaderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to decode JSON"));
    }

    #[test]
    fn test_unknown_suffix_is_decoded_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spec.txt");
        fs::write(&path, r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap();

        let doc = load_document(path.to_str().unwrap(), &LoaderConfig::default()).unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        let err = load_document(path.to_str().unwrap(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Load(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.yaml");
        fs::write(&path, "- a\n- b\n").unwrap();

        let err = load_document(path.to_str().unwrap(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Load(LoadError::NotAMapping)
        ));
    }

    #[test]
    fn test_remote_detection_only_for_http() {
        assert!(remote_url("https://example.com/openapi.json").is_some());
        assert!(remote_url("http://localhost:8080/spec").is_some());
        assert!(remote_url("C:\\specs\\api.yaml").is_none());
        assert!(remote_url("file:///tmp/api.yaml").is_none());
        assert!(remote_url("specs/api.yaml").is_none());
    }

    #[test]
    fn test_remote_yaml_suffix_decodes_as_yaml() {
        let doc = decode_remote("/specs/api.YAML", "openapi: 3.0.0\npaths: {}\n").unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));

        // JSON is a subset of YAML, so a JSON body still decodes here.
        let doc = decode_remote("/api.yml", r#"{"a": 1}"#).unwrap();
        assert_eq!(doc["a"], json!(1));

        let err = decode_remote("/api.yml", "a: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::Decode { format: "YAML", .. }));
    }

    #[test]
    fn test_remote_without_yaml_suffix_falls_back_to_yaml() {
        let doc = decode_remote("/openapi.json", r#"{"openapi": "3.1.0"}"#).unwrap();
        assert_eq!(doc["openapi"], json!("3.1.0"));

        let doc = decode_remote("/spec", "openapi: 3.0.3\ninfo:\n  title: T\n").unwrap();
        assert_eq!(doc["info"]["title"], json!("T"));

        let err = decode_remote("/spec", "{ not: [valid").unwrap_err();
        assert!(matches!(err, LoadError::Decode { format: "YAML", .. }));
    }

    #[test]
    fn test_unreachable_url_is_a_fetch_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = format!("http://127.0.0.1:{port}/openapi.json");
        let config = LoaderConfig::default().with_timeout(Duration::from_secs(2));

        let err = load_document(&source, &config).unwrap_err();
        match err {
            crate::error::AppError::Load(LoadError::Fetch { url, .. }) => {
                assert_eq!(url, source);
            }
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }

    #[test]
    fn test_yaml_non_string_keys() {
        let value = decode_yaml("200: ok\ntrue: yes\n").unwrap();
        assert_eq!(value["200"], json!("ok"));
        assert_eq!(value["true"], json!("yes"));
    }

    #[test]
    fn test_config_timeout_builder() {
        let config = LoaderConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(LoaderConfig::default().timeout, LoaderConfig::DEFAULT_TIMEOUT);
    }
}
