#![deny(missing_docs)]

//! # CLI Model
//!
//! The command-line projection of a parsed spec: global options, one group
//! per tag, one command per endpoint, one option per parameter or body field.
//!
//! - **builder**: `CliBuilder`, which derives this model from a `ParsedSpec`.

pub mod builder;

pub use builder::CliBuilder;

use crate::oas::models::{AuthScheme, HttpMethod, ParamLocation};
use crate::type_mapping::CliValueType;
use std::fmt;

/// Which request slot an option's value fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionLocation {
    /// Top-level option (output format, base URL, credentials).
    Global,
    /// `{name}` placeholder in the path.
    Path,
    /// Query string parameter.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// One field of the JSON body.
    Body,
    /// The whole body as raw JSON.
    BodyRaw,
}

impl OptionLocation {
    /// Tag used in generated code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::BodyRaw => "body_raw",
        }
    }
}

impl From<ParamLocation> for OptionLocation {
    fn from(location: ParamLocation) -> Self {
        match location {
            ParamLocation::Path => Self::Path,
            ParamLocation::Query => Self::Query,
            ParamLocation::Header => Self::Header,
            ParamLocation::Cookie => Self::Cookie,
        }
    }
}

impl fmt::Display for OptionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOption {
    /// Flag including the dashes, e.g. `--pet-id`.
    pub name: String,
    /// Value type.
    pub value_type: CliValueType,
    /// Whether the flag must be supplied.
    pub required: bool,
    /// Default value rendered as text.
    pub default: Option<String>,
    /// Single-line help text.
    pub help: String,
    /// Request slot filled by the value.
    pub location: OptionLocation,
    /// API-facing name used when building the request.
    pub api_name: String,
    /// Allowed values; empty means unrestricted.
    pub choices: Vec<String>,
}

impl CliOption {
    /// A plain optional string flag.
    pub fn new(name: impl Into<String>, help: impl Into<String>, location: OptionLocation) -> Self {
        Self {
            name: name.into(),
            value_type: CliValueType::String,
            required: false,
            default: None,
            help: help.into(),
            location,
            api_name: String::new(),
            choices: Vec::new(),
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The flag without leading dashes; used as the argument id.
    pub fn id(&self) -> &str {
        self.name.trim_start_matches('-')
    }
}

/// A generated subcommand bound to one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CliCommand {
    /// Subcommand name.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Single-line help text.
    pub help: String,
    /// Options in precedence order, unique by name.
    pub options: Vec<CliOption>,
    /// Whether the endpoint declares a request body.
    pub has_body: bool,
}

/// Commands sharing a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct CliGroup {
    /// Sanitized tag.
    pub name: String,
    /// Single-line help text.
    pub help: String,
    /// Commands in endpoint order.
    pub commands: Vec<CliCommand>,
}

/// The complete model handed to a code emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCli {
    /// Name of the generated tool.
    pub name: String,
    /// API version.
    pub version: String,
    /// Single-line description.
    pub description: String,
    /// Default base URL.
    pub base_url: String,
    /// Groups in first-seen tag order.
    pub groups: Vec<CliGroup>,
    /// Top-level options.
    pub global_options: Vec<CliOption>,
    /// Security schemes from the spec.
    pub auth_schemes: Vec<AuthScheme>,
    /// Header carrying the API key, or empty when the spec names none.
    pub api_key_header_name: String,
}

impl GeneratedCli {
    /// Prefix for credential environment variables, e.g. `PET_STORE`.
    pub fn env_prefix(&self) -> String {
        self.name.to_uppercase().replace('-', "_")
    }

    /// Looks up a global option by flag.
    pub fn global_option(&self, name: &str) -> Option<&CliOption> {
        self.global_options.iter().find(|option| option.name == name)
    }

    /// Total number of commands across groups.
    pub fn command_count(&self) -> usize {
        self.groups.iter().map(|group| group.commands.len()).sum()
    }
}
