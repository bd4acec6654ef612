#![deny(missing_docs)]

//! # apicli Core
//!
//! Core library for turning an OpenAPI 3.x document into a standalone
//! command-line tool.
//!
//! The pipeline runs in four steps:
//! 1. `oas::load_document` reads a local file or URL into a JSON tree.
//! 2. `parse_openapi_document` extracts a `ParsedSpec`.
//! 3. `CliBuilder` projects it onto a `GeneratedCli` (groups, commands, flags).
//! 4. A `CodeEmitter` renders the model as program text.

/// Shared error types.
pub mod error;

/// Name derivation for flags, groups and commands.
pub mod naming;

/// Type mapping logic (OpenAPI -> flag value types).
pub mod type_mapping;

/// OpenAPI (OAS) loading and parsing utilities.
pub mod oas;

/// The command-line model and its builder.
pub mod cli_model;

/// Code emitters.
pub mod emitter;

pub use cli_model::{CliBuilder, CliCommand, CliGroup, CliOption, GeneratedCli, OptionLocation};
pub use emitter::{CodeEmitter, RustScriptEmitter};
pub use error::{AppError, AppResult, LoadError};
pub use naming::{CommandNamer, VerbShortening};
pub use oas::{
    load_document, parse_openapi_document, parse_openapi_spec, Endpoint, LoaderConfig, ParsedSpec,
};
pub use type_mapping::CliValueType;

/// Loads `source`, builds the CLI model and renders it with `emitter`.
pub fn generate_cli(
    source: &str,
    name: &str,
    config: &LoaderConfig,
    emitter: &dyn CodeEmitter,
) -> AppResult<String> {
    let spec = parse_openapi_spec(source, config)?;
    let cli = CliBuilder::new().build(&spec, name);
    emitter.render(&cli)
}
