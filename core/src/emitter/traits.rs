#![deny(missing_docs)]

//! # Emitter Traits
//!
//! Defines the `CodeEmitter` trait to allow rendering the CLI model into
//! different target languages or packaging formats.

use crate::cli_model::GeneratedCli;
use crate::error::AppResult;

/// A strategy trait for decoupling the CLI model from its rendered form.
///
/// Implementors turn a `GeneratedCli` into the complete text of one
/// standalone program. Rendering must be deterministic: the same model always
/// yields byte-identical output.
pub trait CodeEmitter {
    /// Renders the whole program.
    fn render(&self, cli: &GeneratedCli) -> AppResult<String>;

    /// File name used when the caller does not pick one.
    ///
    /// # Arguments
    ///
    /// * `cli_name` - The name of the generated tool (e.g. `petstore`).
    fn default_file_name(&self, cli_name: &str) -> String;
}
