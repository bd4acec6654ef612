#![deny(missing_docs)]

//! # Emitter Module
//!
//! Turns a `GeneratedCli` into program text.
//!
//! - **traits**: The `CodeEmitter` strategy trait.
//! - **rust_script**: `RustScriptEmitter`, a single-file cargo script built on `clap` and `ureq`.

pub mod rust_script;
pub mod traits;

pub use rust_script::RustScriptEmitter;
pub use traits::CodeEmitter;
