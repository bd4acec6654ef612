#![deny(missing_docs)]

//! # apicli
//!
//! Command Line Interface for generating standalone API clients from OpenAPI
//! 3.x specs.
//!
//! Supported Commands:
//! - `generate`: Spec -> CLI model -> single-file Rust cargo script.
//! - `inspect`: Prints the structure of a spec without generating code.

use apicli_core::RustScriptEmitter;
use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod generate;
mod inspect;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Generate command-line tools from OpenAPI specs",
    after_help = "Example:\n  apicli generate petstore.yaml --name petstore\n  ./petstore_cli.rs pet get-by-id --pet-id 1"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a CLI from an OpenAPI spec (file path or URL).
    Generate(generate::GenerateArgs),
    /// Show the endpoints, parameters and auth of a spec.
    Inspect(inspect::InspectArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // RUST_LOG, when set, takes precedence over -v.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Generate(args) => generate::execute(args, &RustScriptEmitter),
        Commands::Inspect(args) => inspect::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
