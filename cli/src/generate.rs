#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline: Spec -> `ParsedSpec` -> `GeneratedCli` -> source file.
//!
//! Progress goes to stderr so that `--stdout` output can be piped.

use apicli_core::{parse_openapi_spec, AppResult, CliBuilder, CodeEmitter, LoaderConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path or http(s) URL of an OpenAPI 3.x document (JSON or YAML).
    pub spec: String,

    /// Name for the generated CLI.
    #[clap(short, long)]
    pub name: String,

    /// Output file path (defaults to `<name>_cli.rs`).
    #[clap(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print to stdout instead of writing a file.
    #[clap(long)]
    pub stdout: bool,

    /// Timeout in seconds for fetching remote specs.
    #[clap(long, env = "APICLI_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `emitter` - The emitter used to render the CLI model.
pub fn execute(args: &GenerateArgs, emitter: &impl CodeEmitter) -> AppResult<()> {
    let code = render(args, emitter)?;

    if args.stdout {
        println!("{}", code);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(emitter.default_file_name(&args.name)));
    write_script(&output, &code)?;

    eprintln!("Saved to: {}", output.display());
    eprintln!("\nUsage: {} --help", output.display());
    Ok(())
}

/// Parses the spec and renders the generated program.
pub fn render(args: &GenerateArgs, emitter: &impl CodeEmitter) -> AppResult<String> {
    let config = LoaderConfig::default().with_timeout(Duration::from_secs(args.timeout));
    let spec = parse_openapi_spec(&args.spec, &config)?;
    eprintln!("Parsed: {} v{}", spec.title, spec.version);
    eprintln!("Found {} endpoints", spec.endpoints.len());

    let cli = CliBuilder::new().build(&spec, &args.name);
    eprintln!(
        "Generated {} command groups ({} commands)",
        cli.groups.len(),
        cli.command_count()
    );

    emitter.render(&cli)
}

/// Writes the script and marks it executable.
fn write_script(path: &Path, code: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, code)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
