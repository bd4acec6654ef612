#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints the structure of a spec (auth, endpoints and parameters) without
//! generating code.

use apicli_core::{parse_openapi_spec, AppError, AppResult, LoaderConfig, ParsedSpec};
use std::fmt::Write;
use std::time::Duration;

const DESCRIPTION_LIMIT: usize = 100;
const ENDPOINTS_PER_TAG: usize = 5;
const PARAMS_PER_ENDPOINT: usize = 3;

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path or http(s) URL of an OpenAPI 3.x document (JSON or YAML).
    pub spec: String,

    /// Print the parsed spec as JSON instead of a summary.
    #[clap(long)]
    pub json: bool,

    /// Timeout in seconds for fetching remote specs.
    #[clap(long, env = "APICLI_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

/// Executes the inspection.
pub fn execute(args: &InspectArgs) -> AppResult<()> {
    let config = LoaderConfig::default().with_timeout(Duration::from_secs(args.timeout));
    let spec = parse_openapi_spec(&args.spec, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&spec)
            .map_err(|e| AppError::General(format!("Failed to serialize spec: {}", e)))?;
        println!("{}", json);
    } else {
        let summary = render_summary(&spec)
            .map_err(|e| AppError::General(format!("Failed to render summary: {}", e)))?;
        print!("{}", summary);
    }
    Ok(())
}

/// Human-readable overview of a parsed spec.
///
/// Tags are listed in sorted order; each shows at most five endpoints, each
/// with at most three parameter names.
pub fn render_summary(spec: &ParsedSpec) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, spec)?;
    Ok(out)
}

fn write_summary(out: &mut String, spec: &ParsedSpec) -> std::fmt::Result {
    writeln!(out, "\n{} v{}", spec.title, spec.version)?;
    if spec.description.chars().count() > DESCRIPTION_LIMIT {
        let head: String = spec.description.chars().take(DESCRIPTION_LIMIT).collect();
        writeln!(out, "   {}...", head)?;
    } else {
        writeln!(out, "   {}", spec.description)?;
    }
    writeln!(out, "\nBase URL: {}", spec.base_url)?;

    if !spec.auth_schemes.is_empty() {
        writeln!(out, "\nAuthentication:")?;
        for scheme in &spec.auth_schemes {
            writeln!(out, "   - {}: {}", scheme.name, scheme.kind)?;
        }
    }

    writeln!(out, "\nEndpoints ({} total):", spec.endpoints.len())?;
    let mut grouped: Vec<_> = spec.group_by_tag().into_iter().collect();
    grouped.sort_by(|a, b| a.0.cmp(&b.0));

    for (tag, endpoints) in grouped {
        writeln!(out, "\n   [{}]", tag)?;
        for endpoint in endpoints.iter().take(ENDPOINTS_PER_TAG) {
            writeln!(out, "   * {:<6} {}", endpoint.method.as_str(), endpoint.path)?;
            if !endpoint.parameters.is_empty() {
                let mut params = endpoint
                    .parameters
                    .iter()
                    .take(PARAMS_PER_ENDPOINT)
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if endpoint.parameters.len() > PARAMS_PER_ENDPOINT {
                    params.push_str("...");
                }
                writeln!(out, "           params: {}", params)?;
            }
        }
        if endpoints.len() > ENDPOINTS_PER_TAG {
            writeln!(
                out,
                "   ... and {} more",
                endpoints.len() - ENDPOINTS_PER_TAG
            )?;
        }
    }
    Ok(())
}
