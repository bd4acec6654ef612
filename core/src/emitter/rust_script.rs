#![deny(missing_docs)]

//! # Rust Script Emitter
//!
//! Implementation of `CodeEmitter` producing a single-file cargo script.
//!
//! The output has three parts:
//! - a shebang plus an embedded manifest (`clap`, `ureq`, `serde_json`, `url`, `percent-encoding`);
//! - constants and static `GROUPS`/`GLOBAL_OPTIONS` tables describing every command and flag;
//! - a fixed runtime that builds the `clap::Command` tree from those tables,
//!   assembles the HTTP request and prints the response.
//!
//! Only the tables vary between APIs, so the runtime is kept verbatim below.

use crate::cli_model::{CliCommand, CliGroup, CliOption, GeneratedCli};
use crate::emitter::CodeEmitter;
use crate::error::{AppError, AppResult};

const SHEBANG: &str = "#!/usr/bin/env -S cargo +nightly -Zscript";

const MANIFEST: &str = r#"---
[package]
edition = "2021"

[dependencies]
clap = "4"
percent-encoding = "2"
serde_json = "1"
ureq = "3"
url = "2"
---
"#;

/// Renders a `GeneratedCli` as a runnable Rust cargo script.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustScriptEmitter;

impl CodeEmitter for RustScriptEmitter {
    fn render(&self, cli: &GeneratedCli) -> AppResult<String> {
        if cli.name.trim().is_empty() {
            return Err(AppError::General("CLI name must not be empty".into()));
        }

        let mut code = String::new();
        code.push_str(SHEBANG);
        code.push('\n');
        code.push_str(MANIFEST);
        code.push('\n');

        if !cli.description.is_empty() {
            code.push_str(&format!("//! {}\n//!\n", cli.description));
        }
        code.push_str(&format!(
            "//! Command-line client for {} (API version {}), generated by apicli.\n\n",
            cli.name, cli.version
        ));

        code.push_str(&render_constants(cli));
        code.push('\n');
        code.push_str(&render_global_options(&cli.global_options));
        code.push('\n');
        code.push_str(&render_groups(&cli.groups));
        code.push('\n');
        code.push_str(RUNTIME);
        Ok(code)
    }

    fn default_file_name(&self, cli_name: &str) -> String {
        format!("{}_cli.rs", cli_name)
    }
}

/// Escaped Rust string literal.
fn lit(text: &str) -> String {
    format!("{:?}", text)
}

fn render_constants(cli: &GeneratedCli) -> String {
    let constants = [
        ("CLI_NAME", cli.name.clone()),
        ("ABOUT", cli.description.clone()),
        ("VERSION", cli.version.clone()),
        ("ENV_PREFIX", cli.env_prefix()),
        ("API_KEY_HEADER", cli.api_key_header_name.clone()),
        ("BASE_URL", cli.base_url.clone()),
        (
            "DEFAULT_OUTPUT",
            cli.global_option("--output")
                .and_then(|option| option.default.clone())
                .unwrap_or_else(|| "table".to_string()),
        ),
    ];

    constants
        .iter()
        .map(|(name, value)| format!("const {}: &str = {};\n", name, lit(value)))
        .collect()
}

fn render_global_options(options: &[CliOption]) -> String {
    let mut code = String::from("static GLOBAL_OPTIONS: &[OptionSpec] = &[\n");
    for option in options {
        code.push_str(&render_option(option, 4));
    }
    code.push_str("];\n");
    code
}

fn render_groups(groups: &[CliGroup]) -> String {
    let mut code = String::from("static GROUPS: &[GroupSpec] = &[\n");
    for group in groups {
        code.push_str("    GroupSpec {\n");
        code.push_str(&format!("        name: {},\n", lit(&group.name)));
        code.push_str(&format!("        help: {},\n", lit(&group.help)));
        code.push_str("        commands: &[\n");
        for command in &group.commands {
            code.push_str(&render_command(command));
        }
        code.push_str("        ],\n");
        code.push_str("    },\n");
    }
    code.push_str("];\n");
    code
}

fn render_command(command: &CliCommand) -> String {
    let mut code = String::from("            CommandSpec {\n");
    code.push_str(&format!("                name: {},\n", lit(&command.name)));
    code.push_str(&format!(
        "                method: {},\n",
        lit(command.method.as_str())
    ));
    code.push_str(&format!("                path: {},\n", lit(&command.path)));
    code.push_str(&format!("                help: {},\n", lit(&command.help)));
    if command.options.is_empty() {
        code.push_str("                options: &[],\n");
    } else {
        code.push_str("                options: &[\n");
        for option in &command.options {
            code.push_str(&render_option(option, 20));
        }
        code.push_str("                ],\n");
    }
    code.push_str("            },\n");
    code
}

fn render_option(option: &CliOption, indent: usize) -> String {
    let pad = " ".repeat(indent);

    // Empty defaults and defaults outside the allowed choices would be
    // rejected by the argument parser.
    let default = option
        .default
        .as_deref()
        .filter(|value| !value.is_empty())
        .filter(|value| option.choices.is_empty() || option.choices.iter().any(|c| c == *value))
        .map_or_else(|| "None".to_string(), |value| format!("Some({})", lit(value)));

    let choices: Vec<String> = option.choices.iter().map(|c| lit(c)).collect();

    let fields = [
        ("flag", lit(option.id())),
        ("api_name", lit(&option.api_name)),
        ("location", lit(option.location.as_str())),
        ("value_type", lit(option.value_type.as_str())),
        ("required", option.required.to_string()),
        ("default", default),
        ("help", lit(&option.help)),
        ("choices", format!("&[{}]", choices.join(", "))),
    ];

    let mut code = format!("{pad}OptionSpec {{\n");
    for (name, value) in fields {
        code.push_str(&format!("{pad}    {name}: {value},\n"));
    }
    code.push_str(&format!("{pad}}},\n"));
    code
}

const RUNTIME: &str = r##"use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Number, Value};
use std::env;
use std::process::ExitCode;
use ureq::Agent;
use url::Url;

/// Characters escaped when substituting a value into a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const MAX_CELL_WIDTH: usize = 60;

/// One flag of a command.
struct OptionSpec {
    flag: &'static str,
    api_name: &'static str,
    location: &'static str,
    value_type: &'static str,
    required: bool,
    default: Option<&'static str>,
    help: &'static str,
    choices: &'static [&'static str],
}

/// One subcommand bound to an endpoint.
struct CommandSpec {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    help: &'static str,
    options: &'static [OptionSpec],
}

/// Commands sharing a tag.
struct GroupSpec {
    name: &'static str,
    help: &'static str,
    commands: &'static [CommandSpec],
}

/// Top-level settings after flag and environment lookup.
struct Settings {
    base_url: String,
    api_key: Option<String>,
    token: Option<String>,
    output: String,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            base_url: global_value(matches, "base-url").unwrap_or_else(|| BASE_URL.to_string()),
            api_key: global_value(matches, "api-key").or_else(|| env_value("API_KEY")),
            token: global_value(matches, "token").or_else(|| env_value("TOKEN")),
            output: global_value(matches, "output").unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn build_cli() -> Command {
    let mut cli = Command::new(CLI_NAME)
        .about(ABOUT)
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true);
    for spec in GLOBAL_OPTIONS {
        cli = cli.arg(build_arg(spec));
    }
    for group in GROUPS {
        let mut group_cmd = Command::new(group.name)
            .about(group.help)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true);
        for command in group.commands {
            let mut cmd = Command::new(command.name).about(command.help);
            for spec in command.options {
                cmd = cmd.arg(build_arg(spec));
            }
            group_cmd = group_cmd.subcommand(cmd);
        }
        cli = cli.subcommand(group_cmd);
    }
    cli
}

fn build_arg(spec: &'static OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.flag)
        .long(spec.flag)
        .help(spec.help)
        .action(ArgAction::Set)
        .required(spec.required && spec.default.is_none());
    if spec.location == "global" && spec.flag == "output" {
        arg = arg.short('o');
    }
    if let Some(default) = spec.default {
        arg = arg.default_value(default);
    }
    if !spec.choices.is_empty() {
        arg = arg.value_parser(PossibleValuesParser::new(spec.choices.iter().copied()));
    }
    arg
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let (group_name, group_matches) = matches.subcommand().ok_or("no command given")?;
    let group = GROUPS
        .iter()
        .find(|group| group.name == group_name)
        .ok_or_else(|| format!("unknown command group: {group_name}"))?;
    let (command_name, command_matches) = group_matches
        .subcommand()
        .ok_or_else(|| format!("no command given for {group_name}"))?;
    let command = group
        .commands
        .iter()
        .find(|command| command.name == command_name)
        .ok_or_else(|| format!("unknown command: {group_name} {command_name}"))?;

    let settings = Settings::from_matches(matches);
    let response = send(&settings, command, command_matches)?;
    print_output(&settings.output, &response);
    Ok(())
}

fn global_value(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
        .cloned()
}

fn env_value(suffix: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{suffix}"))
        .ok()
        .filter(|value| !value.is_empty())
}

fn send(settings: &Settings, command: &CommandSpec, matches: &ArgMatches) -> Result<Value, String> {
    let mut path = command.path.to_string();
    let mut query: Vec<(&str, String)> = Vec::new();
    let mut headers: Vec<(&str, String)> = Vec::new();
    let mut cookies: Vec<String> = Vec::new();
    let mut body = Map::new();
    let mut raw_body: Option<Value> = None;

    for spec in command.options {
        let Some(value) = matches.get_one::<String>(spec.flag) else {
            continue;
        };
        let typed = to_json(spec, value)?;
        match spec.location {
            "path" => {
                let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
                path = path.replace(&format!("{{{}}}", spec.api_name), &encoded);
            }
            "query" => query.push((spec.api_name, value.clone())),
            "header" => headers.push((spec.api_name, value.clone())),
            "cookie" => cookies.push(format!("{}={}", spec.api_name, value)),
            "body" => {
                body.insert(spec.api_name.to_string(), typed);
            }
            "body_raw" => {
                let parsed = serde_json::from_str::<Value>(value)
                    .map_err(|err| format!("--{} is not valid JSON: {err}", spec.flag))?;
                raw_body = Some(parsed);
            }
            _ => {}
        }
    }

    let base = settings.base_url.trim_end_matches('/');
    if base.is_empty() {
        return Err("no base URL configured, pass --base-url".to_string());
    }
    let mut url = Url::parse(&format!("{base}{path}"))
        .map_err(|err| format!("invalid URL {base}{path}: {err}"))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &query {
            pairs.append_pair(name, value);
        }
    }

    if let Some(token) = &settings.token {
        headers.push(("Authorization", format!("Bearer {token}")));
    } else if let Some(key) = &settings.api_key {
        let header = if API_KEY_HEADER.is_empty() { "X-API-Key" } else { API_KEY_HEADER };
        headers.push((header, key.clone()));
    }

    let mut request = ureq::http::Request::builder()
        .method(command.method)
        .uri(url.as_str())
        .header("Accept", "application/json");
    for (name, value) in &headers {
        request = request.header(*name, value.as_str());
    }
    if !cookies.is_empty() {
        request = request.header("Cookie", cookies.join("; "));
    }

    let payload = raw_body.or_else(|| (!body.is_empty()).then(|| Value::Object(body)));
    let agent: Agent = Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();
    let response = match payload {
        Some(payload) => {
            let request = request
                .header("Content-Type", "application/json")
                .body(payload.to_string())
                .map_err(|err| err.to_string())?;
            agent.run(request)
        }
        None => {
            let request = request.body(()).map_err(|err| err.to_string())?;
            agent.run(request)
        }
    }
    .map_err(|err| format!("request to {url} failed: {err}"))?;

    let status = response.status();
    let text = response
        .into_body()
        .read_to_string()
        .map_err(|err| format!("failed to read response: {err}"))?;
    if !status.is_success() {
        return Err(format!("HTTP {}: {}", status.as_u16(), text.trim()));
    }
    Ok(match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    })
}

fn to_json(spec: &OptionSpec, value: &str) -> Result<Value, String> {
    let invalid = || format!("--{} expects {} but got {value:?}", spec.flag, spec.value_type);
    match spec.value_type {
        "integer" => value.parse::<i64>().map(Value::from).map_err(|_| invalid()),
        "float" => value
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        "boolean" => value.parse::<bool>().map(Value::Bool).map_err(|_| invalid()),
        _ => Ok(Value::String(value.to_string())),
    }
}

fn print_output(format: &str, value: &Value) {
    match format {
        "json" => match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("{value}"),
        },
        "raw" => match value {
            Value::String(text) => println!("{text}"),
            other => println!("{other}"),
        },
        _ => print_table(value),
    }
}

fn print_table(value: &Value) {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            let mut columns: Vec<&str> = Vec::new();
            for item in items.iter().filter_map(Value::as_object) {
                for key in item.keys() {
                    if !columns.contains(&key.as_str()) {
                        columns.push(key.as_str());
                    }
                }
            }
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|item| columns.iter().map(|column| cell(item.get(*column))).collect())
                .collect();
            let widths: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    rows.iter()
                        .map(|row| row[i].chars().count())
                        .fold(column.chars().count(), usize::max)
                })
                .collect();

            let header: Vec<String> = columns.iter().map(|column| column.to_string()).collect();
            let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
            print_row(&header, &widths);
            print_row(&rule, &widths);
            for row in &rows {
                print_row(row, &widths);
            }
        }
        Value::Object(map) => {
            let width = map.keys().map(|key| key.chars().count()).max().unwrap_or(0);
            for (key, value) in map {
                println!("{key:<width$}  {}", cell(Some(value)));
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", cell(Some(item)));
            }
        }
        other => println!("{}", cell(Some(other))),
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}

fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        text
    }
}
"##;
