#![deny(missing_docs)]

//! # CLI Model Builder
//!
//! Derives a `GeneratedCli` from a `ParsedSpec`.
//!
//! Per-command options are assembled in a fixed precedence order (parameters,
//! body properties, then `--data`) and deduplicated by argument id (the flag
//! without leading dashes) with first-write-wins. The dedup set lives only for the duration of one
//! command's construction.

use crate::cli_model::{CliCommand, CliGroup, CliOption, GeneratedCli, OptionLocation};
use crate::naming::{clean_text, option_name, sanitize_name, CommandNamer, VerbShortening};
use crate::oas::models::{AuthKind, AuthScheme, Endpoint, ParsedSpec, DEFAULT_TAG};
use crate::oas::resolver::params::schema_type;
use crate::oas::resolver::scalar_text;
use crate::type_mapping::{map_schema_type, CliValueType};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, warn};

/// Values accepted by the generated `--output` flag.
pub const OUTPUT_FORMATS: [&str; 3] = ["json", "table", "raw"];

/// Argument ids the generated argument parser defines on its own.
const RESERVED_IDS: [&str; 2] = ["help", "version"];

/// Builds the CLI model, using `N` to name commands.
#[derive(Debug, Clone, Default)]
pub struct CliBuilder<N: CommandNamer = VerbShortening> {
    namer: N,
}

impl CliBuilder<VerbShortening> {
    /// Builder with the default verb-shortening command names.
    pub fn new() -> Self {
        Self {
            namer: VerbShortening,
        }
    }
}

impl<N: CommandNamer> CliBuilder<N> {
    /// Builder with a custom naming strategy.
    pub fn with_namer(namer: N) -> Self {
        Self { namer }
    }

    /// Projects `spec` onto a CLI named `name`.
    pub fn build(&self, spec: &ParsedSpec, name: &str) -> GeneratedCli {
        let description = match clean_text(&spec.description) {
            d if d.is_empty() => format!("CLI for {}", clean_text(&spec.title)),
            d => d,
        };

        let groups = self.build_groups(spec);
        debug!(
            "Built {} groups from {} endpoints",
            groups.len(),
            spec.endpoints.len()
        );

        GeneratedCli {
            name: name.to_string(),
            version: spec.version.clone(),
            description,
            base_url: spec.base_url.clone(),
            groups,
            global_options: global_options(spec),
            auth_schemes: spec.auth_schemes.clone(),
            api_key_header_name: api_key_header_name(&spec.auth_schemes),
        }
    }

    fn build_groups(&self, spec: &ParsedSpec) -> Vec<CliGroup> {
        struct Draft<'a> {
            help: String,
            endpoints: Vec<&'a Endpoint>,
        }

        // Tags that sanitize to the same identifier share one group.
        let mut drafts: IndexMap<String, Draft<'_>> = IndexMap::new();
        for (tag, endpoints) in spec.group_by_tag() {
            let mut group_name = sanitize_name(&tag);
            if group_name.is_empty() {
                group_name = DEFAULT_TAG.to_string();
            }
            let draft = drafts.entry(group_name).or_insert_with(|| Draft {
                help: format!("Commands for {}", clean_text(&tag)),
                endpoints: Vec::new(),
            });
            for endpoint in endpoints {
                if !draft.endpoints.iter().any(|seen| std::ptr::eq(*seen, endpoint)) {
                    draft.endpoints.push(endpoint);
                }
            }
        }

        drafts
            .into_iter()
            .map(|(name, draft)| {
                let mut used: IndexSet<String> = IndexSet::new();
                let commands = draft
                    .endpoints
                    .into_iter()
                    .map(|endpoint| {
                        let mut command = self.build_command(endpoint);
                        command.name = unique_command_name(&name, command.name, &mut used);
                        command
                    })
                    .collect();
                CliGroup {
                    name,
                    help: draft.help,
                    commands,
                }
            })
            .collect()
    }

    /// Builds one command from one endpoint.
    pub fn build_command(&self, endpoint: &Endpoint) -> CliCommand {
        let name = self.namer.command_name(endpoint);
        let mut options = OptionSet::new(&name);

        for param in &endpoint.parameters {
            let mut option = CliOption::new(
                option_name(&param.name),
                non_empty_or(clean_text(&param.description), || {
                    format!("{} parameter", param.name)
                }),
                param.location.into(),
            );
            option.value_type = map_schema_type(&param.schema_type);
            option.required = param.required;
            option.default = param.default.as_ref().map(render_default);
            option.api_name = param.name.clone();
            option.choices = param.enum_values.clone();
            options.add(option);
        }

        if let Some(body) = &endpoint.request_body {
            for (prop_name, prop_schema) in &body.properties {
                let description = prop_schema
                    .get("description")
                    .and_then(Value::as_str)
                    .map(clean_text)
                    .unwrap_or_default();
                let mut option = CliOption::new(
                    format!("--{}", sanitize_name(prop_name)),
                    non_empty_or(description, || format!("{} field", prop_name)),
                    OptionLocation::Body,
                );
                option.value_type = prop_schema
                    .as_object()
                    .map_or(CliValueType::String, |schema| {
                        map_schema_type(&schema_type(schema))
                    });
                option.required = body.required_props.contains(prop_name);
                option.api_name = prop_name.clone();
                options.add(option);
            }

            let mut data = CliOption::new(
                "--data",
                "Raw JSON data for request body",
                OptionLocation::BodyRaw,
            );
            data.api_name = "data".to_string();
            options.add(data);
        }

        let help = [&endpoint.summary, &endpoint.description]
            .into_iter()
            .map(|text| clean_text(text))
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| format!("{} {}", endpoint.method, endpoint.path));
        let options = options.into_options();

        CliCommand {
            name,
            method: endpoint.method,
            path: endpoint.path.clone(),
            help,
            options,
            has_body: endpoint.request_body.is_some(),
        }
    }
}

/// Global options: output format, base URL and credential flags.
///
/// `--api-key` is added for every apiKey scheme and `--token` for every
/// bearer scheme, once each. Without either, a default `--api-key` is added.
pub fn global_options(spec: &ParsedSpec) -> Vec<CliOption> {
    let mut options = OptionSet::new("<global>");
    let mut output = CliOption::new(
        "--output",
        "Output format (json, table, raw)",
        OptionLocation::Global,
    )
    .with_default("table");
    output.choices = OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect();
    options.add(output);
    options.add(
        CliOption::new("--base-url", "API base URL", OptionLocation::Global)
            .with_default(spec.base_url.clone()),
    );

    for scheme in &spec.auth_schemes {
        if scheme.kind == AuthKind::ApiKey {
            options.add_quiet(CliOption::new(
                "--api-key",
                format!("API key ({})", scheme.param_name),
                OptionLocation::Global,
            ));
        } else if scheme.is_bearer() {
            options.add_quiet(CliOption::new(
                "--token",
                "Bearer token for authentication",
                OptionLocation::Global,
            ));
        }
    }

    if !options.contains("--api-key") && !options.contains("--token") {
        options.add(CliOption::new(
            "--api-key",
            "API key for authentication",
            OptionLocation::Global,
        ));
    }

    options.into_options()
}

/// Header name of the first apiKey scheme sent in a header, or empty.
pub fn api_key_header_name(schemes: &[AuthScheme]) -> String {
    schemes
        .iter()
        .find(|s| s.kind == AuthKind::ApiKey && s.location == "header" && !s.param_name.is_empty())
        .map(|s| s.param_name.clone())
        .unwrap_or_default()
}

/// Ordered option list scoped to one command, unique by argument id.
///
/// `--id` and `---id` share the id `id`, so only the first is kept.
struct OptionSet<'a> {
    owner: &'a str,
    seen: IndexSet<String>,
    options: Vec<CliOption>,
}

impl<'a> OptionSet<'a> {
    fn new(owner: &'a str) -> Self {
        Self {
            owner,
            seen: RESERVED_IDS.iter().map(|id| id.to_string()).collect(),
            options: Vec::new(),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.seen.contains(name.trim_start_matches('-'))
    }

    /// Adds `option` unless its id is taken; the later option is dropped.
    fn add(&mut self, option: CliOption) {
        if option.id().is_empty() {
            warn!(
                "{}: skipping option for {:?}, it has no usable flag name",
                self.owner, option.api_name
            );
            return;
        }
        if self.contains(&option.name) {
            if option.required {
                warn!(
                    "{}: required {} option {} ({}) dropped, the flag is already taken",
                    self.owner, option.location, option.name, option.api_name
                );
            } else {
                warn!(
                    "{}: {} option {} ({}) dropped, the flag is already taken",
                    self.owner, option.location, option.name, option.api_name
                );
            }
            return;
        }
        self.push(option);
    }

    /// Like `add`, but a collision is expected and not logged.
    fn add_quiet(&mut self, option: CliOption) {
        if !self.contains(&option.name) {
            self.push(option);
        }
    }

    fn push(&mut self, option: CliOption) {
        self.seen.insert(option.id().to_string());
        self.options.push(option);
    }

    fn into_options(self) -> Vec<CliOption> {
        self.options
    }
}

fn unique_command_name(group: &str, name: String, used: &mut IndexSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{}-{}", name, counter);
        if used.insert(candidate.clone()) {
            warn!("{}: command {} already exists, renamed to {}", group, name, candidate);
            return candidate;
        }
        counter += 1;
    }
}

fn render_default(value: &Value) -> String {
    scalar_text(value).unwrap_or_else(|| value.to_string())
}

fn non_empty_or(text: String, fallback: impl FnOnce() -> String) -> String {
    if text.is_empty() {
        fallback()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{HttpMethod, ParamLocation, Parameter, RequestBody};
    use serde_json::json;

    fn endpoint(path: &str, method: HttpMethod, operation_id: Option<&str>) -> Endpoint {
        Endpoint {
            path: path.into(),
            method,
            operation_id: operation_id.map(str::to_string),
            summary: String::new(),
            description: String::new(),
            tags: vec![DEFAULT_TAG.into()],
            parameters: vec![],
            request_body: None,
            security: vec![],
        }
    }

    fn param(name: &str, location: ParamLocation, schema_type: &str) -> Parameter {
        Parameter {
            name: name.into(),
            location,
            required: location == ParamLocation::Path,
            description: String::new(),
            schema_type: schema_type.into(),
            default: None,
            enum_values: vec![],
        }
    }

    fn spec(endpoints: Vec<Endpoint>, auth_schemes: Vec<AuthScheme>) -> ParsedSpec {
        ParsedSpec {
            title: "Pet Store".into(),
            version: "1.0.0".into(),
            description: String::new(),
            base_url: "https://api.example.com/v1".into(),
            endpoints,
            auth_schemes,
        }
    }

    fn api_key_scheme(location: &str, param_name: &str) -> AuthScheme {
        AuthScheme {
            name: "api_key".into(),
            kind: AuthKind::ApiKey,
            location: location.into(),
            scheme: String::new(),
            param_name: param_name.into(),
        }
    }

    fn bearer_scheme() -> AuthScheme {
        AuthScheme {
            name: "bearer".into(),
            kind: AuthKind::Http,
            location: String::new(),
            scheme: "bearer".into(),
            param_name: String::new(),
        }
    }

    fn names(options: &[CliOption]) -> Vec<&str> {
        options.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn test_get_pet_by_id_command() {
        let mut ep = endpoint("/pet/{petId}", HttpMethod::Get, Some("getPetById"));
        ep.parameters.push(param("petId", ParamLocation::Path, "integer"));

        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(command.name, "get-by-id");
        assert_eq!(command.help, "GET /pet/{petId}");
        assert!(!command.has_body);

        let option = &command.options[0];
        assert_eq!(option.name, "--pet-id");
        assert!(option.required);
        assert_eq!(option.value_type, CliValueType::Integer);
        assert_eq!(option.location, OptionLocation::Path);
        assert_eq!(option.api_name, "petId");
        assert_eq!(option.help, "petId parameter");
    }

    #[test]
    fn test_fallback_command_name_for_missing_operation_id() {
        let ep = endpoint("/users/{id}/orders", HttpMethod::Post, None);
        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(command.name, "post-users-orders");
    }

    #[test]
    fn test_body_properties_and_data_option() {
        let mut ep = endpoint("/pet", HttpMethod::Post, Some("addPet"));
        let mut properties = serde_json::Map::new();
        properties.insert("name".into(), json!({ "type": "string" }));
        properties.insert("status".into(), json!({ "type": "string", "description": "Pet\n status" }));
        ep.request_body = Some(RequestBody {
            properties,
            required_props: vec!["name".into()],
            ..RequestBody::default()
        });

        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(command.name, "add");
        assert!(command.has_body);
        assert_eq!(names(&command.options), vec!["--name", "--status", "--data"]);

        let [name, status, data] = &command.options[..] else {
            panic!("expected three options");
        };
        assert!(name.required);
        assert_eq!(name.location, OptionLocation::Body);
        assert_eq!(name.help, "name field");
        assert!(!status.required);
        assert_eq!(status.help, "Pet status");
        assert_eq!(status.value_type, CliValueType::String);
        assert!(!data.required);
        assert_eq!(data.location, OptionLocation::BodyRaw);
        assert_eq!(data.api_name, "data");
    }

    #[test]
    fn test_option_names_are_unique_first_write_wins() {
        let mut ep = endpoint("/items/{itemId}", HttpMethod::Put, Some("updateItem"));
        ep.parameters = vec![
            param("itemId", ParamLocation::Path, "integer"),
            param("item_id", ParamLocation::Query, "string"),
            param("data", ParamLocation::Query, "string"),
        ];
        let mut properties = serde_json::Map::new();
        properties.insert("itemId".into(), json!({ "type": "string" }));
        properties.insert("label".into(), json!({ "type": "string" }));
        ep.request_body = Some(RequestBody {
            properties,
            required_props: vec!["itemId".into()],
            ..RequestBody::default()
        });

        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(names(&command.options), vec!["--item-id", "--data", "--label"]);
        assert_eq!(command.options[0].location, OptionLocation::Path);
        assert_eq!(command.options[1].location, OptionLocation::Query);

        let unique: IndexSet<&str> = names(&command.options).into_iter().collect();
        assert_eq!(unique.len(), command.options.len());
    }

    #[test]
    fn test_nameless_parameter_is_skipped() {
        let mut ep = endpoint("/x", HttpMethod::Get, Some("getX"));
        ep.parameters = vec![param("", ParamLocation::Query, "string")];
        let command = CliBuilder::new().build_command(&ep);
        assert!(command.options.is_empty());
    }

    #[test]
    fn test_parameter_named_help_is_dropped() {
        let mut ep = endpoint("/docs", HttpMethod::Get, Some("getDocs"));
        ep.parameters = vec![
            param("help", ParamLocation::Query, "boolean"),
            param("page", ParamLocation::Query, "integer"),
        ];
        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(names(&command.options), vec!["--page"]);
    }

    #[test]
    fn test_flags_sharing_an_argument_id_are_deduplicated() {
        let mut ep = endpoint("/docs", HttpMethod::Put, Some("updateDocs"));
        ep.parameters = vec![
            param("_id", ParamLocation::Query, "string"),
            param("_help", ParamLocation::Query, "boolean"),
        ];
        let mut properties = serde_json::Map::new();
        properties.insert("id".into(), json!({ "type": "string" }));
        properties.insert("title".into(), json!({ "type": "string" }));
        ep.request_body = Some(RequestBody {
            properties,
            ..RequestBody::default()
        });

        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(names(&command.options), vec!["---id", "--title", "--data"]);
        assert_eq!(command.options[0].location, OptionLocation::Query);

        let ids: IndexSet<&str> = command.options.iter().map(|o| o.id()).collect();
        assert_eq!(ids.len(), command.options.len());
    }

    #[test]
    fn test_parameter_defaults_and_choices() {
        let mut ep = endpoint("/pets", HttpMethod::Get, Some("listPets"));
        let mut limit = param("limit", ParamLocation::Query, "integer");
        limit.default = Some(json!(20));
        limit.description = "How many\nitems".into();
        let mut status = param("status", ParamLocation::Query, "string");
        status.default = Some(json!("available"));
        status.enum_values = vec!["available".into(), "sold".into()];
        ep.parameters = vec![limit, status];

        let command = CliBuilder::new().build_command(&ep);
        assert_eq!(command.options[0].default.as_deref(), Some("20"));
        assert_eq!(command.options[0].help, "How many items");
        assert_eq!(command.options[1].default.as_deref(), Some("available"));
        assert_eq!(command.options[1].choices, vec!["available", "sold"]);
    }

    #[test]
    fn test_help_prefers_summary_then_description() {
        let mut ep = endpoint("/x", HttpMethod::Get, Some("getX"));
        ep.description = "  Long\n description ".into();
        assert_eq!(CliBuilder::new().build_command(&ep).help, "Long description");
        ep.summary = "Short".into();
        assert_eq!(CliBuilder::new().build_command(&ep).help, "Short");
    }

    #[test]
    fn test_global_options_api_key_only() {
        let spec = spec(vec![], vec![api_key_scheme("header", "X-API-Key")]);
        let cli = CliBuilder::new().build(&spec, "petstore");

        assert_eq!(names(&cli.global_options), vec!["--output", "--base-url", "--api-key"]);
        assert_eq!(cli.api_key_header_name, "X-API-Key");
        let output = cli.global_option("--output").unwrap();
        assert_eq!(output.default.as_deref(), Some("table"));
        assert_eq!(output.choices, vec!["json", "table", "raw"]);
        assert_eq!(
            cli.global_option("--base-url").unwrap().default.as_deref(),
            Some("https://api.example.com/v1")
        );
        assert_eq!(cli.global_option("--api-key").unwrap().help, "API key (X-API-Key)");
    }

    #[test]
    fn test_global_options_bearer_and_api_key() {
        let spec = spec(
            vec![],
            vec![
                bearer_scheme(),
                api_key_scheme("query", "key"),
                api_key_scheme("header", "X-Key"),
            ],
        );
        let cli = CliBuilder::new().build(&spec, "demo");
        assert_eq!(
            names(&cli.global_options),
            vec!["--output", "--base-url", "--token", "--api-key"]
        );
        assert_eq!(cli.api_key_header_name, "X-Key");
    }

    #[test]
    fn test_default_api_key_without_schemes() {
        let spec = spec(vec![], vec![]);
        let cli = CliBuilder::new().build(&spec, "demo");
        assert_eq!(names(&cli.global_options), vec!["--output", "--base-url", "--api-key"]);
        assert_eq!(cli.api_key_header_name, "");
        assert_eq!(cli.description, "CLI for Pet Store");
    }

    #[test]
    fn test_groups_follow_tags() {
        let mut a = endpoint("/pets", HttpMethod::Get, Some("listPets"));
        a.tags = vec!["Pet Ops".into(), "admin".into()];
        let mut b = endpoint("/users", HttpMethod::Get, Some("listUsers"));
        b.tags = vec!["admin".into()];
        let c = endpoint("/health", HttpMethod::Get, None);

        let cli = CliBuilder::new().build(&spec(vec![a, b, c], vec![]), "demo");
        let group_names: Vec<&str> = cli.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, vec!["pet-ops", "admin", "default"]);
        assert_eq!(cli.groups[0].help, "Commands for Pet Ops");

        let admin: Vec<&str> = cli.groups[1].commands.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(admin, vec!["/pets", "/users"]);
        let admin_names: Vec<&str> = cli.groups[1].commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(admin_names, vec!["list", "list-2"]);

        assert_eq!(cli.groups[2].commands[0].name, "get-health");
        assert_eq!(cli.command_count(), 4);
    }

    #[test]
    fn test_tags_sanitizing_alike_share_a_group() {
        let mut a = endpoint("/pets", HttpMethod::Get, Some("listPets"));
        a.tags = vec!["Pet".into(), "pet".into()];
        let mut b = endpoint("/pets", HttpMethod::Post, Some("addPet"));
        b.tags = vec!["pet".into()];
        let mut c = endpoint("/odd", HttpMethod::Get, Some("getOdd"));
        c.tags = vec!["???".into()];

        let cli = CliBuilder::new().build(&spec(vec![a, b, c], vec![]), "demo");
        assert_eq!(cli.groups.len(), 2);
        assert_eq!(cli.groups[0].name, "pet");
        let pet: Vec<&str> = cli.groups[0].commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(pet, vec!["list", "add"]);
        assert_eq!(cli.groups[1].name, DEFAULT_TAG);
    }

    struct OperationIdOnly;

    impl CommandNamer for OperationIdOnly {
        fn command_name(&self, endpoint: &Endpoint) -> String {
            endpoint.operation_id.clone().unwrap_or_else(|| "op".into())
        }
    }

    #[test]
    fn test_custom_namer() {
        let ep = endpoint("/pet/{petId}", HttpMethod::Get, Some("getPetById"));
        let command = CliBuilder::with_namer(OperationIdOnly).build_command(&ep);
        assert_eq!(command.name, "getPetById");
    }
}
