mod request;
mod sets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use set_query::schema::ast::{Name, TypeName};
use set_query::schema::types::QueryArgsFields;
use set_query::{Configuration, Hooks};
use tracing_util::{ErrorVisibility, SpanVisibility, TraceableError};

static DEFAULT_OTEL_SERVICE_NAME: &str = "set-query";
static VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_PARENT_TYPE: &str = "RootQueryToPostConnectionWhereArgs";

#[derive(Parser)]
#[command(version = VERSION, about = "Query content objects by membership in named sets")]
struct Options {
    /// The set query configuration file. Defaults apply when omitted.
    #[arg(long, value_name = "PATH", env = "SET_QUERY_CONFIG_PATH", global = true)]
    config_path: Option<PathBuf>,
    /// The set definitions file. The bundled sample sets are used when omitted.
    #[arg(long, value_name = "PATH", env = "SET_QUERY_SETS_PATH", global = true)]
    sets_path: Option<PathBuf>,
    /// The OpenTelemetry collector endpoint.
    #[arg(long, value_name = "URL", env = "OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,
    /// Print traces. They go to stderr, so command output on stdout stays parseable.
    #[arg(long, env = "EXPORT_TRACES_STDOUT", global = true)]
    export_traces_stdout: bool,
    /// Service name output in OpenTelemetry traces
    #[arg(long, env = "OTEL_SERVICE_NAME", global = true)]
    otel_service_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the GraphQL SDL of the query-argument fields the set query contributes.
    Schema {
        /// The input object holding the query-argument fields.
        #[arg(long, value_name = "TYPE", default_value = DEFAULT_PARENT_TYPE)]
        parent_type: String,
    },
    /// Map a request's input arguments to query arguments and print them as JSON.
    Transform {
        /// The request file, holding `queryArgs` and `inputArgs`. Read from stdin when omitted.
        #[arg(long, value_name = "PATH")]
        request: Option<PathBuf>,
    },
    /// Print the JSON schema of the configuration file.
    ConfigSchema,
}

#[derive(thiserror::Error, Debug)]
enum StartupError {
    #[error("could not read the configuration - {0}")]
    ReadConfiguration(anyhow::Error),
    #[error("could not load the set definitions - {0}")]
    ReadSets(anyhow::Error),
    #[error("could not read the request - {0}")]
    ReadRequest(anyhow::Error),
    #[error("could not write the output - {0}")]
    WriteOutput(anyhow::Error),
}

impl TraceableError for StartupError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::User
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let options = Options::parse();
    let export_traces_stdout = if options.export_traces_stdout {
        tracing_util::ExportTracesStdout::Enable
    } else {
        tracing_util::ExportTracesStdout::Disable
    };

    let otel_service_name = match &options.otel_service_name {
        Some(otel_service_name) => otel_service_name,
        None => DEFAULT_OTEL_SERVICE_NAME,
    };

    if let Err(error) = tracing_util::initialize_tracing(
        options.otlp_endpoint.as_deref(),
        otel_service_name.to_string(),
        Some(VERSION),
        export_traces_stdout,
    ) {
        eprintln!("Could not initialize tracing: {error}");
    }

    let result = tracing_util::global_tracer()
        .in_span_async(
            "set_query_cli",
            "Run the set query command",
            SpanVisibility::User,
            || Box::pin(run(&options)),
        )
        .await;

    tracing_util::shutdown_tracer();

    if let Err(error) = result {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(options: &Options) -> Result<(), StartupError> {
    let output = match &options.command {
        Command::Schema { parent_type } => {
            let hooks = install_hooks(options)?;
            render_schema(&hooks, parent_type).map_err(StartupError::WriteOutput)?
        }
        Command::Transform { request } => {
            let hooks = install_hooks(options)?;
            let request =
                request::read_request(request.as_deref()).map_err(StartupError::ReadRequest)?;
            let query_args = hooks
                .map_input_fields_onto(request.query_args, &request.input_args)
                .await;
            serde_json::to_string_pretty(&query_args)
                .map_err(|error| StartupError::WriteOutput(error.into()))?
        }
        Command::ConfigSchema => {
            render_configuration_schema().map_err(StartupError::WriteOutput)?
        }
    };
    write_output(&output).map_err(StartupError::WriteOutput)
}

fn install_hooks(options: &Options) -> Result<Hooks, StartupError> {
    let configuration = read_configuration(options.config_path.as_deref())
        .map_err(StartupError::ReadConfiguration)?;
    let registry =
        sets::read_sets(options.sets_path.as_deref()).map_err(StartupError::ReadSets)?;

    let mut hooks = Hooks::new();
    set_query::install(&mut hooks, Arc::new(registry), configuration);
    Ok(hooks)
}

fn read_configuration(path: Option<&Path>) -> anyhow::Result<Configuration> {
    match path {
        Some(path) => {
            let raw_configuration = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw_configuration)?)
        }
        None => Ok(Configuration::default()),
    }
}

fn render_schema(hooks: &Hooks, parent_type: &str) -> anyhow::Result<String> {
    let parent = TypeName(Name::new(parent_type)?);
    let fields = hooks.build_query_args_fields(QueryArgsFields::new());
    Ok(set_query::generate_sdl(&fields, &parent))
}

fn render_configuration_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(Configuration);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[allow(clippy::print_stdout)]
fn write_output(output: &str) -> anyhow::Result<()> {
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_hooks() -> Hooks {
        let mut hooks = Hooks::new();
        set_query::install(
            &mut hooks,
            Arc::new(sets::read_sets(None).unwrap()),
            Configuration::default(),
        );
        hooks
    }

    #[test]
    fn test_options_parse() {
        let options = Options::try_parse_from([
            "set-query",
            "transform",
            "--request",
            "request.json",
            "--sets-path",
            "sets.json",
        ])
        .unwrap();
        assert_eq!(options.sets_path, Some(PathBuf::from("sets.json")));
        assert!(matches!(
            options.command,
            Command::Transform { request: Some(_) }
        ));
    }

    #[test]
    fn test_schema_lists_bundled_sets() {
        let sdl = render_schema(&bundled_hooks(), DEFAULT_PARENT_TYPE).unwrap();
        insta::assert_snapshot!(sdl, @r###"
        input RootQueryToPostConnectionWhereArgs {
          "Query objects based on user-defined sets"
          setQuery: [setArray]
        }

        "User-defined sets"
        enum set {
          "Posts by curated authors, keyed by author login"
          curated_authors
          "Posts picked for the front page"
          featured
        }

        "Query objects based on user-defined sets"
        input setArray {
          "A list of arguments passed to the user-defined set function"
          args: [String]
          "User-defined sets"
          set: set
        }
        "###);
    }

    #[test]
    fn test_schema_rejects_invalid_parent_type() {
        assert!(render_schema(&bundled_hooks(), "Where-Args").is_err());
    }

    #[tokio::test]
    async fn test_transform_bundled_sets() {
        let request: request::TransformRequest = serde_json::from_value(serde_json::json!({
            "queryArgs": {"post_type": "post"},
            "inputArgs": {
                "setQuery": [
                    {"set": "curated_authors", "args": ["bob", "alice"]},
                    {"set": "featured"},
                    {"set": "unknown"}
                ]
            }
        }))
        .unwrap();
        let query_args = bundled_hooks()
            .map_input_fields_onto(request.query_args, &request.input_args)
            .await;
        assert_eq!(
            serde_json::to_value(query_args).unwrap(),
            serde_json::json!({
                "post_type": "post",
                "post__in": [2, 5, 3, 1, 42, 7, 19],
                "orderby": "post__in"
            })
        );
    }

    #[test]
    fn test_configuration_schema() {
        let schema: serde_json::Value =
            serde_json::from_str(&render_configuration_schema().unwrap()).unwrap();
        assert_eq!(schema["title"], "SetQueryConfiguration");
        assert_eq!(schema["additionalProperties"], false);

        let mut properties: Vec<_> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        properties.sort_unstable();
        assert_eq!(
            properties,
            vec![
                "inclusionListKey",
                "noValidSets",
                "orderByInclusionValue",
                "orderByKey",
                "resolverTimeoutMs"
            ]
        );

        // the documented example must itself be a valid configuration
        let example = &schema["examples"][0];
        let configuration: Configuration = serde_json::from_value(example.clone()).unwrap();
        assert_eq!(configuration.resolver_timeout_ms, Some(2000));
    }

    #[test]
    fn test_read_default_configuration() {
        assert_eq!(read_configuration(None).unwrap(), Configuration::default());
    }
}
