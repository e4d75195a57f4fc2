use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turns pasted HTTP client snippets into validated API descriptors
#[derive(Parser, Debug)]
#[command(
    name = "apiscope",
    about = "Turns pasted HTTP client snippets into validated API descriptors",
    version,
    author,
    long_about = "apiscope reads a code snippet (fetch, axios, requests, curl, ...) and \
                  recovers the endpoint, HTTP method, auth key, headers and payload fields \
                  it uses. Descriptors can be validated, stored and test-called."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Path to the API store (overrides APISCOPE_STORE_PATH)"
    )]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract an API descriptor from a snippet",
        long_about = "Runs heuristic extraction over a snippet and prints the descriptor \
                      without storing it. Reads stdin when FILE is omitted or '-'.\n\n\
                      Examples:\n  \
                      apiscope extract snippet.js\n  \
                      pbpaste | apiscope extract --format json"
    )]
    Extract(ExtractArgs),

    #[command(
        about = "Extract, validate and store an API",
        long_about = "Extracts a descriptor from the snippet, applies any overrides given \
                      on the command line, validates the result and stores it.\n\n\
                      Examples:\n  \
                      apiscope add snippet.py\n  \
                      apiscope add snippet.sh --name 'Orders API' --method POST"
    )]
    Add(AddArgs),

    #[command(about = "List stored APIs")]
    List(ListArgs),

    #[command(about = "Show one stored API with its call history")]
    Show(ShowArgs),

    #[command(about = "Delete a stored API")]
    Delete(DeleteArgs),

    #[command(
        about = "Perform a live test call against a stored API",
        long_about = "Calls the stored endpoint with its method, headers and auth key, \
                      then records the outcome in the API's history.\n\n\
                      Examples:\n  \
                      apiscope test 3f1c...\n  \
                      apiscope test 3f1c... --timeout 5"
    )]
    Test(TestArgs),

    #[command(about = "Show store counters")]
    Stats(FormatArgs),

    #[command(about = "Show the effective configuration")]
    Config(FormatArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "FILE", help = "Snippet file ('-' or omitted reads stdin)")]
    pub input: Option<PathBuf>,

    #[arg(long, help = "Override the derived name")]
    pub name: Option<String>,

    #[arg(long, help = "Override the derived description")]
    pub description: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    #[arg(value_name = "FILE", help = "Snippet file ('-' or omitted reads stdin)")]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    #[arg(long, value_name = "VERB")]
    pub method: Option<String>,

    #[arg(long, value_name = "KEY")]
    pub auth_key: Option<String>,

    #[arg(
        long,
        value_name = "JSON",
        help = "Headers as a flat JSON object, e.g. '{\"X-Team\": \"core\"}'"
    )]
    pub headers: Option<String>,

    #[arg(
        long,
        value_name = "NAMES",
        value_delimiter = ',',
        help = "Comma-separated payload field names"
    )]
    pub fields: Option<Vec<String>>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, value_name = "TERM", help = "Only show APIs whose name, description, endpoint or method contains TERM")]
    pub filter: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct TestArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Request timeout in seconds (overrides APISCOPE_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct FormatArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
