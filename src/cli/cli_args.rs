use clap::{Parser, ValueEnum};

const AFTER_HELP: &str = "\
For more information on using PartiQL with DynamoDB, see
  https://partiql.org/tutorial.html
  https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ql-reference.html

Each DynamoDB item is written to stdout as JSON, one object per line,
which makes the output jq compatible.

Syntax highlighting is enabled automatically when stdout is a terminal.
Override it with --no-colors=true or --no-colors=false.

Credentials are resolved with the default AWS chain: environment
variables, then the shared profile (AWS_PROFILE), then instance metadata.

The special statement \"SHOW TABLES\" lists your DynamoDB tables.
Note that this is not valid PartiQL.";

/// dynapart - run a DynamoDB PartiQL statement and print items as JSON lines
///
/// The statement may contain `?` placeholders. Each placeholder needs a
/// corresponding ARG, and every ARG must be valid JSON.
#[derive(Parser, Debug)]
#[command(name = "dynapart")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
pub struct CliArgs {
    /// PartiQL statement to execute
    #[arg(value_name = "STATEMENT")]
    pub statement: String,

    /// JSON literals bound to the statement's placeholders, in order
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Maximum number of result pages to fetch (0 for no limit)
    #[arg(long, default_value_t = 1)]
    pub max_pages: usize,

    /// Enable strongly consistent reads
    #[arg(long)]
    pub consistent_read: bool,

    /// Item output format
    #[arg(long, default_value = "json")]
    pub item_format: ItemFormat,

    /// Disable JSON syntax highlighting (defaults to true when stdout is not a terminal)
    #[arg(
        short = 'c',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub no_colors: Option<bool>,

    /// Do not prefix items with their running number in verbose mode
    #[arg(short = 'n', long)]
    pub no_item_number: bool,

    /// Print actions and item numbers to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS shared config profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Custom endpoint, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long, env = "DYNAPART_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

/// Item output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    /// One JSON object per line
    Json,
}

impl std::fmt::Display for ItemFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemFormat::Json => write!(f, "json"),
        }
    }
}
