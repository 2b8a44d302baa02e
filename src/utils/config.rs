use crate::cli::cli_args::{CliArgs, ItemFormat};

/// Resolved settings for a single invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub statement: String,
    pub args: Vec<String>,
    /// 0 means no page cap
    pub max_pages: usize,
    pub consistent_read: bool,
    pub item_format: ItemFormat,
    pub colors: bool,
    pub verbose: bool,
    pub number_items: bool,
    pub aws: AwsConfig,
}

/// Client settings; anything left unset falls back to the default AWS chain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl RunConfig {
    /// Resolve CLI options against the stdout terminal probe
    pub fn from_args(args: CliArgs, stdout_is_terminal: bool) -> Self {
        let colors = match args.no_colors {
            Some(no_colors) => !no_colors,
            None => stdout_is_terminal,
        };

        Self {
            statement: args.statement,
            args: args.args,
            max_pages: args.max_pages,
            consistent_read: args.consistent_read,
            item_format: args.item_format,
            colors,
            verbose: args.verbose,
            number_items: args.verbose && !args.no_item_number,
            aws: AwsConfig {
                region: args.region,
                profile: args.profile,
                endpoint_url: args.endpoint_url,
            },
        }
    }

    /// Config for a statement with every option at its default
    pub fn for_statement(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            args: Vec::new(),
            max_pages: 1,
            consistent_read: false,
            item_format: ItemFormat::Json,
            colors: false,
            verbose: false,
            number_items: false,
            aws: AwsConfig::default(),
        }
    }

    /// Bind JSON literals to the statement placeholders
    pub fn with_args(mut self, args: Vec<&str>) -> Self {
        self.args = args.into_iter().map(str::to_string).collect();
        self
    }

    /// Set the page cap
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Enable verbose output, numbering items as well
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self.number_items = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> CliArgs {
        let mut full = vec!["dynapart"];
        full.extend_from_slice(argv);
        CliArgs::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_colors_follow_terminal_by_default() {
        assert!(RunConfig::from_args(parse(&["SHOW TABLES"]), true).colors);
        assert!(!RunConfig::from_args(parse(&["SHOW TABLES"]), false).colors);
    }

    #[test]
    fn test_no_colors_flag_overrides_terminal() {
        assert!(!RunConfig::from_args(parse(&["-c", "SHOW TABLES"]), true).colors);
        assert!(RunConfig::from_args(parse(&["--no-colors=false", "SHOW TABLES"]), false).colors);
    }

    #[test]
    fn test_item_numbering_requires_verbose() {
        assert!(!RunConfig::from_args(parse(&["q"]), false).number_items);
        assert!(RunConfig::from_args(parse(&["-v", "q"]), false).number_items);
        assert!(!RunConfig::from_args(parse(&["-v", "-n", "q"]), false).number_items);
    }

    #[test]
    fn test_endpoint_is_carried_into_aws_config() {
        let config = RunConfig::from_args(
            parse(&["--endpoint-url", "http://localhost:8000", "--region", "eu-west-1", "q"]),
            false,
        );
        assert_eq!(config.aws.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_for_statement_defaults() {
        let config = RunConfig::for_statement("SELECT * FROM t").with_args(vec!["1", "\"a\""]);
        assert_eq!(config.max_pages, 1);
        assert_eq!(config.args, vec!["1".to_string(), "\"a\"".to_string()]);
        assert!(!config.colors);
        assert!(!config.number_items);
    }
}
