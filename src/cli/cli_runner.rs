use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cli::{CliArgs, OutputFormatter, ResultPrinter};
use crate::connectors::{DynamoDbStore, StatementStore};
use crate::engine::{convert_arguments, InterruptController, PaginationDriver, PaginationSummary, StopReason};
use crate::utils::{
    config::RunConfig,
    error::DynapartResult,
    logging::init_logging,
    types::StatementRequest,
};

/// Runs one statement from parsed CLI settings
pub struct CliRunner {
    config: RunConfig,
    request: StatementRequest,
}

impl CliRunner {
    /// Convert the statement arguments up front so bad literals fail before any remote call
    pub fn new(config: RunConfig) -> DynapartResult<Self> {
        let parameters = convert_arguments(&config.args)?;
        let request = StatementRequest::new(config.statement.clone(), parameters)
            .with_consistent_read(config.consistent_read);

        Ok(Self { config, request })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The first-page request, parameters included
    pub fn request(&self) -> &StatementRequest {
        &self.request
    }

    /// Page through results, printing records to `out` and notes plus the summary to `err`
    pub async fn execute<W: Write, E: Write>(
        &self,
        store: &dyn StatementStore,
        cancel: CancellationToken,
        out: W,
        err: E,
    ) -> DynapartResult<PaginationSummary> {
        let started = Instant::now();
        let mut printer = ResultPrinter::new(out, err, &self.config);

        let driver = PaginationDriver::new(store, cancel).with_max_pages(self.config.max_pages);
        let summary = driver.run(self.request.clone(), &mut printer).await?;

        printer.print_summary(started.elapsed(), summary.stop_reason == StopReason::Cancelled)?;
        Ok(summary)
    }
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = RunConfig::from_args(args, io::stdout().is_terminal());
    init_logging(config.verbose);
    colored::control::set_override(stderr_colors());

    let controller = InterruptController::new();
    let _listener = match controller.spawn_listener() {
        Ok(listener) => Some(listener),
        Err(e) => {
            tracing::warn!("could not install signal handlers: {}", e);
            None
        }
    };

    match run(config, &controller).await {
        Ok(summary) => {
            tracing::info!(
                pages = summary.pages,
                items = summary.items,
                reason = ?summary.stop_reason,
                "run finished"
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    }
}

/// Error and progress decoration follows stderr, independent of `--no-colors`
fn stderr_colors() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

async fn run(config: RunConfig, controller: &InterruptController) -> DynapartResult<PaginationSummary> {
    let runner = CliRunner::new(config)?;
    let store = DynamoDbStore::connect(&runner.config().aws).await?;
    runner
        .execute(&store, controller.token(), io::stdout(), io::stderr())
        .await
}
