use tokio_util::sync::CancellationToken;

use crate::connectors::store_trait::StatementStore;
use crate::utils::{
    error::DynapartResult,
    types::{Item, StatementRequest},
};

/// Convenience command that lists tables instead of running PartiQL
pub const SHOW_TABLES_COMMAND: &str = "SHOW TABLES";

/// True when the statement is exactly the table listing command, in any letter case
pub fn is_show_tables(statement: &str) -> bool {
    statement.eq_ignore_ascii_case(SHOW_TABLES_COMMAND)
}

/// Why a pagination run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last response carried no continuation token
    Exhausted,
    /// The configured page cap was reached
    PageLimit,
    /// The cancellation token fired
    Cancelled,
    /// Whoever reads the records stopped reading
    OutputClosed,
}

/// Driver progress between remote calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Init,
    Running { page: usize, next_token: String },
    Done(StopReason),
}

/// Outcome of a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    pub pages: usize,
    pub items: usize,
    pub stop_reason: StopReason,
}

/// Receives results as pages arrive
pub trait PageSink {
    /// Records of one statement page; `page` is 1-based
    fn on_page(&mut self, page: usize, items: &[Item]) -> DynapartResult<()>;

    /// Names from one table listing page
    fn on_table_names(&mut self, names: &[String]) -> DynapartResult<()>;

    /// Progress notes for verbose output
    fn on_progress(&mut self, _message: &str) -> DynapartResult<()> {
        Ok(())
    }
}

/// Follows continuation tokens until the data runs out, the page cap is
/// hit, or the run is cancelled
pub struct PaginationDriver<'a> {
    store: &'a dyn StatementStore,
    cancel: CancellationToken,
    max_pages: usize,
}

impl<'a> PaginationDriver<'a> {
    /// Create a driver fetching a single page
    pub fn new(store: &'a dyn StatementStore, cancel: CancellationToken) -> Self {
        Self {
            store,
            cancel,
            max_pages: 1,
        }
    }

    /// Cap the number of statement pages; 0 removes the cap
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Run a statement, or list tables when it is the `SHOW TABLES` command
    pub async fn run(
        &self,
        request: StatementRequest,
        sink: &mut dyn PageSink,
    ) -> DynapartResult<PaginationSummary> {
        if is_show_tables(&request.statement) {
            sink.on_progress("execute list tables...")?;
            self.list_tables(sink).await
        } else {
            self.execute_statement(request, sink).await
        }
    }

    /// Page through a statement's results
    pub async fn execute_statement(
        &self,
        request: StatementRequest,
        sink: &mut dyn PageSink,
    ) -> DynapartResult<PaginationSummary> {
        let mut state = DriverState::Init;
        let mut pages = 0;
        let mut items = 0;

        let stop_reason = loop {
            let (page, next_token) = match state {
                DriverState::Init => (1, None),
                DriverState::Running { page, next_token } => (page, Some(next_token)),
                DriverState::Done(reason) => break reason,
            };

            if self.cancel.is_cancelled() {
                state = DriverState::Done(StopReason::Cancelled);
                continue;
            }

            sink.on_progress(&format!("execute statement: {}", request.statement))?;
            tracing::debug!(page, token = ?next_token, "executing statement page");

            let call = StatementRequest {
                next_token,
                ..request.clone()
            };
            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                response = self.store.execute_statement(call) => Some(response),
            };
            let Some(response) = response else {
                state = DriverState::Done(StopReason::Cancelled);
                continue;
            };
            let response = response?;

            pages += 1;
            items += response.items.len();
            if output_closed(sink.on_page(page, &response.items))? {
                state = DriverState::Done(StopReason::OutputClosed);
                continue;
            }

            state = match response.next_token {
                None => {
                    sink.on_progress("no more items")?;
                    DriverState::Done(StopReason::Exhausted)
                }
                Some(_) if self.max_pages != 0 && page >= self.max_pages => {
                    sink.on_progress(&format!("hit max page {}", page))?;
                    DriverState::Done(StopReason::PageLimit)
                }
                Some(next_token) => {
                    sink.on_progress(&format!(
                        "page {} contained {} items, has more items...",
                        page,
                        response.items.len()
                    ))?;
                    DriverState::Running {
                        page: page + 1,
                        next_token,
                    }
                }
            };
        };

        match stop_reason {
            StopReason::Cancelled => tracing::info!(pages, items, "pagination cancelled"),
            StopReason::OutputClosed => tracing::info!(pages, items, "output closed, stopping"),
            _ => {}
        }

        Ok(PaginationSummary {
            pages,
            items,
            stop_reason,
        })
    }

    /// Page through every table name. The page cap does not apply here.
    pub async fn list_tables(&self, sink: &mut dyn PageSink) -> DynapartResult<PaginationSummary> {
        let mut start_after: Option<String> = None;
        let mut pages = 0;
        let mut items = 0;

        let stop_reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                response = self.store.list_tables(start_after.take()) => Some(response),
            };
            let Some(response) = response else {
                break StopReason::Cancelled;
            };
            let response = response?;

            pages += 1;
            items += response.table_names.len();
            if output_closed(sink.on_table_names(&response.table_names))? {
                break StopReason::OutputClosed;
            }

            match response.last_evaluated_table_name {
                Some(name) => start_after = Some(name),
                None => break StopReason::Exhausted,
            }
        };

        Ok(PaginationSummary {
            pages,
            items,
            stop_reason,
        })
    }
}

/// Ok(true) when the sink failed only because its reader went away
fn output_closed(result: DynapartResult<()>) -> DynapartResult<bool> {
    match result {
        Ok(()) => Ok(false),
        Err(e) if e.is_broken_pipe() => Ok(true),
        Err(e) => Err(e),
    }
}
