use async_trait::async_trait;

use crate::utils::{
    error::DynapartResult,
    types::{StatementPage, StatementRequest, TablePage},
};

/// Remote store able to run PartiQL statements one page at a time
#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Execute one page of a statement. `request.next_token` is `None` on the first page.
    async fn execute_statement(&self, request: StatementRequest) -> DynapartResult<StatementPage>;

    /// List one page of table names, starting after `start_after` when set
    async fn list_tables(&self, start_after: Option<String>) -> DynapartResult<TablePage>;
}
