use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::connectors::store_trait::StatementStore;
use crate::utils::{
    error::{DynapartResult, StoreError},
    types::{AttributeValue, Item, StatementPage, StatementRequest, TablePage},
};

/// In-memory store that replays scripted pages and records every request
#[derive(Debug, Default)]
pub struct MockStore {
    pages: Vec<StatementPage>,
    endless: bool,
    table_pages: Vec<TablePage>,
    fail_on_call: Option<usize>,
    call_delay: Option<Duration>,
    cancel_on_call: Option<(usize, CancellationToken)>,
    requests: Mutex<Vec<StatementRequest>>,
    table_requests: Mutex<Vec<Option<String>>>,
}

impl MockStore {
    /// Create a store with no data
    pub fn new() -> Self {
        Self::default()
    }

    /// Script statement pages. Every page but the last carries a continuation token.
    pub fn with_pages(pages: Vec<Vec<Item>>) -> Self {
        let count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, items)| {
                let next_token = (i + 1 < count).then(|| format!("token-{}", i + 1));
                StatementPage::new(items, next_token)
            })
            .collect();

        Self {
            pages,
            ..Self::default()
        }
    }

    /// A store whose every page holds one item and a continuation token
    pub fn endless() -> Self {
        Self {
            endless: true,
            ..Self::default()
        }
    }

    /// Script table name pages, chained through the last evaluated name
    pub fn with_table_pages(mut self, pages: Vec<Vec<&str>>) -> Self {
        let count = pages.len();
        self.table_pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, names)| {
                let table_names: Vec<String> = names.into_iter().map(str::to_string).collect();
                let last_evaluated_table_name = if i + 1 < count {
                    table_names.last().cloned()
                } else {
                    None
                };
                TablePage {
                    table_names,
                    last_evaluated_table_name,
                }
            })
            .collect();
        self
    }

    /// Fail the statement call with the given zero-based index
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Delay every call, simulating network latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Cancel `token` while serving the statement call with the given zero-based index
    pub fn cancelling_on_call(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on_call = Some((call, token));
        self
    }

    /// Every statement request received so far, in order
    pub fn requests(&self) -> Vec<StatementRequest> {
        lock(&self.requests).clone()
    }

    /// Number of statement calls issued
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Start keys of every table listing call, in order
    pub fn table_requests(&self) -> Vec<Option<String>> {
        lock(&self.table_requests).clone()
    }

    /// Build an item `{"id": <id>}`
    pub fn sample_item(id: usize) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::N(id.to_string()));
        item
    }

    fn page_for_call(&self, call: usize) -> StatementPage {
        if self.endless {
            return StatementPage::new(
                vec![Self::sample_item(call + 1)],
                Some(format!("token-{}", call + 1)),
            );
        }
        self.pages.get(call).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl StatementStore for MockStore {
    async fn execute_statement(&self, request: StatementRequest) -> DynapartResult<StatementPage> {
        let call = {
            let mut requests = lock(&self.requests);
            requests.push(request);
            requests.len() - 1
        };

        if let Some(delay) = self.call_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((cancel_call, token)) = &self.cancel_on_call {
            if *cancel_call == call {
                token.cancel();
            }
        }

        if self.fail_on_call == Some(call) {
            return Err(StoreError::ExecuteStatement(format!(
                "ValidationException: mock failure on call {}",
                call
            ))
            .into());
        }

        Ok(self.page_for_call(call))
    }

    async fn list_tables(&self, start_after: Option<String>) -> DynapartResult<TablePage> {
        let call = {
            let mut requests = lock(&self.table_requests);
            requests.push(start_after);
            requests.len() - 1
        };

        if let Some(delay) = self.call_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.table_pages.get(call).cloned().unwrap_or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
