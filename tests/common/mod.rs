//! Shared test doubles for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use seller_dashboard::models::{ListPage, ListQuery, PageMeta};
use seller_dashboard::pagination::ListSource;
use seller_dashboard::SyncResult;

type Responder<T> = Box<dyn Fn(&ListQuery) -> SyncResult<ListPage<T>> + Send + Sync>;
type Delay = Box<dyn Fn(&ListQuery) -> Duration + Send + Sync>;

/// In-memory list endpoint that records every query it receives
pub struct MockListSource<T> {
    responder: Responder<T>,
    delay: Delay,
    calls: Mutex<Vec<ListQuery>>,
}

impl<T> MockListSource<T> {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ListQuery) -> SyncResult<ListPage<T>> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Box::new(|_| Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Simulated latency per query
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&ListQuery) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    pub fn calls(&self) -> Vec<ListQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl<T: Send + Sync> ListSource<T> for MockListSource<T> {
    async fn fetch_page(&self, query: ListQuery) -> SyncResult<ListPage<T>> {
        self.calls.lock().unwrap().push(query.clone());
        let delay = (self.delay)(&query);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&query)
    }
}

/// Keyword a query was issued for, `"all"` without one
pub fn keyword_of(query: &ListQuery) -> String {
    query
        .get("keyword")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "all".to_string())
}

/// Source with `last_page` pages of `per_page` items named
/// `"{keyword}-{page}-{index}"`
pub fn paged_source(last_page: u32, per_page: usize) -> MockListSource<String> {
    MockListSource::new(move |query| {
        let keyword = keyword_of(query);
        let page = query.page();
        let items = (0..per_page)
            .map(|i| format!("{}-{}-{}", keyword, page, i))
            .collect();
        Ok(ListPage::new(items, PageMeta::new(page, last_page)))
    })
}
