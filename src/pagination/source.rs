//! Page sources: where a controller gets its pages from

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{ApiClient, Endpoint};
use crate::error::SyncResult;
use crate::models::{ListPage, ListQuery};

/// Fetches one page for a query
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch_page(&self, query: ListQuery) -> SyncResult<ListPage<T>>;
}

/// Per-call-site conversion from a raw JSON body to a typed page
pub type PageTransform<T> = Arc<dyn Fn(Value) -> SyncResult<ListPage<T>> + Send + Sync>;

/// A list endpoint on the dashboard API plus its response transform
pub struct RestListSource<T> {
    client: ApiClient,
    endpoint: Endpoint,
    transform: PageTransform<T>,
}

impl<T> RestListSource<T> {
    pub fn new<F>(client: ApiClient, endpoint: Endpoint, transform: F) -> Self
    where
        F: Fn(Value) -> SyncResult<ListPage<T>> + Send + Sync + 'static,
    {
        Self {
            client,
            endpoint,
            transform: Arc::new(transform),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl<T: DeserializeOwned> RestListSource<T> {
    /// Source whose records sit at `items_key` in a standard envelope
    pub fn with_items_key(client: ApiClient, endpoint: Endpoint, items_key: &str) -> Self {
        let items_key = items_key.to_string();
        Self::new(client, endpoint, move |body| {
            ListPage::from_envelope(body, &items_key)
        })
    }
}

#[async_trait]
impl<T: Send + Sync> ListSource<T> for RestListSource<T> {
    async fn fetch_page(&self, query: ListQuery) -> SyncResult<ListPage<T>> {
        let body = self.client.send(&self.endpoint, &query.to_pairs()).await?;
        (self.transform)(body)
    }
}
