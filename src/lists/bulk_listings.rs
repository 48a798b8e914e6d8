//! Bulk-listing event search
//!
//! The search box is debounced; category, date range and the "only with
//! listings" checkbox commit at once.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, Endpoint};
use crate::error::SyncResult;
use crate::filters::{CommitPolicy, FilterSyncCoordinator};
use crate::models::ListPage;
use crate::pagination::{PaginatedListController, RestListSource};

pub const PATH: &str = "/bulk-listings/search";
pub const KEYWORD: &str = "keyword";
pub const CATEGORY: &str = "category";
pub const DATES: &str = "dates";
pub const WITH_LISTINGS: &str = "with_listings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkListingEvent {
    #[serde(alias = "id")]
    pub event_id: u64,
    #[serde(alias = "name")]
    pub event_name: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub listings_count: u32,
}

/// Events arrive wrapped as `{"data": {"events": [...], "meta": {...}}}`
fn transform(body: serde_json::Value) -> SyncResult<ListPage<BulkListingEvent>> {
    ListPage::from_envelope(body, "data.events")
}

pub fn source(client: ApiClient) -> RestListSource<BulkListingEvent> {
    RestListSource::new(client, Endpoint::post(PATH), transform)
}

pub fn controller(client: ApiClient) -> Arc<PaginatedListController<BulkListingEvent>> {
    Arc::new(PaginatedListController::new(
        "bulk_listings",
        Arc::new(source(client)),
    ))
}

pub fn coordinator(
    controller: Arc<PaginatedListController<BulkListingEvent>>,
    search_debounce: Duration,
) -> FilterSyncCoordinator<BulkListingEvent> {
    let debounce_ms = u64::try_from(search_debounce.as_millis()).unwrap_or(u64::MAX);
    FilterSyncCoordinator::builder(controller)
        .policy(KEYWORD, CommitPolicy::debounced(debounce_ms))
        .policy(CATEGORY, CommitPolicy::immediate())
        .policy(DATES, CommitPolicy::immediate())
        .policy(WITH_LISTINGS, CommitPolicy::immediate())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_nested_events() {
        let body = json!({
            "data": {
                "events": [{"id": 9, "name": "Arsenal v Chelsea", "venue": "Emirates"}],
                "meta": {"current_page": 1, "last_page": 1}
            }
        });
        let page = transform(body).unwrap();
        assert_eq!(page.items[0].event_id, 9);
        assert_eq!(page.items[0].listings_count, 0);
        assert!(!page.meta.has_more());
    }
}
