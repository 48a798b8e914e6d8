//! Dashboard "recent sales" panel
//!
//! This endpoint signals the end of data with a null `next_page_url`
//! instead of a `last_page` number.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiClient, Endpoint};
use crate::pagination::{PaginatedListController, RestListSource, ScrollTrigger};

pub const PATH: &str = "/dashboard/sales";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub order_id: String,
    pub event_name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: Option<String>,
}

pub fn source(client: ApiClient) -> RestListSource<SaleRow> {
    RestListSource::with_items_key(client, Endpoint::get(PATH), "data.data")
}

/// Panels are short and scroll inside a card, so a pixel threshold reads
/// better than a fraction
pub fn controller(client: ApiClient) -> Arc<PaginatedListController<SaleRow>> {
    Arc::new(
        PaginatedListController::new("dashboard_sales", Arc::new(source(client)))
            .with_trigger(ScrollTrigger::PixelsFromBottom(40.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListPage;
    use serde_json::json;

    #[test]
    fn test_next_page_url_drives_has_more() {
        let body = json!({
            "data": {
                "current_page": 1,
                "data": [{"order_id": "A-1", "event_name": "Spurs v Leeds", "quantity": 2, "total": 180.0}],
                "next_page_url": "https://api.example.com/dashboard/sales?page=2"
            }
        });
        let page: ListPage<SaleRow> = ListPage::from_envelope(body, "data.data").unwrap();
        assert!(page.meta.has_more());

        let body = json!({
            "data": {"current_page": 2, "data": [], "next_page_url": null}
        });
        let page: ListPage<SaleRow> = ListPage::from_envelope(body, "data.data").unwrap();
        assert!(!page.meta.has_more());
    }
}
