//! Account activity log

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiClient, Endpoint};
use crate::pagination::{PaginatedListController, RestListSource};

pub const PATH: &str = "/activity-logs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Activity logs come back as a flat paginator: the records and the
/// pagination fields sit side by side.
pub fn source(client: ApiClient) -> RestListSource<ActivityEntry> {
    RestListSource::with_items_key(client, Endpoint::get(PATH), "data")
}

pub fn controller(client: ApiClient) -> Arc<PaginatedListController<ActivityEntry>> {
    Arc::new(PaginatedListController::new(
        "activity_log",
        Arc::new(source(client)),
    ))
}
