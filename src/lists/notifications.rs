//! Seller notifications feed

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiClient, Endpoint};
use crate::pagination::{PaginatedListController, RestListSource};

pub const PATH: &str = "/notifications";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "read")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub fn source(client: ApiClient) -> RestListSource<Notification> {
    RestListSource::with_items_key(client, Endpoint::get(PATH), "data")
}

pub fn controller(client: ApiClient) -> Arc<PaginatedListController<Notification>> {
    Arc::new(PaginatedListController::new(
        "notifications",
        Arc::new(source(client)),
    ))
}
