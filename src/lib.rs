//! Seller Dashboard Sync Library
//!
//! Client-side data synchronization for the seller dashboard: paginated
//! lists with infinite scroll, filter-driven list resets, and the KYC
//! document-status poller.

pub mod api;
pub mod config;
pub mod downloads;
pub mod error;
pub mod filters;
pub mod kyc;
pub mod lists;
pub mod models;
pub mod notify;
pub mod pagination;

pub use config::Config;
pub use error::{SyncError, SyncResult};
pub use filters::{CommitPolicy, FilterSyncCoordinator, FilterValue};
pub use kyc::KycPoller;
pub use models::{ListPage, ListQuery, PageMeta};
pub use pagination::{ListSource, ListState, ListView, LoadOutcome, PaginatedListController};
