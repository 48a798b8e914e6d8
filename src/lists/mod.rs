//! Concrete dashboard lists: record shapes, endpoints and transforms

pub mod activity;
pub mod bulk_listings;
pub mod notifications;
pub mod sales;
