//! Page-by-page list accumulation shared by every list view
//!
//! Notifications, activity logs, bulk-listing search results and dashboard
//! panels all use the same controller; only the [`ListSource`] differs.

mod controller;
mod scroll;
mod source;
mod state;

pub use controller::PaginatedListController;
pub use scroll::ScrollTrigger;
pub use source::{ListSource, PageTransform, RestListSource};
pub use state::{ListError, ListState, ListView, LoadOutcome};
