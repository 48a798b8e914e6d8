//! Filter inputs and their synchronization with a list

mod coordinator;
mod debounce;
mod value;

pub use coordinator::{CommitAction, CommitPolicy, FilterSyncBuilder, FilterSyncCoordinator};
pub use debounce::Debouncer;
pub use value::FilterValue;
