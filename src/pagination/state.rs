//! Client-held list state and the render states derived from it

use serde::Serialize;

use crate::error::SyncError;

/// Error shown in the list's error banner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListError {
    pub code: String,
    pub message: String,
}

impl From<&SyncError> for ListError {
    fn from(err: &SyncError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Aggregate owned by a [`PaginatedListController`](super::PaginatedListController)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState<T> {
    /// Records in page order; duplicates across pages are kept
    pub items: Vec<T>,
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<ListError>,
}

impl<T> ListState<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn view(&self) -> ListView {
        ListView::from_state(self)
    }
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            error: None,
        }
    }
}

/// What a list view should render.
///
/// Empty results and the end of the list are regular states, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListView {
    /// Shimmer placeholder while the first page loads
    Loading,
    Empty,
    Populated {
        count: usize,
        loading_more: bool,
        end_of_list: bool,
    },
    /// Error banner with a retry control
    Error { code: String, message: String },
}

impl ListView {
    pub fn from_state<T>(state: &ListState<T>) -> Self {
        if state.is_loading {
            return ListView::Loading;
        }
        if let Some(error) = &state.error {
            return ListView::Error {
                code: error.code.clone(),
                message: error.message.clone(),
            };
        }
        if state.items.is_empty() {
            return ListView::Empty;
        }
        ListView::Populated {
            count: state.items.len(),
            loading_more: state.is_loading_more,
            end_of_list: !state.has_more,
        }
    }
}

/// Result of one controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Guard rejected the call; no fetch was issued
    Skipped,
    /// First page replaced the collection
    Replaced(usize),
    /// Next page was appended
    Appended(usize),
    /// A newer request superseded this one; its response was dropped
    Discarded,
    /// The fetch failed and the error is now in the state
    Failed,
}

impl LoadOutcome {
    pub fn issued_fetch(&self) -> bool {
        !matches!(self, LoadOutcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_states() {
        let mut state: ListState<u32> = ListState::default();
        assert_eq!(state.view(), ListView::Empty);

        state.is_loading = true;
        assert_eq!(state.view(), ListView::Loading);

        state.is_loading = false;
        state.items = vec![1, 2, 3];
        state.has_more = false;
        assert_eq!(
            state.view(),
            ListView::Populated {
                count: 3,
                loading_more: false,
                end_of_list: true
            }
        );

        state.error = Some(ListError::from(&SyncError::Network("offline".to_string())));
        assert!(matches!(state.view(), ListView::Error { code, .. } if code == "NETWORK_ERROR"));
    }
}
