//! Paginated list controller
//!
//! Accumulates a list page by page. Two mutators compete for the same state:
//! `reset` (filters changed, start over from page 1) and `load_more`
//! (scrolled near the bottom, append the next page). Every issued request
//! captures a generation number; a completion whose generation is no longer
//! current is dropped, so a slow `load_more` can never clobber a newer reset.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use super::scroll::ScrollTrigger;
use super::source::ListSource;
use super::state::{ListError, ListState, ListView, LoadOutcome};
use crate::models::ListQuery;

struct Fence {
    generation: u64,
    /// Query of the last reset, page 1
    query: Option<ListQuery>,
}

/// Controller for one logical list (a tab, a panel, a search result)
pub struct PaginatedListController<T> {
    name: String,
    source: Arc<dyn ListSource<T>>,
    trigger: ScrollTrigger,
    fence: Mutex<Fence>,
    state: watch::Sender<ListState<T>>,
}

impl<T> PaginatedListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, source: Arc<dyn ListSource<T>>) -> Self {
        let (state, _rx) = watch::channel(ListState::default());
        Self {
            name: name.into(),
            source,
            trigger: ScrollTrigger::default(),
            fence: Mutex::new(Fence {
                generation: 0,
                query: None,
            }),
            state,
        }
    }

    pub fn with_trigger(mut self, trigger: ScrollTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> ListView {
        self.state.borrow().view()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    /// Query of the most recent reset
    pub async fn last_query(&self) -> Option<ListQuery> {
        self.fence.lock().await.query.clone()
    }

    /// Replace the list with page 1 of `query`
    pub async fn reset(&self, query: ListQuery) -> LoadOutcome {
        let query = query.with_page(1);
        let generation = {
            let mut fence = self.fence.lock().await;
            fence.generation += 1;
            fence.query = Some(query.clone());
            self.state.send_modify(|s| {
                s.items.clear();
                s.error = None;
                s.current_page = 1;
                s.has_more = true;
                s.is_loading = true;
                s.is_loading_more = false;
            });
            fence.generation
        };

        tracing::debug!(list = %self.name, generation, params = ?query.params(), "Resetting list");

        let result = self.source.fetch_page(query).await;

        let fence = self.fence.lock().await;
        if fence.generation != generation {
            tracing::debug!(list = %self.name, generation, "Dropping superseded reset response");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                let current_page = page.meta.current_page.max(1);
                let has_more = page.meta.has_more_after(current_page);
                self.state.send_modify(|s| {
                    s.items = page.items;
                    s.current_page = current_page;
                    s.has_more = has_more;
                    s.is_loading = false;
                });
                tracing::debug!(list = %self.name, count, has_more, "List reset");
                LoadOutcome::Replaced(count)
            }
            Err(err) => {
                tracing::error!(list = %self.name, error = %err, "Failed to load list");
                self.state.send_modify(|s| {
                    s.error = Some(ListError::from(&err));
                    s.is_loading = false;
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Append the next page of the last query.
    ///
    /// No-op while another page or a reset is loading, after the last page,
    /// while an error is shown, or before the first reset.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, query) = {
            let mut fence = self.fence.lock().await;
            let next_page = {
                let s = self.state.borrow();
                if s.is_loading_more || !s.has_more || s.is_loading || s.error.is_some() {
                    return LoadOutcome::Skipped;
                }
                s.current_page + 1
            };
            let Some(base) = fence.query.as_ref() else {
                return LoadOutcome::Skipped;
            };
            let query = base.with_page(next_page);
            fence.generation += 1;
            self.state.send_modify(|s| s.is_loading_more = true);
            (fence.generation, query)
        };

        let requested = query.page();
        tracing::debug!(list = %self.name, generation, page = requested, "Loading next page");

        let result = self.source.fetch_page(query).await;

        let fence = self.fence.lock().await;
        if fence.generation != generation {
            tracing::debug!(list = %self.name, generation, "Dropping superseded page response");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                let current_page = page.meta.current_page.max(requested);
                let has_more = page.meta.has_more_after(current_page);
                self.state.send_modify(|s| {
                    s.items.extend(page.items);
                    s.current_page = s.current_page.max(current_page);
                    s.has_more = has_more;
                    s.is_loading_more = false;
                });
                LoadOutcome::Appended(count)
            }
            Err(err) => {
                tracing::error!(list = %self.name, page = requested, error = %err, "Failed to load next page");
                self.state.send_modify(|s| {
                    s.error = Some(ListError::from(&err));
                    s.is_loading_more = false;
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Scroll handler: loads the next page once the viewport nears the bottom
    pub async fn on_scroll_proximity(
        &self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> LoadOutcome {
        if !self
            .trigger
            .is_near_bottom(scroll_top, scroll_height, client_height)
        {
            return LoadOutcome::Skipped;
        }
        {
            let s = self.state.borrow();
            if s.is_loading || s.is_loading_more {
                return LoadOutcome::Skipped;
            }
        }
        self.load_more().await
    }

    /// Re-run the last reset; backs the retry control of the error banner
    pub async fn retry(&self) -> LoadOutcome {
        match self.last_query().await {
            Some(query) => self.reset(query).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Drop everything, e.g. when the owning tab is closed. In-flight
    /// responses are ignored when they arrive.
    pub async fn discard(&self) {
        let mut fence = self.fence.lock().await;
        fence.generation += 1;
        fence.query = None;
        self.state.send_replace(ListState::default());
        tracing::debug!(list = %self.name, "List discarded");
    }
}
