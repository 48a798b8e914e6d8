//! Filter synchronization
//!
//! Merges independent filter inputs into one [`ListQuery`] and decides when
//! the merged result should reset the list. Text inputs are usually
//! debounced; selects, date ranges and checkboxes commit at once. Which keys
//! are debounced is plain data ([`CommitPolicy`] per key).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use super::debounce::Debouncer;
use super::value::FilterValue;
use crate::models::{ListQuery, QueryValue};
use crate::pagination::{ListView, LoadOutcome, PaginatedListController};

/// How changes to one filter key are committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitPolicy {
    /// Quiet period before committing; `0` commits immediately
    pub debounce_ms: u64,
}

impl CommitPolicy {
    pub fn immediate() -> Self {
        Self { debounce_ms: 0 }
    }

    pub fn debounced(debounce_ms: u64) -> Self {
        Self { debounce_ms }
    }

    pub fn delay(&self) -> Option<Duration> {
        (self.debounce_ms > 0).then(|| Duration::from_millis(self.debounce_ms))
    }
}

/// What a policy-driven change ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// A debounced commit is waiting for the quiet period
    Scheduled,
    /// The list was reset
    Committed(LoadOutcome),
    /// The normalized query did not change; no reset
    Unchanged,
}

/// Builder for [`FilterSyncCoordinator`]
pub struct FilterSyncBuilder<T> {
    controller: Arc<PaginatedListController<T>>,
    policies: HashMap<String, CommitPolicy>,
    fixed: BTreeMap<String, QueryValue>,
}

impl<T> FilterSyncBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn policy(mut self, key: impl Into<String>, policy: CommitPolicy) -> Self {
        self.policies.insert(key.into(), policy);
        self
    }

    /// Parameter sent with every query regardless of filters (e.g. the tab)
    pub fn fixed_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.fixed.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> FilterSyncCoordinator<T> {
        FilterSyncCoordinator {
            inner: Arc::new(Inner {
                controller: self.controller,
                policies: self.policies,
                fixed: self.fixed,
                filters: Mutex::new(BTreeMap::new()),
                debouncer: Debouncer::new(),
            }),
        }
    }
}

struct Inner<T> {
    controller: Arc<PaginatedListController<T>>,
    policies: HashMap<String, CommitPolicy>,
    fixed: BTreeMap<String, QueryValue>,
    filters: Mutex<BTreeMap<String, FilterValue>>,
    debouncer: Debouncer,
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn filters(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, FilterValue>> {
        self.filters.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn store(&self, key: String, value: FilterValue) {
        let mut filters = self.filters();
        if value == FilterValue::Cleared {
            filters.remove(&key);
        } else {
            filters.insert(key, value);
        }
    }

    fn build_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        for (key, value) in &self.fixed {
            query.insert(key.clone(), value.clone());
        }
        for (key, value) in self.filters().iter() {
            value.apply_to(&mut query, key);
        }
        query
    }

    fn policy_for(&self, key: &str) -> CommitPolicy {
        self.policies.get(key).copied().unwrap_or_default()
    }

    /// Whether the list already shows `query` without an error. A discarded
    /// list has no query, so it never counts as settled.
    async fn is_settled_on(&self, query: &ListQuery) -> bool {
        self.controller.last_query().await.as_ref() == Some(query)
            && !matches!(self.controller.view(), ListView::Error { .. })
    }

    /// Build the query and reset the list. With `force == false` the reset
    /// is skipped when the list is already settled on the same query.
    async fn commit(&self, force: bool) -> CommitAction {
        let query = self.build_query();
        if !force && self.is_settled_on(&query).await {
            tracing::debug!(list = %self.controller.name(), "Filters unchanged, skipping reset");
            return CommitAction::Unchanged;
        }
        tracing::debug!(list = %self.controller.name(), params = ?query.params(), "Committing filters");
        CommitAction::Committed(self.controller.reset(query).await)
    }

    /// Commit from an input event; a pending debounced commit is superseded
    async fn commit_now(&self, force: bool) -> CommitAction {
        self.debouncer.cancel();
        self.commit(force).await
    }
}

/// Merges filter inputs into list resets
pub struct FilterSyncCoordinator<T> {
    inner: Arc<Inner<T>>,
}

impl<T> FilterSyncCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn builder(controller: Arc<PaginatedListController<T>>) -> FilterSyncBuilder<T> {
        FilterSyncBuilder {
            controller,
            policies: HashMap::new(),
            fixed: BTreeMap::new(),
        }
    }

    /// Coordinator whose `search_key` is debounced by `debounce` and whose
    /// other keys commit immediately
    pub fn with_search(
        controller: Arc<PaginatedListController<T>>,
        search_key: &str,
        debounce: Duration,
    ) -> Self {
        let debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        Self::builder(controller)
            .policy(search_key, CommitPolicy::debounced(debounce_ms))
            .build()
    }

    pub fn controller(&self) -> &Arc<PaginatedListController<T>> {
        &self.inner.controller
    }

    /// Update one filter without fetching
    pub fn set_filter_value(&self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.inner.store(key.into(), value.into());
    }

    /// Normalized query for the current filters
    pub fn query(&self) -> ListQuery {
        self.inner.build_query()
    }

    /// Filters that currently contribute to the query (the filter pills)
    pub fn active_filters(&self) -> Vec<(String, FilterValue)> {
        self.inner
            .filters()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn has_pending_commit(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Build the query from the current filters and reset the list.
    ///
    /// Cancels a pending debounced commit, since the query built here already
    /// contains the latest text.
    pub async fn commit(&self) -> LoadOutcome {
        match self.inner.commit_now(true).await {
            CommitAction::Committed(outcome) => outcome,
            CommitAction::Scheduled | CommitAction::Unchanged => LoadOutcome::Skipped,
        }
    }

    /// Input-driven change, committed according to the key's policy.
    ///
    /// A debounced key reschedules its commit on every change, except that
    /// clearing it commits straight away.
    pub async fn apply_change(
        &self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> CommitAction {
        let key = key.into();
        let value = value.into();
        let policy = self.inner.policy_for(&key);
        let cleared = value.is_empty();
        self.inner.store(key, value);

        match policy.delay() {
            Some(delay) if !cleared => {
                let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
                self.inner.debouncer.schedule(delay, async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.commit(false).await;
                    }
                });
                CommitAction::Scheduled
            }
            _ => self.inner.commit_now(false).await,
        }
    }

    /// Several keys changed in the same tick: one query, one reset
    pub async fn apply_changes<I, K, V>(&self, changes: I) -> CommitAction
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FilterValue>,
    {
        for (key, value) in changes {
            self.inner.store(key.into(), value.into());
        }
        self.inner.commit_now(false).await
    }

    /// Remove one filter pill; same as committing with the key removed
    pub async fn clear_filter(&self, key: &str) -> CommitAction {
        self.inner.store(key.to_string(), FilterValue::Cleared);
        self.inner.commit_now(false).await
    }

    /// Remove every filter with a single reset
    pub async fn clear_all(&self) -> CommitAction {
        self.inner.filters().clear();
        self.inner.commit_now(false).await
    }
}
