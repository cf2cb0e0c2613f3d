//! Reactive container for one entity list domain.
//!
//! [`EntityStore`] eliminates the duplicated pagination/filter/search/stat
//! handling across incidents, requirements, and accounts: each entity gets
//! one instance, parameterized by its [`DataSource`]. State lives in a
//! [`tokio::sync::watch`] channel so UI code subscribes for live updates
//! and every mutation delivers a fresh snapshot.
//!
//! Overlapping loads are resolved last-request-wins: each issued fetch
//! carries a generation token and a resolution is applied only while its
//! token is still current, so a slow stale response can never overwrite
//! newer state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::query::Page;
use super::source::DataSource;
use super::state::StoreState;
use super::stats::StatsValue;

/// State snapshot type produced by a store backed by source `S`.
pub type StateOf<S> = StoreState<
    <S as DataSource>::Item,
    <S as DataSource>::Metrics,
    <S as DataSource>::Filters,
>;

/// Reactive container managing list retrieval, pagination, filter/search
/// invalidation, and derived statistics for one entity type.
///
/// Created once per entity at application wiring time, shared behind an
/// [`std::sync::Arc`], and alive for the process lifetime. Fetch failures
/// never propagate to callers: they land in [`StoreState::error`] while
/// the previously loaded items stay visible (stale-but-visible). There is
/// no built-in retry; retrying is an explicit caller action.
pub struct EntityStore<S: DataSource> {
    source: S,
    state_tx: watch::Sender<StateOf<S>>,
    generation: AtomicU64,
}

impl<S: DataSource> EntityStore<S> {
    /// Creates a store around `source` with the given page size.
    #[must_use]
    pub fn new(source: S, per_page: u32) -> Self {
        let initial = StoreState::initial(
            source.initial_filters(),
            source.initial_metrics(),
            per_page,
        );
        let (state_tx, _) = watch::channel(initial);
        Self {
            source,
            state_tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Returns a clone of the current state.
    #[must_use]
    pub fn state(&self) -> StateOf<S> {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to state changes. Every applied mutation delivers a
    /// fresh snapshot; a dropped receiver simply stops observing.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StateOf<S>> {
        self.state_tx.subscribe()
    }

    /// Fetches the current page with the current filters and search.
    pub async fn load(&self) {
        self.run_load(None).await;
    }

    /// Overwrites the filters, then fetches.
    pub async fn load_with(&self, filters: S::Filters) {
        self.run_load(Some(filters)).await;
    }

    /// Fetches the next page and appends it to the loaded items.
    ///
    /// Documented no-op when the server reported no further pages: no
    /// fetch is issued and no state changes.
    pub async fn load_more(&self) {
        if !self.state_tx.borrow().has_more {
            tracing::debug!("load_more ignored: no further pages");
            return;
        }
        self.state_tx
            .send_modify(|state| state.page = state.page.saturating_add(1));
        self.run_load(None).await;
    }

    /// Replaces the filters and reloads from page 1.
    pub async fn set_filters(&self, next: S::Filters) {
        self.state_tx.send_modify(StoreState::reset_pagination);
        self.run_load(Some(next)).await;
    }

    /// Sets the search text and reloads from page 1.
    pub async fn set_search(&self, query: impl Into<String>) {
        let query = query.into();
        self.state_tx.send_modify(|state| {
            state.search = query;
            state.reset_pagination();
        });
        self.run_load(None).await;
    }

    /// Restores the initial filters, clears the search text, and reloads
    /// from page 1. Idempotent: a second call yields identical state.
    pub async fn clear_filters(&self) {
        let initial = self.source.initial_filters();
        self.state_tx.send_modify(|state| {
            state.search.clear();
            state.reset_pagination();
        });
        self.run_load(Some(initial)).await;
    }

    /// Jumps to `page` (clamped to 1-based). Synchronous pagination
    /// control; pair with [`Self::load`] to fetch.
    pub fn set_page(&self, page: u32) {
        self.state_tx
            .send_modify(|state| state.page = page.max(1));
    }

    /// Changes the page size and rewinds to page 1. Synchronous
    /// pagination control; pair with [`Self::load`] to fetch.
    pub fn set_page_size(&self, per_page: u32) {
        self.state_tx.send_modify(|state| {
            state.per_page = per_page.max(1);
            state.reset_pagination();
        });
    }

    /// Marks the store as loading or idle, for external recovery UI.
    pub fn set_loading(&self, loading: bool) {
        self.state_tx.send_modify(|state| state.loading = loading);
    }

    /// Records an error message, for external recovery UI.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state_tx
            .send_modify(|state| state.error = Some(message));
    }

    /// Clears the sticky error. Loaded items are unaffected.
    pub fn clear_error(&self) {
        self.state_tx.send_modify(|state| state.error = None);
    }

    /// Refreshes aggregate metrics: exact when the source provides them,
    /// approximate over the loaded items when it does not or fails.
    pub async fn refresh_stats(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        self.refresh_stats_guarded(generation).await;
    }

    async fn run_load(&self, filters: Option<S::Filters>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
            if let Some(next) = filters {
                state.filters = next;
            }
        });

        let query = self.source.build_query(&self.state_tx.borrow());
        match self.source.list(query).await {
            Ok(page) => {
                if self.is_stale(generation, "list response") {
                    return;
                }
                self.state_tx.send_modify(|state| apply_page(state, page));
                self.refresh_stats_guarded(generation).await;
            }
            Err(err) => {
                if self.is_stale(generation, "list failure") {
                    return;
                }
                self.state_tx.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.to_string());
                });
            }
        }
    }

    async fn refresh_stats_guarded(&self, generation: u64) {
        match self.source.metrics().await {
            Ok(metrics) => {
                if self.is_stale(generation, "metrics response") {
                    return;
                }
                self.state_tx
                    .send_modify(|state| state.stats = StatsValue::Exact(metrics));
            }
            Err(err) => {
                if err.is_unsupported() {
                    tracing::debug!("no metrics endpoint; using approximate aggregates");
                } else {
                    tracing::warn!(error = %err, "metrics fetch failed; falling back to loaded items");
                }
                if self.is_stale(generation, "metrics failure") {
                    return;
                }
                let approximate = {
                    let state = self.state_tx.borrow();
                    self.source.approximate_metrics(&state.items)
                };
                if let Some(metrics) = approximate {
                    self.state_tx
                        .send_modify(|state| state.stats = StatsValue::Approximate(metrics));
                }
            }
        }
    }

    /// Returns `true` (and logs) when a newer load has been issued since
    /// `generation`, in which case the resolution must be discarded.
    fn is_stale(&self, generation: u64, what: &str) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        if current == generation {
            return false;
        }
        tracing::debug!(generation, current, what, "stale resolution discarded");
        true
    }
}

impl<S: DataSource> fmt::Debug for EntityStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Applies a successful page response: replace on page 1, append beyond,
/// pagination math from the server-reported totals.
fn apply_page<I, M, F>(state: &mut StoreState<I, M, F>, page: Page<I>) {
    let total_pages = page.total_pages(state.per_page);
    let Page {
        items,
        total,
        page: page_no,
        has_more,
        ..
    } = page;

    if state.page <= 1 {
        state.items = items;
    } else {
        state.items.extend(items);
    }
    state.total_items = total;
    state.total_pages = total_pages;
    state.has_more = has_more;
    state.loaded_pages = page_no;
    state.loading = false;
    state.error = None;
}
