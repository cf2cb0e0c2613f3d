//! Reactive store state.

use serde::Serialize;

use super::stats::StatsValue;

/// Complete state of one entity store, as delivered to subscribers.
///
/// `I` is the entity record, `M` its aggregate metrics, `F` the
/// entity-specific filter set (opaque to the store).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreState<I, M, F> {
    /// Loaded items in arrival order; grows across load-more pages and is
    /// replaced wholesale when the query shape changes.
    pub items: Vec<I>,
    /// True only while a fetch is outstanding.
    pub loading: bool,
    /// Last fetch failure, kept until cleared or the next successful load
    /// (stale-but-visible: `items` stay intact alongside it).
    pub error: Option<String>,
    /// Entity-specific filter constraints.
    pub filters: F,
    /// Free-text search, combined with `filters` by the query builder.
    pub search: String,
    /// Current page (1-indexed).
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total matching items reported by the last successful fetch.
    pub total_items: u64,
    /// `ceil(total_items / per_page)` after every successful fetch.
    pub total_pages: u32,
    /// Server-reported: unfetched pages remain beyond the loaded set.
    pub has_more: bool,
    /// Number of pages accumulated in `items`.
    pub loaded_pages: u32,
    /// Aggregate metrics, tagged exact or approximate.
    pub stats: StatsValue<M>,
}

impl<I, M, F> StoreState<I, M, F> {
    /// Fresh pre-first-load state. Stats start as an approximate
    /// zero-value: nothing server-computed exists yet.
    pub(crate) fn initial(filters: F, metrics: M, per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            filters,
            search: String::new(),
            page: 1,
            per_page: per_page.max(1),
            total_items: 0,
            total_pages: 0,
            has_more: true,
            loaded_pages: 0,
            stats: StatsValue::Approximate(metrics),
        }
    }

    /// Rewinds pagination ahead of a query-shape change: back to page 1
    /// with the server given the chance to report more pages again.
    pub(crate) fn reset_pagination(&mut self) {
        self.page = 1;
        self.has_more = true;
    }
}
