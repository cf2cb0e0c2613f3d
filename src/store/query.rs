//! Query and page shapes exchanged with the data accessor.

use serde::{Deserialize, Serialize};

use super::state::StoreState;

/// Backend list query derived from the current store state.
///
/// Built by the data accessor's query builder; the store never interprets
/// the `filters` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery<F> {
    /// Entity-specific filter constraints.
    pub filters: F,
    /// Free-text search; `None` when the search box is empty.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl<F: Clone> ListQuery<F> {
    /// Canonical query derivation: copies filters, search (empty text maps
    /// to `None`), and the pagination window from the state. Most
    /// [`super::DataSource`] implementations delegate to this.
    #[must_use]
    pub fn from_state<I, M>(state: &StoreState<I, M, F>) -> Self {
        Self {
            filters: state.filters.clone(),
            search: if state.search.is_empty() {
                None
            } else {
                Some(state.search.clone())
            },
            page: state.page,
            per_page: state.per_page,
        }
    }
}

/// One page of results as resolved by the data accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this page, in query order.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
    /// Page number (1-indexed) this response covers.
    pub page: u32,
    /// Page size the backend applied.
    pub limit: u32,
    /// Server-reported flag: unfetched pages exist beyond those loaded.
    /// Authoritative; the store never recomputes this locally.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Total page count for the given page size (ceiling division).
    #[must_use]
    pub fn total_pages(&self, per_page: u32) -> u32 {
        let pages = self.total.div_ceil(u64::from(per_page.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
