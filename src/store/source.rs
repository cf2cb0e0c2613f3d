//! Data-access seam for entity stores.
//!
//! [`DataSource`] is implemented by the external data-access collaborator
//! (REST client, IPC bridge, in-memory fake in tests). The store owns
//! pagination and state transitions; the source owns query building and
//! the actual remote calls. No retry, timeout, or transport concern lives
//! on this side of the seam.

use std::future::Future;

use super::query::{ListQuery, Page};
use super::state::StoreState;
use crate::error::FetchError;

/// External data accessor for one entity type.
pub trait DataSource: Send + Sync {
    /// Entity record type.
    type Item: Clone + PartialEq + Send + Sync + 'static;
    /// Aggregate metrics type.
    type Metrics: Clone + PartialEq + Send + Sync + 'static;
    /// Filter constraint type, opaque to the store.
    type Filters: Clone + PartialEq + Send + Sync + 'static;

    /// Zero-value filters for a fresh store; also what `clear_filters`
    /// restores.
    fn initial_filters(&self) -> Self::Filters;

    /// Zero-value metrics shown before the first aggregate arrives.
    fn initial_metrics(&self) -> Self::Metrics;

    /// Derives the backend query from the current store state. Pure; most
    /// implementations delegate to [`ListQuery::from_state`].
    fn build_query(
        &self,
        state: &StoreState<Self::Item, Self::Metrics, Self::Filters>,
    ) -> ListQuery<Self::Filters>;

    /// Fetches one page of items.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on backend failure; the store records it
    /// on its state and keeps the previously loaded items visible.
    fn list(
        &self,
        query: ListQuery<Self::Filters>,
    ) -> impl Future<Output = Result<Page<Self::Item>, FetchError>> + Send;

    /// Fetches the dataset-wide aggregate. Collaborators without a
    /// metrics endpoint keep this default, which routes the store to the
    /// approximate client-side fallback.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unsupported`] by default; implementations
    /// report backend failures like [`Self::list`] does.
    fn metrics(&self) -> impl Future<Output = Result<Self::Metrics, FetchError>> + Send {
        async { Err(FetchError::Unsupported) }
    }

    /// Local approximation computed over the loaded items only, used when
    /// [`Self::metrics`] is unsupported or fails. `None` (the default)
    /// leaves the previous stats untouched on metrics failure.
    fn approximate_metrics(&self, items: &[Self::Item]) -> Option<Self::Metrics> {
        let _ = items;
        None
    }
}
