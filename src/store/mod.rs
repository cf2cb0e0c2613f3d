//! Generic reactive entity store.
//!
//! One [`EntityStore`] instance manages list retrieval, pagination,
//! filter/search invalidation, and derived statistics for one entity type
//! (incidents, requirements, accounts). The store owns its state machine;
//! the external data accessor is injected through the [`DataSource`] trait.

pub mod entity_store;
pub mod query;
pub mod source;
pub mod state;
pub mod stats;

pub use entity_store::{EntityStore, StateOf};
pub use query::{ListQuery, Page};
pub use source::DataSource;
pub use state::StoreState;
pub use stats::StatsValue;
