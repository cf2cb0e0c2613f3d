//! Aggregate metrics with provenance.

use serde::{Deserialize, Serialize};

/// Aggregate metrics tagged with how they were computed.
///
/// Server-computed aggregates cover the whole remote dataset; the
/// client-side fallback only sees the currently loaded page window. The
/// two must never be conflated, so the tag travels with the value and the
/// UI can mark approximate figures as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provenance", content = "value", rename_all = "snake_case")]
pub enum StatsValue<M> {
    /// Dataset-wide aggregate computed by the backend.
    Exact(M),
    /// Partial aggregate computed locally over loaded items only.
    Approximate(M),
}

impl<M> StatsValue<M> {
    /// The metrics value, regardless of provenance.
    #[must_use]
    pub const fn value(&self) -> &M {
        match self {
            Self::Exact(metrics) | Self::Approximate(metrics) => metrics,
        }
    }

    /// Returns `true` for server-computed, dataset-wide aggregates.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}
