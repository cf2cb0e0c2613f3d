//! Errors crossing the data-access boundary.
//!
//! [`FetchError`] is the single error type the external data accessor can
//! report to a store. Stores catch every failure at the boundary and record
//! a readable message on their state; no store operation returns an error
//! to its caller.

/// Failure reported by the external data accessor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The backend list or metrics request failed.
    #[error("backend request failed: {0}")]
    Backend(String),

    /// The collaborator does not provide a metrics endpoint. Routes the
    /// store to the approximate client-side aggregate.
    #[error("metrics endpoint not provided")]
    Unsupported,

    /// Invariant violation inside the accessor itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Returns `true` when the error only signals a missing optional
    /// capability rather than a real failure.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}
