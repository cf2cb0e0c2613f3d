//! Dashboard entity types: incidents, requirements, and user accounts.
//!
//! Each entity module carries the record struct, its filter set, and its
//! aggregate metrics (with the partial client-side aggregator the stores
//! fall back to when no metrics endpoint exists), plus conversions into
//! feed activity for history seeding.

pub mod account;
pub mod incident;
pub mod requirement;

pub use account::{AccountFilters, AccountMetrics, AccountRole, UserAccount};
pub use incident::{Incident, IncidentFilters, IncidentMetrics, IncidentSeverity, IncidentStatus};
pub use requirement::{
    Requirement, RequirementFilters, RequirementMetrics, RequirementPriority, RequirementStatus,
};
