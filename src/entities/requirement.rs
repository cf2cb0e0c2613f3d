//! Requirement board records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Activity, ActivityAction, ActivityKind};

/// Workflow state of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    /// Being drafted, not yet submitted.
    Draft,
    /// Submitted for review.
    Submitted,
    /// Accepted for implementation.
    Approved,
    /// Shipped.
    Implemented,
    /// Declined.
    Rejected,
}

/// MoSCoW-style priority of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPriority {
    /// Non-negotiable.
    Must,
    /// Important but deferrable.
    Should,
    /// Nice to have.
    Could,
}

/// One tracked requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Backend record key.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Free-text details.
    pub description: String,
    /// Workflow state.
    pub status: RequirementStatus,
    /// Delivery priority.
    pub priority: RequirementPriority,
    /// Display name of the requester.
    pub requester: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Requirement {
    /// Converts the record into a synthetic historical activity entry for
    /// feed seeding, with a deterministic id.
    #[must_use]
    pub fn seed_activity(&self) -> Activity {
        let action = match self.status {
            RequirementStatus::Rejected => ActivityAction::Closed,
            RequirementStatus::Draft
            | RequirementStatus::Submitted
            | RequirementStatus::Approved
            | RequirementStatus::Implemented => ActivityAction::Created,
        };
        Activity::seeded(
            ActivityKind::Requirement,
            action,
            &self.id,
            self.title.clone(),
            self.requester.clone(),
            self.updated_at,
        )
    }
}

/// Filter constraints for requirement list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementFilters {
    /// Restrict to one workflow state.
    pub status: Option<RequirementStatus>,
    /// Restrict to one priority.
    pub priority: Option<RequirementPriority>,
    /// Restrict to one requester display name.
    pub requester: Option<String>,
}

/// Aggregate requirement counts for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMetrics {
    /// All requirements.
    pub total: u64,
    /// Awaiting review.
    pub submitted: u64,
    /// Accepted for implementation.
    pub approved: u64,
    /// Shipped.
    pub implemented: u64,
    /// Must-have priority, any state.
    pub must_have: u64,
}

impl RequirementMetrics {
    /// Partial aggregate over the given (loaded) requirements only.
    #[must_use]
    pub fn approximate_from(items: &[Requirement]) -> Self {
        let mut metrics = Self::default();
        for requirement in items {
            metrics.total += 1;
            match requirement.status {
                RequirementStatus::Submitted => metrics.submitted += 1,
                RequirementStatus::Approved => metrics.approved += 1,
                RequirementStatus::Implemented => metrics.implemented += 1,
                RequirementStatus::Draft | RequirementStatus::Rejected => {}
            }
            if requirement.priority == RequirementPriority::Must {
                metrics.must_have += 1;
            }
        }
        metrics
    }
}
