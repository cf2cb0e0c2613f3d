//! Incident board records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Activity, ActivityAction, ActivityKind};

/// Workflow state of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Reported, nobody working on it yet.
    Open,
    /// Actively being worked on.
    InProgress,
    /// Fixed, pending confirmation.
    Resolved,
    /// Confirmed and archived.
    Closed,
}

/// Operational impact of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    /// Cosmetic or negligible impact.
    Low,
    /// Degraded but working.
    Medium,
    /// Major feature unavailable.
    High,
    /// Customer-facing outage.
    Critical,
}

/// One tracked incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Backend record key.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Free-text details.
    pub description: String,
    /// Workflow state.
    pub status: IncidentStatus,
    /// Operational impact.
    pub severity: IncidentSeverity,
    /// Display name of the reporter.
    pub reporter: String,
    /// Display name of the current assignee, if any.
    pub assignee: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Converts the record into a synthetic historical activity entry for
    /// feed seeding. The id is deterministic, so seeding the same record
    /// twice deduplicates.
    #[must_use]
    pub fn seed_activity(&self) -> Activity {
        let action = match self.status {
            IncidentStatus::Resolved => ActivityAction::Resolved,
            IncidentStatus::Closed => ActivityAction::Closed,
            IncidentStatus::Open | IncidentStatus::InProgress => ActivityAction::Created,
        };
        Activity::seeded(
            ActivityKind::Incident,
            action,
            &self.id,
            self.title.clone(),
            self.reporter.clone(),
            self.updated_at,
        )
    }
}

/// Filter constraints for incident list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentFilters {
    /// Restrict to one workflow state.
    pub status: Option<IncidentStatus>,
    /// Restrict to one severity.
    pub severity: Option<IncidentSeverity>,
    /// Restrict to one assignee display name.
    pub assignee: Option<String>,
}

/// Aggregate incident counts for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentMetrics {
    /// All incidents.
    pub total: u64,
    /// Currently open.
    pub open: u64,
    /// Actively being worked on.
    pub in_progress: u64,
    /// Resolved, pending confirmation.
    pub resolved: u64,
    /// Critical severity, any state.
    pub critical: u64,
}

impl IncidentMetrics {
    /// Partial aggregate over the given (loaded) incidents only. Used as
    /// the store's approximate fallback; dataset-wide figures come from
    /// the backend.
    #[must_use]
    pub fn approximate_from(items: &[Incident]) -> Self {
        let mut metrics = Self::default();
        for incident in items {
            metrics.total += 1;
            match incident.status {
                IncidentStatus::Open => metrics.open += 1,
                IncidentStatus::InProgress => metrics.in_progress += 1,
                IncidentStatus::Resolved => metrics.resolved += 1,
                IncidentStatus::Closed => {}
            }
            if incident.severity == IncidentSeverity::Critical {
                metrics.critical += 1;
            }
        }
        metrics
    }
}
