//! User account records for the administration board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Activity, ActivityAction, ActivityKind};

/// Access role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Full administrative access, including user management.
    Admin,
    /// Can create and mutate incidents and requirements.
    Operator,
    /// Read-only dashboards and reports.
    Viewer,
}

/// One dashboard user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Backend record key.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Name shown in activity entries and assignments.
    pub display_name: String,
    /// Access role.
    pub role: AccountRole,
    /// Deactivated accounts keep their history but cannot sign in.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Converts the record into a synthetic historical activity entry for
    /// feed seeding, with a deterministic id.
    #[must_use]
    pub fn seed_activity(&self) -> Activity {
        Activity::seeded(
            ActivityKind::Account,
            ActivityAction::Created,
            &self.id,
            self.display_name.clone(),
            self.username.clone(),
            self.created_at,
        )
    }
}

/// Filter constraints for account list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilters {
    /// Restrict to one role.
    pub role: Option<AccountRole>,
    /// Restrict to active or deactivated accounts.
    pub active: Option<bool>,
}

/// Aggregate account counts for the administration header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetrics {
    /// All accounts.
    pub total: u64,
    /// Able to sign in.
    pub active: u64,
    /// With administrative access.
    pub admins: u64,
}

impl AccountMetrics {
    /// Partial aggregate over the given (loaded) accounts only.
    #[must_use]
    pub fn approximate_from(items: &[UserAccount]) -> Self {
        let mut metrics = Self::default();
        for account in items {
            metrics.total += 1;
            if account.active {
                metrics.active += 1;
            }
            if account.role == AccountRole::Admin {
                metrics.admins += 1;
            }
        }
        metrics
    }
}
