//! Activity records for domain lifecycle events.
//!
//! Every create/update/resolve on an incident, requirement, or user account
//! produces an [`Activity`] published through the
//! [`super::ActivityStream`]. Records are UI-facing: title and description
//! are display strings, and the whole record serializes to JSON so
//! snapshots can cross a bridge boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ActivityId;

/// Domain category an activity entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Incident board events.
    Incident,
    /// Requirement board events.
    Requirement,
    /// User account events.
    Account,
}

impl ActivityKind {
    /// Returns the category as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Requirement => "requirement",
            Self::Account => "account",
        }
    }
}

/// Lifecycle verb recorded by an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// The record was created.
    Created,
    /// The record was edited.
    Updated,
    /// The incident was resolved.
    Resolved,
    /// The record was closed.
    Closed,
    /// The record was assigned to a user.
    Assigned,
    /// The record was deleted.
    Deleted,
}

impl ActivityAction {
    /// Returns the verb as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Assigned => "assigned",
            Self::Deleted => "deleted",
        }
    }
}

/// One entry in the activity feed.
///
/// Insertion order in the feed is authoritative for recency; `timestamp`
/// is advisory display metadata supplied by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique entry identifier; duplicate ids are dropped on publish.
    pub id: ActivityId,
    /// Domain category.
    pub kind: ActivityKind,
    /// Lifecycle verb.
    pub action: ActivityAction,
    /// Short human-readable headline.
    pub title: String,
    /// Longer free-text detail line.
    pub description: String,
    /// Event time as reported by the producer.
    pub timestamp: DateTime<Utc>,
    /// Display name of the user who performed the action.
    pub actor: String,
    /// Key of the source record on its own board.
    pub item_id: String,
}

impl Activity {
    /// Creates a live activity entry with a random id, stamped now.
    #[must_use]
    pub fn new(
        kind: ActivityKind,
        action: ActivityAction,
        item_id: impl Into<String>,
        title: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            kind,
            action,
            title: title.into(),
            description: String::new(),
            timestamp: Utc::now(),
            actor: actor.into(),
            item_id: item_id.into(),
        }
    }

    /// Creates a synthetic historical entry with a deterministic id, used
    /// when seeding the feed from pre-existing records. Seeding the same
    /// record twice yields the same id and therefore deduplicates.
    #[must_use]
    pub fn seeded(
        kind: ActivityKind,
        action: ActivityAction,
        item_id: &str,
        title: impl Into<String>,
        actor: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::from_parts(kind.as_str(), item_id, action.as_str()),
            kind,
            action,
            title: title.into(),
            description: String::new(),
            timestamp,
            actor: actor.into(),
            item_id: item_id.to_string(),
        }
    }

    /// Sets the detail line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
