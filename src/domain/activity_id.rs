//! Type-safe activity identifier.
//!
//! [`ActivityId`] is a newtype wrapper around [`uuid::Uuid`] providing type
//! safety so that feed entry identifiers cannot be confused with other
//! UUIDs, and giving the feed a stable key for duplicate suppression.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an activity feed entry.
///
/// Live events carry a random v4 identifier minted at publish time.
/// Synthetic events created while seeding history use
/// [`ActivityId::from_parts`], which derives a v5 identifier from the
/// source record, so importing the same history twice deduplicates instead
/// of duplicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(uuid::Uuid);

impl ActivityId {
    /// Creates a new random `ActivityId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Derives a deterministic `ActivityId` (UUID v5) from an event's
    /// domain category, source record key, and lifecycle verb.
    #[must_use]
    pub fn from_parts(kind: &str, item_id: &str, action: &str) -> Self {
        let name = format!("{kind}:{item_id}:{action}");
        Self(uuid::Uuid::new_v5(
            &uuid::Uuid::NAMESPACE_OID,
            name.as_bytes(),
        ))
    }

    /// Creates an `ActivityId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ActivityId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ActivityId> for uuid::Uuid {
    fn from(id: ActivityId) -> Self {
        id.0
    }
}
