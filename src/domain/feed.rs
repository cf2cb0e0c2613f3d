//! Bounded, deduplicated activity buffer.
//!
//! [`ActivityFeed`] is the pure state machine behind
//! [`super::ActivityStream`]: a most-recent-first sequence of [`Activity`]
//! entries with duplicate suppression, capacity eviction, and age-based
//! cleanup. It is kept free of channels and clocks so the ordering rules
//! can be tested in isolation.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::{Activity, ActivityId};

/// Most-recent-first bounded buffer of [`Activity`] entries.
///
/// Invariants: the buffer never exceeds its capacity, and no two entries
/// share an id. Insertion order (publish-call order) is authoritative for
/// recency.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    entries: VecDeque<Activity>,
    capacity: usize,
}

impl ActivityFeed {
    /// Default entry cap for the dashboard feed.
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Creates an empty feed holding at most `capacity` entries.
    /// A zero capacity is bumped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Prepends `activity` and evicts the oldest entries beyond capacity.
    ///
    /// Returns `false` and leaves the buffer untouched when an entry with
    /// the same id is already present anywhere in the buffer: the existing
    /// entry keeps its position and contents.
    pub fn publish(&mut self, activity: Activity) -> bool {
        if self.contains(activity.id) {
            return false;
        }
        self.entries.push_front(activity);
        self.entries.truncate(self.capacity);
        true
    }

    /// Removes entries strictly older than `cutoff`, returning how many
    /// were dropped.
    pub fn cleanup_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.timestamp >= cutoff);
        before - self.entries.len()
    }

    /// Returns `true` if an entry with `id` is present.
    #[must_use]
    pub fn contains(&self, id: ActivityId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Returns the first `n` entries, most recent first (the whole buffer
    /// when it is shorter than `n`).
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Activity> {
        self.entries.iter().take(n).cloned().collect()
    }

    /// Returns the whole buffer, most recent first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Activity> {
        self.entries.iter().cloned().collect()
    }

    /// Returns the number of buffered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the buffer holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry cap.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
