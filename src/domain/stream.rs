//! Broadcast stream for activity snapshots.
//!
//! [`ActivityStream`] is the publish/subscribe channel between domain
//! action handlers (producers) and dashboard views (consumers). Unlike a
//! raw event channel, subscribers receive whole-buffer
//! [`ActivitySnapshot`]s with latest-value semantics, so a late subscriber
//! immediately observes current history and a dropped consumer simply
//! stops observing.
//!
//! Emissions are compacted two ways: rapid consecutive publishes inside
//! the suppression window collapse into one leading emission plus one
//! trailing flush, and a snapshot structurally identical to the previous
//! one is not emitted at all.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Instant;

use super::feed::ActivityFeed;
use super::{Activity, ActivityAction, ActivityKind};
use crate::config::CoreConfig;

/// Immutable view of the activity buffer at one instant, most recent
/// first, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySnapshot {
    entries: Arc<Vec<Activity>>,
}

impl ActivitySnapshot {
    fn new(entries: Vec<Activity>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// All entries, most recent first.
    #[must_use]
    pub fn all(&self) -> &[Activity] {
        &self.entries
    }

    /// The first `n` entries (the whole buffer when it is shorter).
    #[must_use]
    pub fn recent(&self, n: usize) -> &[Activity] {
        let n = n.min(self.entries.len());
        self.entries.get(..n).unwrap_or(&[])
    }

    /// Number of entries in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivitySnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Mutable state shared by all clones of a stream.
#[derive(Debug)]
struct StreamInner {
    feed: ActivityFeed,
    seeded: bool,
    last_emit: Option<Instant>,
    flush_scheduled: bool,
}

/// Publish/subscribe hub for [`Activity`] events.
///
/// Cheap to clone; all clones share one buffer. Created once at
/// application wiring time and handed to producers and consumers as an
/// injected value, deliberately not a global.
///
/// Internal failures (a poisoned lock, no runtime to defer an emission on)
/// are logged and absorbed; subscribers only ever observe valid,
/// consistent snapshots.
#[derive(Debug, Clone)]
pub struct ActivityStream {
    inner: Arc<Mutex<StreamInner>>,
    snapshot_tx: Arc<watch::Sender<ActivitySnapshot>>,
    suppression: Duration,
}

impl ActivityStream {
    /// Default window during which consecutive emissions are collapsed.
    pub const DEFAULT_SUPPRESSION: Duration = Duration::from_millis(100);

    /// Creates a stream with the default capacity and suppression window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ActivityFeed::DEFAULT_CAPACITY, Self::DEFAULT_SUPPRESSION)
    }

    /// Creates a stream from loaded configuration.
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::with_settings(config.activity_capacity, config.suppression_window())
    }

    /// Creates a stream with an explicit entry cap and suppression window.
    /// A zero window disables emission collapsing.
    #[must_use]
    pub fn with_settings(capacity: usize, suppression: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(ActivitySnapshot::default());
        Self {
            inner: Arc::new(Mutex::new(StreamInner {
                feed: ActivityFeed::new(capacity),
                seeded: false,
                last_emit: None,
                flush_scheduled: false,
            })),
            snapshot_tx: Arc::new(snapshot_tx),
            suppression,
        }
    }

    /// Publishes an activity to all subscribers.
    ///
    /// A duplicate id anywhere in the buffer makes this a silent no-op:
    /// the existing entry keeps its position and contents, and nothing is
    /// emitted. Insertion order is strict publish-call order.
    pub fn publish(&self, activity: Activity) {
        self.with_inner(|stream, inner| {
            let id = activity.id;
            if !inner.feed.publish(activity) {
                tracing::debug!(%id, "duplicate activity dropped");
                return;
            }
            stream.emit_locked(inner);
        });
    }

    /// Drops entries older than `retention_days` and re-emits the
    /// snapshot. When nothing was removed the re-emission is suppressed by
    /// the structural-identity check, so subscribers see no spurious wake.
    pub fn cleanup(&self, retention_days: i64) {
        let cutoff = Utc::now() - chrono::Duration::days(retention_days);
        self.with_inner(|stream, inner| {
            let removed = inner.feed.cleanup_before(cutoff);
            if removed > 0 {
                tracing::info!(removed, retention_days, "expired activity entries");
            }
            stream.emit_locked(inner);
        });
    }

    /// Imports pre-existing records as synthetic historical events,
    /// oldest first so the feed ends up most-recent-first.
    ///
    /// Idempotent: only the first call has any effect; later calls are
    /// no-ops until [`Self::reset`] clears the guard.
    pub fn seed_from_records<I>(&self, records: I)
    where
        I: IntoIterator<Item = Activity>,
    {
        let mut history: Vec<Activity> = records.into_iter().collect();
        history.sort_by_key(|activity| activity.timestamp);

        self.with_inner(|stream, inner| {
            if inner.seeded {
                tracing::debug!("activity history already seeded");
                return;
            }
            inner.seeded = true;
            let mut accepted = 0_usize;
            for activity in history {
                if inner.feed.publish(activity) {
                    accepted += 1;
                }
            }
            tracing::info!(accepted, "seeded activity history");
            stream.emit_locked(inner);
        });
    }

    /// Clears the buffer and the seeded guard and emits an empty
    /// snapshot. Test and debug path.
    pub fn reset(&self) {
        self.with_inner(|stream, inner| {
            inner.feed.clear();
            inner.seeded = false;
            tracing::info!("activity stream reset");
            stream.emit_locked(inner);
        });
    }

    /// Synchronous, non-subscribing read of the current buffer.
    ///
    /// Reads the live feed, not the last emitted snapshot, so entries
    /// published inside a still-open suppression window are visible here
    /// before subscribers observe them.
    #[must_use]
    pub fn snapshot(&self) -> ActivitySnapshot {
        self.with_inner(|_, inner| ActivitySnapshot::new(inner.feed.to_vec()))
    }

    /// Synchronous read of the `n` most recent entries.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Activity> {
        self.with_inner(|_, inner| inner.feed.recent(n))
    }

    /// Subscribes to snapshot emissions. The receiver starts out holding
    /// the most recently emitted snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ActivitySnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Returns the current number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.snapshot_tx.receiver_count()
    }

    /// Records an incident creation.
    pub fn incident_created(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Incident, ActivityAction::Created, item_id, title, actor);
    }

    /// Records an incident edit.
    pub fn incident_updated(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Incident, ActivityAction::Updated, item_id, title, actor);
    }

    /// Records an incident resolution.
    pub fn incident_resolved(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Incident, ActivityAction::Resolved, item_id, title, actor);
    }

    /// Records an incident being closed.
    pub fn incident_closed(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Incident, ActivityAction::Closed, item_id, title, actor);
    }

    /// Records an incident assignment.
    pub fn incident_assigned(&self, item_id: &str, title: &str, actor: &str, assignee: &str) {
        let activity = Activity::new(
            ActivityKind::Incident,
            ActivityAction::Assigned,
            item_id,
            title,
            actor,
        )
        .with_description(format!("Assigned to {assignee}"));
        self.publish(activity);
    }

    /// Records a requirement creation.
    pub fn requirement_created(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Requirement, ActivityAction::Created, item_id, title, actor);
    }

    /// Records a requirement edit.
    pub fn requirement_updated(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Requirement, ActivityAction::Updated, item_id, title, actor);
    }

    /// Records a requirement deletion.
    pub fn requirement_deleted(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Requirement, ActivityAction::Deleted, item_id, title, actor);
    }

    /// Records a user account creation.
    pub fn account_created(&self, item_id: &str, title: &str, actor: &str) {
        self.record(ActivityKind::Account, ActivityAction::Created, item_id, title, actor);
    }

    fn record(
        &self,
        kind: ActivityKind,
        action: ActivityAction,
        item_id: &str,
        title: &str,
        actor: &str,
    ) {
        self.publish(Activity::new(kind, action, item_id, title, actor));
    }

    /// Runs `f` with the lock held, recovering (and logging) if a previous
    /// holder panicked. The stream is never left unusable.
    fn with_inner<R>(&self, f: impl FnOnce(&Self, &mut StreamInner) -> R) -> R {
        match self.inner.lock() {
            Ok(mut guard) => f(self, &mut guard),
            Err(poisoned) => {
                tracing::error!("activity stream lock poisoned; recovering");
                f(self, &mut poisoned.into_inner())
            }
        }
    }

    /// Emits the current buffer, or schedules a trailing flush when inside
    /// the suppression window. Must be called with the lock held.
    fn emit_locked(&self, inner: &mut StreamInner) {
        let now = Instant::now();
        let window_open = inner
            .last_emit
            .is_some_and(|at| now.duration_since(at) < self.suppression);

        if !window_open {
            inner.last_emit = Some(now);
            self.send_snapshot(&inner.feed);
            return;
        }
        if inner.flush_scheduled {
            return;
        }

        let elapsed = inner
            .last_emit
            .map_or(Duration::ZERO, |at| now.duration_since(at));
        let delay = self.suppression.saturating_sub(elapsed);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                inner.flush_scheduled = true;
                let stream = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    stream.flush();
                });
            }
            Err(_) => {
                // No runtime to defer on: emit now rather than lose the update.
                tracing::warn!("no async runtime for deferred emission; emitting immediately");
                inner.last_emit = Some(now);
                self.send_snapshot(&inner.feed);
            }
        }
    }

    /// Trailing edge of the suppression window.
    fn flush(&self) {
        self.with_inner(|stream, inner| {
            if !inner.flush_scheduled {
                return;
            }
            inner.flush_scheduled = false;
            inner.last_emit = Some(Instant::now());
            stream.send_snapshot(&inner.feed);
        });
    }

    /// Pushes a fresh snapshot to subscribers unless it is structurally
    /// identical to the previous one.
    fn send_snapshot(&self, feed: &ActivityFeed) {
        let next = ActivitySnapshot::new(feed.to_vec());
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Default for ActivityStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn immediate() -> ActivityStream {
        ActivityStream::with_settings(50, Duration::ZERO)
    }

    fn event(item_id: &str) -> Activity {
        Activity::new(
            ActivityKind::Incident,
            ActivityAction::Created,
            item_id,
            format!("Incident {item_id}"),
            "oncall",
        )
    }

    #[tokio::test]
    async fn publish_emits_snapshot_to_subscriber() {
        let stream = immediate();
        let mut rx = stream.subscribe();

        stream.publish(event("a"));

        assert!(matches!(rx.has_changed(), Ok(true)));
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.len(), 1);
    }

    #[tokio::test]
    async fn publish_order_is_most_recent_first() {
        let stream = immediate();
        let a = event("a");
        let b = event("b");
        let c = event("c");
        stream.publish(a.clone());
        stream.publish(b.clone());
        stream.publish(c.clone());

        let snap = stream.snapshot();
        assert_eq!(snap.all(), &[c.clone(), b.clone(), a.clone()]);

        // Re-publishing b leaves the buffer unchanged.
        stream.publish(b.clone());
        let snap = stream.snapshot();
        assert_eq!(snap.all(), &[c, b, a]);
    }

    #[tokio::test]
    async fn duplicate_publish_emits_nothing() {
        let stream = immediate();
        let a = event("a");
        stream.publish(a.clone());

        let mut rx = stream.subscribe();
        let _ = rx.borrow_and_update();

        stream.publish(a);
        assert!(matches!(rx.has_changed(), Ok(false)));
    }

    #[tokio::test]
    async fn recent_is_prefix_of_all() {
        let stream = immediate();
        for i in 0..5 {
            stream.publish(event(&format!("e{i}")));
        }

        let snap = stream.snapshot();
        assert_eq!(snap.recent(3), snap.all().get(..3).unwrap_or(&[]));
        assert_eq!(stream.recent(3).len(), 3);

        let small = immediate();
        small.publish(event("only"));
        let snap = small.snapshot();
        assert_eq!(snap.recent(3), snap.all());
    }

    #[tokio::test]
    async fn late_subscriber_sees_current_history() {
        let stream = immediate();
        stream.publish(event("a"));
        stream.publish(event("b"));

        let rx = stream.subscribe();
        assert_eq!(rx.borrow().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_leading_and_trailing_emission() {
        let stream = ActivityStream::with_settings(50, Duration::from_millis(100));
        let mut rx = stream.subscribe();

        let a = event("a");
        let b = event("b");
        let c = event("c");

        stream.publish(a.clone());
        // Leading edge: first publish emits immediately.
        assert!(matches!(rx.has_changed(), Ok(true)));
        assert_eq!(rx.borrow_and_update().all(), &[a.clone()]);

        stream.publish(b.clone());
        stream.publish(c.clone());
        // Inside the window: nothing emitted yet.
        assert!(matches!(rx.has_changed(), Ok(false)));
        // The live buffer still sees everything.
        assert_eq!(stream.snapshot().len(), 3);

        // Cross the window; the trailing flush delivers one compacted view.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(matches!(rx.has_changed(), Ok(true)));
        assert_eq!(rx.borrow_and_update().all(), &[c, b, a]);
    }

    #[tokio::test]
    async fn cleanup_drops_old_entries_and_reemits() {
        let stream = immediate();
        let mut stale = event("old");
        stale.timestamp = Utc::now() - chrono::Duration::days(60);
        let fresh = event("new");
        stream.publish(stale);
        stream.publish(fresh.clone());

        let mut rx = stream.subscribe();
        let _ = rx.borrow_and_update();

        stream.cleanup(30);
        assert!(matches!(rx.has_changed(), Ok(true)));
        assert_eq!(rx.borrow_and_update().all(), &[fresh]);
    }

    #[tokio::test]
    async fn cleanup_without_removals_is_suppressed() {
        let stream = immediate();
        stream.publish(event("recent"));

        let mut rx = stream.subscribe();
        let _ = rx.borrow_and_update();

        stream.cleanup(30);
        assert!(matches!(rx.has_changed(), Ok(false)));
    }

    #[tokio::test]
    async fn seeding_is_idempotent_until_reset() {
        let stream = immediate();
        let base = Utc::now();
        let older = Activity::seeded(
            ActivityKind::Incident,
            ActivityAction::Created,
            "inc-1",
            "First outage",
            "oncall",
            base - chrono::Duration::hours(2),
        );
        let newer = Activity::seeded(
            ActivityKind::Requirement,
            ActivityAction::Created,
            "req-1",
            "Export feature",
            "pm",
            base - chrono::Duration::hours(1),
        );

        // Passed newest-first; seeding sorts oldest-first internally.
        stream.seed_from_records([newer.clone(), older.clone()]);
        let snap = stream.snapshot();
        assert_eq!(snap.all(), &[newer.clone(), older.clone()]);

        // Second call is a no-op even with different records.
        stream.seed_from_records([event("other")]);
        assert_eq!(stream.snapshot().len(), 2);

        stream.reset();
        assert!(stream.snapshot().is_empty());

        stream.seed_from_records([older.clone()]);
        assert_eq!(stream.snapshot().all(), &[older]);
    }

    #[tokio::test]
    async fn typed_helpers_publish_expected_kinds() {
        let stream = immediate();
        stream.incident_created("inc-1", "Checkout down", "rlopez");
        stream.incident_assigned("inc-1", "Checkout down", "rlopez", "mchen");
        stream.requirement_created("req-2", "Dark mode", "pm");
        stream.account_created("u-3", "New operator", "admin");

        let snap = stream.snapshot();
        assert_eq!(snap.len(), 4);
        let kinds: Vec<ActivityKind> = snap.all().iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Account,
                ActivityKind::Requirement,
                ActivityKind::Incident,
                ActivityKind::Incident,
            ]
        );
        let assigned = snap.all().iter().find(|a| a.action == ActivityAction::Assigned);
        let Some(assigned) = assigned else {
            panic!("expected an assignment entry");
        };
        assert_eq!(assigned.description, "Assigned to mchen");
    }

    #[tokio::test]
    async fn receiver_count_tracks_subscribers() {
        let stream = immediate();
        assert_eq!(stream.receiver_count(), 0);
        let rx1 = stream.subscribe();
        assert_eq!(stream.receiver_count(), 1);
        let rx2 = stream.subscribe();
        assert_eq!(stream.receiver_count(), 2);
        drop(rx1);
        drop(rx2);
        assert_eq!(stream.receiver_count(), 0);
    }

    // Producers may run before any runtime exists (early wiring, plain
    // threads). The deferral falls back to immediate emission.
    #[test]
    fn publish_without_runtime_emits_immediately() {
        let stream = ActivityStream::with_settings(50, Duration::from_millis(100));
        stream.publish(event("a"));
        stream.publish(event("b"));
        assert_eq!(stream.snapshot().len(), 2);

        let rx = stream.subscribe();
        assert_eq!(rx.borrow().len(), 2);
    }
}
