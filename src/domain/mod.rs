//! Domain layer: activity identity, event records, the bounded feed
//! buffer, and the snapshot broadcast stream.
//!
//! This module contains everything behind the live activity view: typed
//! event records with stable identity, the most-recent-first deduplicated
//! buffer, and the publish/subscribe stream that fans buffer snapshots out
//! to dashboard widgets.

pub mod activity;
pub mod activity_id;
pub mod feed;
pub mod stream;

pub use activity::{Activity, ActivityAction, ActivityKind};
pub use activity_id::ActivityId;
pub use feed::ActivityFeed;
pub use stream::{ActivitySnapshot, ActivityStream};
