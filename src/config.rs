//! Core configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with sensible defaults for every key.

use std::time::Duration;

/// Tunables for the dashboard state core.
///
/// Loaded once at startup via [`CoreConfig::from_env`] and passed to the
/// wiring code that builds the stores and the activity stream.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Maximum number of entries retained in the activity feed.
    pub activity_capacity: usize,

    /// Window in milliseconds during which consecutive snapshot emissions
    /// are collapsed into one.
    pub suppression_window_ms: u64,

    /// Activity entries older than this many days are dropped by cleanup.
    pub retention_days: i64,

    /// Default page size for entity stores.
    pub default_per_page: u32,

    /// Upper bound on the page size a caller may request.
    pub max_per_page: u32,
}

impl CoreConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or fails to parse.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            activity_capacity: parse_env("ACTIVITY_CAPACITY", 50),
            suppression_window_ms: parse_env("ACTIVITY_SUPPRESSION_MS", 100),
            retention_days: parse_env("ACTIVITY_RETENTION_DAYS", 30),
            default_per_page: parse_env("STORE_DEFAULT_PER_PAGE", 20),
            max_per_page: parse_env("STORE_MAX_PER_PAGE", 100),
        }
    }

    /// The suppression window as a [`Duration`].
    #[must_use]
    pub const fn suppression_window(&self) -> Duration {
        Duration::from_millis(self.suppression_window_ms)
    }

    /// Clamps a requested page size into the allowed `1..=max_per_page`
    /// range.
    #[must_use]
    pub fn clamped_per_page(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_per_page.max(1))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            activity_capacity: 50,
            suppression_window_ms: 100,
            retention_days: 30,
            default_per_page: 20,
            max_per_page: 100,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CoreConfig::default();
        assert_eq!(config.activity_capacity, 50);
        assert_eq!(config.suppression_window_ms, 100);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.default_per_page, 20);
        assert_eq!(config.max_per_page, 100);
    }

    #[test]
    fn suppression_window_converts_to_duration() {
        let config = CoreConfig::default();
        assert_eq!(config.suppression_window(), Duration::from_millis(100));
    }

    #[test]
    fn clamped_per_page_bounds_both_ends() {
        let config = CoreConfig::default();
        assert_eq!(config.clamped_per_page(0), 1);
        assert_eq!(config.clamped_per_page(20), 20);
        assert_eq!(config.clamped_per_page(500), 100);
    }
}
