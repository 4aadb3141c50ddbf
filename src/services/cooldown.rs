//! Access-count cooldown registry
//!
//! Browsers fire duplicate requests for a single user action (prefetch,
//! double-click, retry). The registry remembers when each link was last
//! counted and only lets one increment through per window.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Window within which repeat resolutions of the same link are not counted.
pub const DEFAULT_COOLDOWN_WINDOW: Duration = Duration::from_millis(1000);

/// Entries idle longer than this are eligible for purging.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(300);

/// Registry size that triggers an inline purge.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1000;

/// Tracks the last counted access per link id.
///
/// Owned by the resolver service; construct a fresh one per test for
/// isolation. All methods are safe to call from concurrent requests.
pub struct CooldownRegistry {
    entries: DashMap<String, Instant>,
    window: Duration,
    retention: Duration,
    sweep_threshold: usize,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::with_settings(
            DEFAULT_COOLDOWN_WINDOW,
            DEFAULT_RETENTION,
            DEFAULT_SWEEP_THRESHOLD,
        )
    }

    pub fn with_settings(window: Duration, retention: Duration, sweep_threshold: usize) -> Self {
        Self {
            entries: DashMap::new(),
            window,
            retention,
            sweep_threshold,
        }
    }

    /// Try to claim a counted access for `id`.
    ///
    /// Returns true iff the link has no recorded access or its last counted
    /// access is older than the window. Check and update happen under the
    /// entry's shard lock, so two concurrent claims for the same id can never
    /// both win within one window.
    pub fn try_claim(&self, id: &str) -> bool {
        use dashmap::mapref::entry::Entry;

        let now = Instant::now();

        let claimed = match self.entries.entry(id.to_string()) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) >= self.window {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        };

        if claimed {
            self.sweep_if_needed(now);
        }

        claimed
    }

    /// Inline size-triggered purge; runs on the claim path, not on a timer.
    fn sweep_if_needed(&self, now: Instant) {
        if self.entries.len() <= self.sweep_threshold {
            return;
        }

        let retention = self.retention;
        let before = self.entries.len();
        self.entries
            .retain(|_, last| now.duration_since(*last) < retention);

        debug!(
            "Cooldown registry purged: {} -> {} entries",
            before,
            self.entries.len()
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CooldownRegistry {
    fn default() -> Self {
        Self::new()
    }
}
