//! Per-player score relay throttle.

use std::time::Duration;

use tokio::time::Instant;

/// Admits at most one score update per `interval`.
///
/// The deadline is recomputed from each *accepted* update; rejected
/// updates do not push it back. Instants come from the monotonic Tokio
/// clock, so wall-clock adjustments cannot open or stall the window.
#[derive(Debug, Clone)]
pub struct ScoreThrottle {
    interval: Duration,
    next_allowed: Option<Instant>,
}

impl ScoreThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: None,
        }
    }

    /// Returns `true` (and starts a new window) if an update at `now`
    /// may be relayed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if let Some(next) = self.next_allowed {
            if now < next {
                return false;
            }
        }
        self.next_allowed = Some(now + self.interval);
        true
    }
}
