//! Periodic grace-period ticker for room actors.
//!
//! Sits in a room's `tokio::select!` loop next to the command mailbox:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = commands.recv() => { /* handle command */ }
//!         now = ticker.tick() => { /* enforce grace periods */ }
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Upper bound of the random delay added to the first tick, so rooms
/// created in the same instant do not all wake together.
const MAX_INITIAL_JITTER_US: u64 = 2_000;

/// Fires once per period, starting one period (plus jitter) after creation.
/// Ticks missed while the room was busy are skipped, not replayed.
#[derive(Debug)]
pub(crate) struct GraceTicker {
    interval: Interval,
}

impl GraceTicker {
    pub(crate) fn new(period: Duration) -> Self {
        let jitter = rand::rng().random_range(0..=MAX_INITIAL_JITTER_US);
        let start = Instant::now() + period + Duration::from_micros(jitter);
        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Waits for the next tick and returns its scheduled instant.
    pub(crate) async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}
