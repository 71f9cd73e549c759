//! Per-session tunables.

use std::time::Duration;

/// Configuration applied to every client session a room creates.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of each session's outbound mailbox. A session whose
    /// mailbox fills up is evicted.
    pub mailbox_capacity: usize,

    /// Minimum spacing between two relayed score updates from the same
    /// player. Updates arriving sooner are dropped.
    pub score_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 256,
            score_interval: Duration::from_secs(1),
        }
    }
}
