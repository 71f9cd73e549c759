//! Room configuration.

use std::time::Duration;

use party_session::SessionConfig;

/// Configuration shared by every room the lobby creates.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How often the room checks its grace periods.
    pub tick_interval: Duration,

    /// How long a prepared match waits for every participant to load
    /// before laggards are disconnected and the match is forced to start.
    pub start_grace: Duration,

    /// How long after the host finishes a song the room waits for the
    /// other participants before disconnecting them and forcing the
    /// match to end.
    pub end_grace: Duration,

    /// Capacity of the room's command mailbox. Read pumps wait when it
    /// is full; the room itself never does.
    pub command_capacity: usize,

    /// Settings for the sessions this room creates.
    pub session: SessionConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            start_grace: Duration::from_secs(15),
            end_grace: Duration::from_secs(15),
            command_capacity: 64,
            session: SessionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.start_grace, Duration::from_secs(15));
        assert_eq!(config.end_grace, Duration::from_secs(15));
        assert_eq!(config.command_capacity, 64);
        assert_eq!(config.session.mailbox_capacity, 256);
    }
}
