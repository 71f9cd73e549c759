//! The client session record and its state machine.
//!
//! A [`ClientSession`] is owned by exactly one room actor. Every method
//! that changes state takes `&mut self`, so the only code able to move a
//! player between states is the room's serialized event loop. Transition
//! methods return `true` when the move was accepted; the caller is then
//! responsible for announcing the new state to the room.
//!
//! ```text
//!   Idle ⇄ MissingSong          (song availability, room Idle)
//!   Idle ⇄ LobbyReady           (ready toggle)
//!   LobbyReady → GameLoading    (room readies the match)
//!   GameLoading → GameReady     (chart loaded)
//!   GameReady → Playing         (room starts the match)
//!   Playing → Results           (player finished)
//!   Results → Idle              (room finishes the match)
//! ```

use party_protocol::{ClientState, Frame, SessionId};
use tokio::time::Instant;

use crate::{Outbox, ScoreThrottle, SessionConfig, SessionError};

/// One connected player inside a room.
#[derive(Debug)]
pub struct ClientSession {
    id: SessionId,
    username: String,
    host: bool,
    in_match: bool,
    state: ClientState,
    outbox: Outbox,
    throttle: ScoreThrottle,
}

impl ClientSession {
    /// Creates a session in the `Idle` state, not host, not in a match.
    pub fn new(
        id: SessionId,
        username: impl Into<String>,
        outbox: Outbox,
        config: &SessionConfig,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            host: false,
            in_match: false,
            state: ClientState::Idle,
            outbox,
            throttle: ScoreThrottle::new(config.score_interval),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_host(&self) -> bool {
        self.host
    }

    pub fn in_match(&self) -> bool {
        self.in_match
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Grants or revokes host rights.
    pub fn set_host(&mut self, host: bool) {
        self.host = host;
    }

    /// Queues an encoded frame for this player without waiting.
    pub fn deliver(&self, frame: Frame) -> Result<(), SessionError> {
        self.outbox.try_deliver(frame)
    }

    // -----------------------------------------------------------------
    // Lobby transitions
    // -----------------------------------------------------------------

    /// Records whether the player has the selected chart.
    ///
    /// Always accepted; the room only forwards this while it is `Idle`.
    pub fn report_song(&mut self, has_song: bool) -> bool {
        self.state = if has_song {
            ClientState::Idle
        } else {
            ClientState::MissingSong
        };
        true
    }

    /// Toggles lobby readiness. Only `Idle` and `LobbyReady` players may
    /// toggle; a player missing the chart can never ready up. Returns
    /// `false` when the state did not change.
    pub fn set_ready(&mut self, ready: bool) -> bool {
        if !matches!(self.state, ClientState::Idle | ClientState::LobbyReady) {
            return false;
        }
        let next = if ready {
            ClientState::LobbyReady
        } else {
            ClientState::Idle
        };
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }

    /// A new song was selected: prior readiness no longer counts.
    pub fn reset_for_new_song(&mut self) {
        self.state = ClientState::MissingSong;
    }

    // -----------------------------------------------------------------
    // Match transitions
    // -----------------------------------------------------------------

    /// Enrolls the player in the match being prepared. Players missing
    /// the chart are left out.
    pub fn begin_loading(&mut self) -> bool {
        if self.state == ClientState::MissingSong {
            return false;
        }
        self.in_match = true;
        self.state = ClientState::GameLoading;
        true
    }

    /// The player's client finished loading the chart.
    pub fn mark_loaded(&mut self) -> bool {
        if self.state != ClientState::GameLoading {
            return false;
        }
        self.state = ClientState::GameReady;
        true
    }

    /// The room started the match for this player.
    pub fn start_playing(&mut self) {
        self.state = ClientState::Playing;
    }

    /// Returns `true` if this player is currently playing in the match.
    pub fn is_playing_in_match(&self) -> bool {
        self.in_match && self.state == ClientState::Playing
    }

    /// Admits a live score update if the player is playing and the
    /// throttle window allows it.
    pub fn accept_score(&mut self, now: Instant) -> bool {
        self.is_playing_in_match() && self.throttle.try_acquire(now)
    }

    /// The player reached the results screen.
    pub fn finish(&mut self) -> bool {
        if !self.is_playing_in_match() {
            return false;
        }
        self.state = ClientState::Results;
        true
    }

    /// The match is over for this player: back to the lobby.
    pub fn end_match(&mut self) {
        self.in_match = false;
        self.state = ClientState::Idle;
    }
}
