//! Session events: what clients send to a room and what a room sends back.
//!
//! Every frame on the socket is an envelope `{"type": ..., "data": ...}`.
//! Outbound events are one adjacently tagged enum, so serde writes the
//! envelope for us. Inbound frames are decoded in two steps (envelope
//! first, then the payload named by `type`) so that an unknown type or a
//! bad payload can be told apart from a frame that is not an envelope
//! at all. See [`crate::decode_event`].

use serde::{Deserialize, Serialize};

use crate::{
    ClientState, FinishReport, RoomId, RoomState, SessionId, SongSelection,
};

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// Inbound `type` strings.
pub mod kind {
    pub const ROOM_SONG: &str = "room.song";
    pub const USER_SONG: &str = "room.user.song";
    pub const USER_STATE: &str = "room.user.state";
    pub const ROOM_START: &str = "room.start";
    pub const GAME_READY: &str = "room.game.ready";
    pub const GAME_SCORE: &str = "room.game.score";
    pub const GAME_FINISH: &str = "room.game.finish";
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// The raw inbound envelope. `data` stays an untyped JSON value until the
/// event type is known; it defaults to `null` for payload-less events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A decoded client → room command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// `room.song`: host picks a new chart.
    SetSong(SongSelection),
    /// `room.user.song`: whether the player has the selected chart.
    SongAvailability { has_song: bool },
    /// `room.user.state`: lobby ready toggle.
    SetReady { ready: bool },
    /// `room.start`: host asks to begin the match.
    StartMatch,
    /// `room.game.ready`: the chart finished loading on the client.
    GameReady,
    /// `room.game.score`: live score update.
    Score { score: u32 },
    /// `room.game.finish`: final result.
    Finish(FinishReport),
}

impl ClientEvent {
    /// The wire `type` of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetSong(_) => kind::ROOM_SONG,
            Self::SongAvailability { .. } => kind::USER_SONG,
            Self::SetReady { .. } => kind::USER_STATE,
            Self::StartMatch => kind::ROOM_START,
            Self::GameReady => kind::GAME_READY,
            Self::Score { .. } => kind::GAME_SCORE,
            Self::Finish(_) => kind::GAME_FINISH,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct SongAvailabilityData {
    pub has_song: bool,
}

#[derive(Deserialize)]
pub(crate) struct UserStateData {
    pub state: u32,
}

#[derive(Deserialize)]
pub(crate) struct ScoreData {
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A room → client event.
///
/// `#[serde(tag = "type", content = "data")]` produces the envelope
/// directly:
///
/// ```text
/// {"type": "room.user.state", "data": {"id": "…", "state": 2}}
/// ```
///
/// Variants without payload are empty struct variants so they still
/// carry `"data": {}` like every other frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    /// The receiving player's own identity, sent first after joining.
    #[serde(rename = "self.user")]
    SelfUser { id: SessionId, username: String },

    #[serde(rename = "room.info.id")]
    RoomIdentity { id: RoomId },

    #[serde(rename = "room.info.title")]
    RoomTitle { title: String },

    #[serde(rename = "room.info.host")]
    RoomHost { id: SessionId },

    #[serde(rename = "room.info.song")]
    RoomSong(SongSelection),

    #[serde(rename = "room.state")]
    RoomStateChanged { state: RoomState },

    #[serde(rename = "room.user.join")]
    UserJoin {
        id: SessionId,
        username: String,
        state: ClientState,
    },

    #[serde(rename = "room.user.leave")]
    UserLeave { id: SessionId },

    #[serde(rename = "room.user.state")]
    UserState { id: SessionId, state: ClientState },

    /// The match is being prepared; load the chart.
    #[serde(rename = "room.start")]
    MatchPrepare {},

    /// Every participant has loaded; start playing.
    #[serde(rename = "room.game.start")]
    GameStart {},

    /// Another participant's live score.
    #[serde(rename = "room.game.score")]
    GameScore { id: SessionId, score: u32 },

    /// Another participant's final result.
    #[serde(rename = "room.game.finish")]
    GameFinish(PlayerResult),

    /// The match is over; show the evaluation screen.
    #[serde(rename = "room.eval.show")]
    EvaluationShow {},
}

/// Payload of `room.game.finish` as relayed to peers: the finishing
/// player's id alongside their flattened report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub id: SessionId,
    #[serde(flatten)]
    pub report: FinishReport,
}
