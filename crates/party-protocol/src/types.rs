//! Core wire types: identifiers, state enums, and shared payload records.
//!
//! Everything here is serialized exactly as clients expect to read it.
//! The state enums travel as plain integers, so they go through `u8`
//! with serde's `into`/`try_from` container attributes instead of being
//! tagged by name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Unique identifier of one connected player session.
///
/// `#[serde(transparent)]` keeps the JSON form a bare UUID string, which
/// is what the game bridge compares against when it tracks peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parses the `room` query parameter of a join request.
impl FromStr for RoomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// Lifecycle of a room. One match walks the cycle exactly once:
///
/// ```text
/// Idle ──(ready match)──→ Preparing ──(start match)──→ Playing
///   ↑                                                     │
///   └──────────────────(finish match)─────────────────────┘
/// ```
///
/// The song can only change while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RoomState {
    #[default]
    Idle,
    Preparing,
    Playing,
}

impl From<RoomState> for u8 {
    fn from(state: RoomState) -> Self {
        match state {
            RoomState::Idle => 0,
            RoomState::Preparing => 1,
            RoomState::Playing => 2,
        }
    }
}

impl TryFrom<u8> for RoomState {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Preparing),
            2 => Ok(Self::Playing),
            other => Err(ProtocolError::InvalidMessage(format!(
                "unknown room state {other}"
            ))),
        }
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Preparing => write!(f, "Preparing"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientState
// ---------------------------------------------------------------------------

/// Where a single player is in the lobby/match flow.
///
/// The integer values are part of the wire protocol and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ClientState {
    #[default]
    Idle,
    MissingSong,
    LobbyReady,
    GameLoading,
    GameReady,
    Playing,
    Results,
}

impl From<ClientState> for u8 {
    fn from(state: ClientState) -> Self {
        match state {
            ClientState::Idle => 0,
            ClientState::MissingSong => 1,
            ClientState::LobbyReady => 2,
            ClientState::GameLoading => 3,
            ClientState::GameReady => 4,
            ClientState::Playing => 5,
            ClientState::Results => 6,
        }
    }
}

impl TryFrom<u8> for ClientState {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Idle,
            1 => Self::MissingSong,
            2 => Self::LobbyReady,
            3 => Self::GameLoading,
            4 => Self::GameReady,
            5 => Self::Playing,
            6 => Self::Results,
            other => {
                return Err(ProtocolError::InvalidMessage(format!(
                    "unknown client state {other}"
                )));
            }
        })
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::MissingSong => "MissingSong",
            Self::LobbyReady => "LobbyReady",
            Self::GameLoading => "GameLoading",
            Self::GameReady => "GameReady",
            Self::Playing => "Playing",
            Self::Results => "Results",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// The host's song choice: chart content hash plus difficulty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSelection {
    pub hash: String,
    pub difficulty: u32,
}

/// Judgment counts reported when a player finishes a song.
///
/// Unsigned fields make the "all counts ≥ 0" rule a decode-time check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Judgments {
    pub marvelous: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub boo: u32,
    pub miss: u32,
}

/// A player's final result for the current song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinishReport {
    pub score: u32,
    #[serde(flatten)]
    pub judgments: Judgments,
}

/// One entry of the public room listing (`GET /`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub title: String,
    pub players: Vec<String>,
    pub state: RoomState,
}

/// Response body of `POST /room/create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreated {
    #[serde(rename = "ID")]
    pub id: RoomId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        let id = SessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_room_id_parses_from_display() {
        let id = RoomId::new();
        let parsed: RoomId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-room".parse::<RoomId>().is_err());
    }

    #[test]
    fn test_room_state_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&RoomState::Idle).unwrap(), "0");
        assert_eq!(serde_json::to_string(&RoomState::Preparing).unwrap(), "1");
        assert_eq!(serde_json::to_string(&RoomState::Playing).unwrap(), "2");
    }

    #[test]
    fn test_room_state_rejects_unknown_integer() {
        assert!(serde_json::from_str::<RoomState>("3").is_err());
    }

    #[test]
    fn test_client_state_wire_values() {
        let expected = [
            (ClientState::Idle, 0u8),
            (ClientState::MissingSong, 1),
            (ClientState::LobbyReady, 2),
            (ClientState::GameLoading, 3),
            (ClientState::GameReady, 4),
            (ClientState::Playing, 5),
            (ClientState::Results, 6),
        ];
        for (state, value) in expected {
            assert_eq!(u8::from(state), value);
            assert_eq!(ClientState::try_from(value).unwrap(), state);
        }
        assert!(ClientState::try_from(7).is_err());
    }

    #[test]
    fn test_finish_report_is_flat() {
        let report = FinishReport {
            score: 1000,
            judgments: Judgments {
                marvelous: 5,
                miss: 1,
                ..Judgments::default()
            },
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["score"], 1000);
        assert_eq!(json["marvelous"], 5);
        assert_eq!(json["miss"], 1);
        assert!(json.get("judgments").is_none());
    }

    #[test]
    fn test_room_created_uses_upper_case_key() {
        let id = RoomId::new();
        let json = serde_json::to_value(RoomCreated { id }).unwrap();
        assert_eq!(json["ID"], id.to_string());
    }

    #[test]
    fn test_room_summary_json_shape() {
        let summary = RoomSummary {
            id: RoomId::new(),
            title: "amber-quiet-falcon".into(),
            players: vec!["alice".into()],
            state: RoomState::Preparing,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "amber-quiet-falcon");
        assert_eq!(json["players"], serde_json::json!(["alice"]));
        assert_eq!(json["state"], 1);
    }
}
