//! JSON codec for session frames.
//!
//! Outbound events are encoded once per broadcast into a shared
//! [`Frame`], so fanning one event out to a full room costs a single
//! serialization and a reference-count bump per recipient.
//!
//! Inbound frames are decoded with one strategy for every event type:
//! parse the envelope, then decode `data` into the payload the `type`
//! names.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::events::{
    InboundEnvelope, ScoreData, SongAvailabilityData, UserStateData, kind,
};
use crate::{ClientEvent, FinishReport, ProtocolError, ServerEvent, SongSelection};

/// An encoded outbound frame, cheap to clone across recipients.
pub type Frame = Arc<str>;

/// Result of decoding one inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A recognized event with a valid payload.
    Event(ClientEvent),
    /// A well-formed envelope whose `type` this server does not handle.
    Unknown(String),
}

/// Encodes an outbound event into a text frame.
pub fn encode_event(event: &ServerEvent) -> Result<Frame, ProtocolError> {
    serde_json::to_string(event)
        .map(Frame::from)
        .map_err(ProtocolError::Encode)
}

/// Decodes one inbound text frame.
///
/// # Errors
/// - [`ProtocolError::Decode`] if the text is not an envelope (a protocol
///   violation).
/// - [`ProtocolError::InvalidPayload`] if the envelope names a known event
///   whose `data` does not fit its schema.
pub fn decode_event(text: &str) -> Result<Inbound, ProtocolError> {
    let envelope: InboundEnvelope =
        serde_json::from_str(text).map_err(ProtocolError::Decode)?;
    let data = envelope.data;

    let event = match envelope.kind.as_str() {
        kind::ROOM_SONG => {
            ClientEvent::SetSong(payload::<SongSelection>(kind::ROOM_SONG, data)?)
        }
        kind::USER_SONG => {
            let SongAvailabilityData { has_song } =
                payload(kind::USER_SONG, data)?;
            ClientEvent::SongAvailability { has_song }
        }
        kind::USER_STATE => {
            let UserStateData { state } = payload(kind::USER_STATE, data)?;
            ClientEvent::SetReady { ready: state != 0 }
        }
        kind::ROOM_START => ClientEvent::StartMatch,
        kind::GAME_READY => ClientEvent::GameReady,
        kind::GAME_SCORE => {
            let ScoreData { score } = payload(kind::GAME_SCORE, data)?;
            ClientEvent::Score { score }
        }
        kind::GAME_FINISH => {
            ClientEvent::Finish(payload::<FinishReport>(kind::GAME_FINISH, data)?)
        }
        _ => return Ok(Inbound::Unknown(envelope.kind)),
    };

    Ok(Inbound::Event(event))
}

fn payload<T: DeserializeOwned>(
    kind: &'static str,
    data: serde_json::Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(data)
        .map_err(|source| ProtocolError::InvalidPayload { kind, source })
}
