//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` always means the problem is in turning frames into
//! events (or back), never in networking or room management.

/// Errors that can occur while encoding or decoding session frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound event failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The frame is not a `{"type", "data"}` envelope at all.
    ///
    /// This is a protocol violation: the connection that sent it is
    /// dropped.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The envelope named a known event but its payload did not match
    /// the schema (wrong field type, negative count, ...).
    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A value passed decoding but is not a legal protocol value.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// Returns `true` if the sender should be disconnected.
    ///
    /// Only a frame that cannot be read as an envelope is a violation;
    /// a bad payload on a recognized event is dropped and the session
    /// keeps going.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<u32>("nope").unwrap_err()
    }

    #[test]
    fn test_only_decode_errors_are_violations() {
        assert!(ProtocolError::Decode(json_error()).is_violation());
        assert!(!ProtocolError::InvalidPayload {
            kind: "room.song",
            source: json_error(),
        }
        .is_violation());
        assert!(!ProtocolError::InvalidMessage("x".into()).is_violation());
    }

    #[test]
    fn test_invalid_payload_message_names_the_event() {
        let err = ProtocolError::InvalidPayload {
            kind: "room.game.score",
            source: json_error(),
        };
        assert!(err.to_string().contains("room.game.score"));
    }
}
