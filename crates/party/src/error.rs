//! Unified error type for the party server.

use party_protocol::ProtocolError;
use party_room::RoomError;
use party_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    /// Binding or serving the listener failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Reading from or writing to a WebSocket failed.
    #[error("websocket error: {0}")]
    Transport(#[from] axum::Error),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (mailbox full or closed).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let party_err: PartyError = err.into();
        assert!(matches!(party_err, PartyError::Io(_)));
        assert!(party_err.to_string().contains("port taken"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let party_err: PartyError = err.into();
        assert!(matches!(party_err, PartyError::Protocol(_)));
        assert!(party_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_session_error() {
        let party_err: PartyError = SessionError::MailboxFull.into();
        assert!(matches!(party_err, PartyError::Session(_)));
    }

    #[test]
    fn test_from_room_error() {
        let id = party_protocol::RoomId::new();
        let party_err: PartyError = RoomError::Unavailable(id).into();
        assert!(matches!(party_err, PartyError::Room(_)));
        assert!(party_err.to_string().contains(&id.to_string()));
    }
}
