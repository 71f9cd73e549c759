//! Error types for the room layer.

use party_protocol::RoomId;

/// Errors that can occur when talking to a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's event loop has stopped; its mailbox is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
