//! Error types for the session layer.

/// Why an outbound frame could not be queued for a session.
///
/// Both cases mean the same thing to the room: this peer is no longer
/// keeping up and is disconnected rather than waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session's mailbox is at capacity (slow or stuck consumer).
    #[error("outbound mailbox is full")]
    MailboxFull,

    /// The session's write pump is gone (socket already closed).
    #[error("outbound mailbox is closed")]
    MailboxClosed,
}
