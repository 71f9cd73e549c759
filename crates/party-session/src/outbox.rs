//! The outbound mailbox between a room actor and one session's write pump.
//!
//! Single writer (the room), single reader (the pump). The room never
//! waits on it: [`Outbox::try_deliver`] either queues the frame right now
//! or reports why it could not.

use party_protocol::Frame;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::SessionError;

/// Creates a bounded mailbox with the given capacity.
pub fn outbox(capacity: usize) -> (Outbox, OutboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Outbox { tx }, OutboxReceiver { rx })
}

/// Writing half, owned by the room actor through the session.
///
/// Dropping it closes the mailbox: the write pump drains whatever is
/// still queued and then stops, which closes the socket.
#[derive(Debug)]
pub struct Outbox {
    tx: mpsc::Sender<Frame>,
}

impl Outbox {
    /// Queues a frame without waiting.
    ///
    /// # Errors
    /// [`SessionError::MailboxFull`] or [`SessionError::MailboxClosed`].
    pub fn try_deliver(&self, frame: Frame) -> Result<(), SessionError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SessionError::MailboxFull,
            TrySendError::Closed(_) => SessionError::MailboxClosed,
        })
    }
}

/// Reading half, drained by the connection's write pump.
#[derive(Debug)]
pub struct OutboxReceiver {
    rx: mpsc::Receiver<Frame>,
}

impl OutboxReceiver {
    /// Waits for the next frame. `None` once the room closed the mailbox
    /// and every queued frame has been taken.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }

    /// Takes a queued frame without waiting.
    pub fn try_recv(&mut self) -> Option<Frame> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> Frame {
        Frame::from(text)
    }

    #[tokio::test]
    async fn test_deliver_then_receive_in_order() {
        let (tx, mut rx) = outbox(4);
        tx.try_deliver(frame("a")).unwrap();
        tx.try_deliver(frame("b")).unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
    }

    #[test]
    fn test_full_mailbox_reports_full() {
        let (tx, _rx) = outbox(1);
        tx.try_deliver(frame("a")).unwrap();
        assert_eq!(tx.try_deliver(frame("b")), Err(SessionError::MailboxFull));
    }

    #[test]
    fn test_dropped_receiver_reports_closed() {
        let (tx, rx) = outbox(1);
        drop(rx);
        assert_eq!(tx.try_deliver(frame("a")), Err(SessionError::MailboxClosed));
    }

    #[tokio::test]
    async fn test_dropping_outbox_drains_then_ends() {
        let (tx, mut rx) = outbox(2);
        tx.try_deliver(frame("last")).unwrap();
        drop(tx);
        assert_eq!(rx.recv().await.as_deref(), Some("last"));
        assert_eq!(rx.recv().await, None);
    }
}
