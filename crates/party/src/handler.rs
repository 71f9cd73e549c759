//! Per-connection handler: joins the room, then pumps frames both ways.
//!
//! Each upgraded socket gets its own task running two pumps:
//!   1. read pump: socket → decode → room mailbox
//!   2. write pump: session outbox → socket
//!
//! Whichever pump ends first cancels the other, and the session is
//! removed from its room. The room ignores the leave if it already
//! removed the session itself (eviction, grace period, shutdown).

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use party_protocol::{Inbound, ProtocolError, SessionId, decode_event};
use party_room::RoomHandle;
use party_session::{OutboxReceiver, SessionConfig, outbox};

use crate::PartyError;

/// Handles a single upgraded connection from join to close.
pub(crate) async fn handle_socket(
    socket: WebSocket,
    room: RoomHandle,
    username: String,
    config: SessionConfig,
) {
    let session_id = SessionId::new();
    let (tx, rx) = outbox(config.mailbox_capacity);

    if let Err(e) = room.join(session_id, username.clone(), tx).await {
        tracing::debug!(%session_id, error = %e, "join failed");
        return;
    }
    tracing::debug!(%session_id, %username, room_id = %room.id(), "connection joined room");

    let (sink, stream) = socket.split();

    tokio::select! {
        () = write_pump(sink, rx) => {
            tracing::debug!(%session_id, "outbox closed");
        }
        result = read_pump(stream, &room, session_id) => {
            match result {
                Ok(()) => tracing::debug!(%session_id, "connection closed by client"),
                Err(e) => tracing::debug!(%session_id, error = %e, "connection dropped"),
            }
        }
    }

    if let Err(e) = room.leave(session_id).await {
        tracing::debug!(%session_id, error = %e, "leave after disconnect failed");
    }
}

/// Flushes the session's outbox to the socket until the room closes the
/// mailbox or the socket fails.
async fn write_pump(mut sink: SplitSink<WebSocket, Message>, mut rx: OutboxReceiver) {
    while let Some(frame) = rx.recv().await {
        if sink.send(Message::Text(frame.to_string())).await.is_err() {
            return;
        }
    }
    let _ = sink.close().await;
}

/// Reads frames from the socket and forwards decoded events to the room.
///
/// Returns `Ok(())` on a clean close and an error for a protocol
/// violation or a dead socket or room.
async fn read_pump(
    mut stream: SplitStream<WebSocket>,
    room: &RoomHandle,
    session_id: SessionId,
) -> Result<(), PartyError> {
    while let Some(message) = stream.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Binary(_) => {
                return Err(ProtocolError::InvalidMessage("binary frame".into()).into());
            }
            Message::Close(_) => return Ok(()),
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        match decode_event(&text) {
            Ok(Inbound::Event(event)) => {
                tracing::trace!(%session_id, kind = event.kind(), "event received");
                room.client_event(session_id, event).await?;
            }
            Ok(Inbound::Unknown(kind)) => {
                tracing::debug!(%session_id, %kind, "unknown event type ignored");
            }
            Err(e) if e.is_violation() => return Err(e.into()),
            Err(e) => {
                tracing::debug!(%session_id, error = %e, "invalid event ignored");
            }
        }
    }
    Ok(())
}
