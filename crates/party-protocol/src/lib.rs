//! Wire protocol for the party server.
//!
//! This crate defines the "language" that game bridges and the server
//! speak over a session socket:
//!
//! - **Types** ([`SessionId`], [`RoomId`], [`RoomState`], [`ClientState`],
//!   payload records) shared by every layer above.
//! - **Events** ([`ClientEvent`] inbound, [`ServerEvent`] outbound) and
//!   their `{"type", "data"}` envelope.
//! - **Codec** ([`encode_event`], [`decode_event`]) turning events into
//!   text frames and back.
//!
//! ```text
//! Socket (text frames) → Protocol (events) → Room actor (state)
//! ```
//!
//! It knows nothing about connections, sessions, or rooms.

mod codec;
mod error;
mod events;
mod types;

pub use codec::{Frame, Inbound, decode_event, encode_event};
pub use error::ProtocolError;
pub use events::{ClientEvent, PlayerResult, ServerEvent, kind};
pub use types::{
    ClientState, FinishReport, Judgments, RoomCreated, RoomId, RoomState,
    RoomSummary, SessionId, SongSelection,
};
