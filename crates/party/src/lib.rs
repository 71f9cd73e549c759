//! # Party
//!
//! Multiplayer session server for rhythm-game parties.
//!
//! Players create rooms over HTTP, join them over a WebSocket, pick a
//! song together, and play it in lockstep while the room relays live
//! scores and final results.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use party::prelude::*;
//!
//! # async fn start() -> Result<(), PartyError> {
//! let server = PartyServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::PartyError;
pub use server::{PartyServer, PartyServerBuilder, router};

/// Common imports for running and embedding the server.
pub mod prelude {
    pub use crate::{PartyError, PartyServer, PartyServerBuilder, ServerConfig, router};
    pub use party_protocol::{
        ClientEvent, ClientState, RoomId, RoomState, RoomSummary, ServerEvent, SessionId,
    };
    pub use party_room::{Lobby, RoomConfig, RoomError, RoomHandle};
    pub use party_session::{SessionConfig, SessionError};
}
