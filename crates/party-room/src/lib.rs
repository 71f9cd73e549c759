//! Room actors and the lobby registry.
//!
//! Each room runs as an isolated Tokio task that owns its members and
//! drives the match lifecycle (`Idle → Preparing → Playing → Idle`),
//! including the grace periods that keep one slow player from stalling
//! everyone else.
//!
//! # Key types
//!
//! - [`Lobby`] creates, finds, and closes rooms
//! - [`RoomHandle`] sends commands to a running room actor
//! - [`RoomConfig`] holds timing and mailbox settings

mod config;
mod error;
mod lobby;
mod members;
mod room;
mod ticker;
mod title;

pub use config::RoomConfig;
pub use error::RoomError;
pub use lobby::Lobby;
pub use room::RoomHandle;
pub use title::generate_title;
