//! Client sessions for the party server.
//!
//! A session is the server's record of one connected player inside one
//! room:
//!
//! 1. **State machine** ([`ClientSession`]): lobby readiness, match
//!    membership, and the per-player match progress.
//! 2. **Score throttle** ([`ScoreThrottle`]): caps live score relays.
//! 3. **Outbound mailbox** ([`outbox`]): the bounded, never-blocking
//!    queue between the room actor and the socket write pump.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room actor (above)  ← sole owner of every ClientSession
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below)  ← SessionId, ClientState, Frame
//! ```

mod config;
mod error;
mod outbox;
mod session;
mod throttle;

pub use config::SessionConfig;
pub use error::SessionError;
pub use outbox::{Outbox, OutboxReceiver, outbox};
pub use session::ClientSession;
pub use throttle::ScoreThrottle;
