//! Command-line configuration for the `party` binary.

use clap::Parser;

/// Multiplayer session server for rhythm-game parties.
#[derive(Debug, Clone, Parser)]
#[command(name = "party", version, about)]
pub struct ServerConfig {
    /// TCP port to listen on. The server binds every interface.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl ServerConfig {
    /// The socket address to bind, `0.0.0.0:<port>`.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
