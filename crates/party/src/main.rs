use clap::Parser;
use party::{PartyError, PartyServer, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), PartyError> {
    init_tracing();

    let config = ServerConfig::parse();
    let server = PartyServer::builder()
        .bind(&config.bind_addr())
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await
}

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}
