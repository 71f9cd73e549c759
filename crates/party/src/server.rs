//! `PartyServer` builder, HTTP routes, and server loop.
//!
//! Three routes make up the whole HTTP surface:
//!
//! | route | method | effect |
//! |---|---|---|
//! | `/` | GET | JSON list of room summaries |
//! | `/room/create` | POST | creates an empty room, returns `{"ID": ...}` |
//! | `/room/join` | GET | validates the query, then upgrades to a WebSocket |
//!
//! Any other method on these routes is answered with `400 unknown method`.

use std::net::SocketAddr;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use party_protocol::{RoomCreated, RoomId, RoomSummary};
use party_room::{Lobby, RoomConfig};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::PartyError;
use crate::handler::handle_socket;

/// Builder for configuring and starting a party server.
///
/// # Example
///
/// ```rust,ignore
/// let server = PartyServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct PartyServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl PartyServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and sets up an empty lobby.
    pub async fn build(self) -> Result<PartyServer, PartyError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        Ok(PartyServer {
            listener,
            lobby: Lobby::new(self.room_config),
        })
    }
}

impl Default for PartyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound party server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct PartyServer {
    listener: TcpListener,
    lobby: Lobby,
}

impl PartyServer {
    /// Creates a new builder.
    pub fn builder() -> PartyServerBuilder {
        PartyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The lobby this server registers rooms in.
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Serves HTTP and WebSocket traffic until the process is terminated.
    pub async fn run(self) -> Result<(), PartyError> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "party server running");
        axum::serve(self.listener, router(self.lobby)).await?;
        Ok(())
    }
}

/// Builds the HTTP router over `lobby`.
pub fn router(lobby: Lobby) -> Router {
    Router::new()
        .route("/", get(list_rooms).fallback(unknown_method))
        .route("/room/create", post(create_room).fallback(unknown_method))
        .route("/room/join", get(join_room).fallback(unknown_method))
        .with_state(lobby)
}

fn reject(reason: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}

async fn unknown_method() -> Response {
    reject("unknown method")
}

async fn list_rooms(State(lobby): State<Lobby>) -> Json<Vec<RoomSummary>> {
    Json(lobby.summaries().await)
}

async fn create_room(State(lobby): State<Lobby>) -> Json<RoomCreated> {
    let room = lobby.create_room().await;
    Json(RoomCreated { id: room.id() })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JoinParams {
    username: Option<String>,
    room: Option<String>,
}

/// Validates a join request and upgrades it.
///
/// Every rejection happens before the upgrade, so a refused client gets
/// a plain-text `400` instead of a socket that closes immediately.
async fn join_room(
    State(lobby): State<Lobby>,
    Query(params): Query<JoinParams>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    let username = params.username.as_deref().unwrap_or_default().trim();
    if username.is_empty() {
        return reject("missing username");
    }
    if lobby.username_taken(username).await {
        tracing::debug!(%username, "join rejected, username in use");
        return reject("username already exists");
    }

    let room_param = params.room.as_deref().unwrap_or_default().trim();
    if room_param.is_empty() {
        return reject("missing room");
    }
    let room = match room_param.parse::<RoomId>() {
        Ok(id) => lobby.find_room(id).await,
        Err(_) => None,
    };
    let Some(room) = room else {
        tracing::debug!(room = %room_param, "join rejected, unknown room");
        return reject("unknown room");
    };

    let Some(ws) = ws else {
        return reject("expected websocket upgrade");
    };

    let username = username.to_owned();
    let session_config = lobby.config().session.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, room, username, session_config))
}
