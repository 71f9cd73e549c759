//! Lobby: the registry of live rooms.
//!
//! The lobby never looks inside a room. It keeps one [`RoomHandle`] per
//! room and answers every query from the summaries the rooms publish.

use std::collections::HashMap;
use std::sync::Arc;

use party_protocol::{RoomId, RoomSummary};
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::title::generate_title;
use crate::{RoomConfig, RoomHandle};

/// Shared directory of rooms. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Lobby {
    inner: Arc<LobbyInner>,
}

#[derive(Debug)]
struct LobbyInner {
    rooms: Mutex<HashMap<RoomId, RoomHandle>>,
    config: RoomConfig,
}

impl Lobby {
    /// Creates an empty lobby whose rooms use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            inner: Arc::new(LobbyInner {
                rooms: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.inner.config
    }

    /// Spawns a new empty room with a fresh id and a generated title.
    pub async fn create_room(&self) -> RoomHandle {
        let id = RoomId::new();
        let title = generate_title();
        let mut rooms = self.inner.rooms.lock().await;
        let handle = spawn_room(id, title, self.inner.config.clone(), self.clone());
        rooms.insert(id, handle.clone());
        tracing::info!(room_id = %id, title = %handle.title(), "room created");
        handle
    }

    pub async fn find_room(&self, id: RoomId) -> Option<RoomHandle> {
        self.inner.rooms.lock().await.get(&id).cloned()
    }

    /// Shuts a room down and removes it from the registry.
    ///
    /// Closing a room that is not registered is a caller bug.
    pub async fn close_room(&self, id: RoomId) {
        let removed = self.inner.rooms.lock().await.remove(&id);
        match removed {
            Some(handle) => {
                handle.shutdown();
                tracing::info!(room_id = %id, "room closed");
            }
            None => {
                debug_assert!(false, "close_room called for unknown room {id}");
                tracing::error!(room_id = %id, "close_room called for unknown room");
            }
        }
    }

    /// Deregisters a room whose actor is exiting on its own.
    pub(crate) async fn release(&self, id: RoomId) {
        if self.inner.rooms.lock().await.remove(&id).is_some() {
            tracing::info!(room_id = %id, "room closed");
        }
    }

    /// Returns `true` if any room has a member called `username`.
    pub async fn username_taken(&self, username: &str) -> bool {
        self.inner
            .rooms
            .lock()
            .await
            .values()
            .any(|room| room.has_player(username))
    }

    /// Summaries of every live room, for discovery.
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        self.inner
            .rooms
            .lock()
            .await
            .values()
            .map(RoomHandle::summary)
            .collect()
    }

    pub async fn room_count(&self) -> usize {
        self.inner.rooms.lock().await.len()
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
