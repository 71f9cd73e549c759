//! Ordered room membership.
//!
//! Sessions live in a map for lookup; a separate join-order list decides
//! host succession and the order in which existing members are announced
//! to a newcomer.

use std::collections::HashMap;

use party_protocol::SessionId;
use party_session::ClientSession;

#[derive(Debug, Default)]
pub(crate) struct Members {
    sessions: HashMap<SessionId, ClientSession>,
    order: Vec<SessionId>,
}

impl Members {
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Appends a session to the end of the join order. A session that is
    /// already present is replaced in place.
    pub(crate) fn insert(&mut self, session: ClientSession) {
        let id = session.id();
        if self.sessions.insert(id, session).is_none() {
            self.order.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: SessionId) -> Option<ClientSession> {
        let session = self.sessions.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(session)
    }

    pub(crate) fn get(&self, id: SessionId) -> Option<&ClientSession> {
        self.sessions.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: SessionId) -> Option<&mut ClientSession> {
        self.sessions.get_mut(&id)
    }

    /// Session ids in join order.
    pub(crate) fn ids(&self) -> Vec<SessionId> {
        self.order.clone()
    }

    /// Sessions in join order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &ClientSession> {
        self.order.iter().filter_map(|id| self.sessions.get(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClientSession> {
        self.sessions.values_mut()
    }

    pub(crate) fn host(&self) -> Option<SessionId> {
        self.iter().find(|s| s.is_host()).map(ClientSession::id)
    }

    /// Makes the earliest-joined member host if nobody holds the role.
    /// Returns the new host's id when an election took place.
    pub(crate) fn elect_host(&mut self) -> Option<SessionId> {
        if self.host().is_some() {
            return None;
        }
        let head = *self.order.first()?;
        self.sessions.get_mut(&head)?.set_host(true);
        Some(head)
    }

    /// Drops every session, closing their mailboxes.
    pub(crate) fn clear(&mut self) {
        self.sessions.clear();
        self.order.clear();
    }
}
