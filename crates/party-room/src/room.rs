//! Room actor: an isolated Tokio task that owns one multiplayer session.
//!
//! Every piece of room state (membership, match lifecycle, each player's
//! session record) lives inside the actor. The outside world talks to it
//! through a [`RoomHandle`]: commands go in over a bounded mpsc mailbox,
//! and a summary of the room comes back out over a `watch` channel after
//! every processed command.
//!
//! Outbound events are encoded once per broadcast and pushed into each
//! recipient's mailbox without waiting. A recipient whose mailbox is full
//! or closed is queued for eviction and removed through the normal leave
//! path once the current command has been handled.

use std::sync::Arc;

use party_protocol::{
    ClientEvent, ClientState, FinishReport, Frame, PlayerResult, RoomId, RoomState,
    RoomSummary, ServerEvent, SessionId, SongSelection, encode_event,
};
use party_session::{ClientSession, Outbox};
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::Instant;

use crate::members::Members;
use crate::ticker::GraceTicker;
use crate::{Lobby, RoomConfig, RoomError};

/// Commands sent to a room actor through its mailbox.
#[derive(Debug)]
pub(crate) enum RoomCommand {
    /// Admit a validated connection as a new member.
    Join {
        id: SessionId,
        username: String,
        outbox: Outbox,
    },

    /// Remove a member. Ignored if the member is already gone.
    Leave { id: SessionId },

    /// Deliver an event to every member.
    Broadcast(ServerEvent),

    /// A decoded event from one member's socket.
    Client { id: SessionId, event: ClientEvent },
}

/// Handle to a running room actor.
///
/// Cheap to clone. The [`Lobby`] keeps one per room and every connection
/// handler holds a clone for the lifetime of its socket.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    id: RoomId,
    title: Arc<str>,
    commands: mpsc::Sender<RoomCommand>,
    summary: watch::Receiver<RoomSummary>,
    shutdown: Arc<Notify>,
}

impl RoomHandle {
    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Asks the room to admit a new member. Frames for the member are
    /// pushed into `outbox`; the room closes it when the member leaves.
    pub async fn join(
        &self,
        id: SessionId,
        username: impl Into<String>,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Join {
            id,
            username: username.into(),
            outbox,
        })
        .await
    }

    /// Asks the room to remove a member.
    pub async fn leave(&self, id: SessionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave { id }).await
    }

    /// Forwards a decoded client event from member `id`.
    pub async fn client_event(
        &self,
        id: SessionId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Client { id, event }).await
    }

    /// Queues an event for every member, delivered in mailbox order.
    pub async fn broadcast(&self, event: ServerEvent) -> Result<(), RoomError> {
        self.send(RoomCommand::Broadcast(event)).await
    }

    /// The summary the room published after its last command.
    pub fn summary(&self) -> RoomSummary {
        self.summary.borrow().clone()
    }

    /// Returns `true` if a current member uses `username`.
    pub fn has_player(&self, username: &str) -> bool {
        self.summary.borrow().players.iter().any(|p| p == username)
    }

    /// Signals the actor to drop every member and exit.
    pub(crate) fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RoomError::Unavailable(self.id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    id: RoomId,
    title: String,
    state: RoomState,
    song: Option<SongSelection>,
    members: Members,
    match_start: Option<Instant>,
    match_end: Option<Instant>,
    /// Members whose mailbox rejected a frame, removed after the
    /// current command.
    evictions: Vec<SessionId>,
    /// Set once the last member has left.
    closing: bool,
    config: RoomConfig,
    lobby: Lobby,
    commands: mpsc::Receiver<RoomCommand>,
    summary: watch::Sender<RoomSummary>,
    shutdown: Arc<Notify>,
}

impl RoomActor {
    /// Runs the actor loop until the room is closed or empties out.
    async fn run(mut self) {
        tracing::info!(room_id = %self.id, title = %self.title, "room actor started");

        let mut ticker = GraceTicker::new(self.config.tick_interval);
        let shutdown = Arc::clone(&self.shutdown);

        loop {
            tokio::select! {
                () = shutdown.notified() => {
                    tracing::info!(room_id = %self.id, "room shutting down");
                    break;
                }
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command);
                }
                _ = ticker.tick() => {
                    self.on_tick(Instant::now());
                }
            }

            self.process_evictions();
            self.publish();

            if self.closing {
                self.lobby.release(self.id).await;
                break;
            }
        }

        self.members.clear();
        tracing::info!(room_id = %self.id, "room actor stopped");
    }

    fn handle_command(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join {
                id,
                username,
                outbox,
            } => self.handle_join(id, username, outbox),
            RoomCommand::Leave { id } => self.remove_member(id),
            RoomCommand::Broadcast(event) => self.broadcast(&event),
            RoomCommand::Client { id, event } => self.handle_client_event(id, event),
        }
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn handle_join(&mut self, id: SessionId, username: String, outbox: Outbox) {
        if self.members.contains(id) {
            tracing::debug!(room_id = %self.id, session_id = %id, "duplicate join ignored");
            return;
        }

        let existing = self.members.ids();
        let session = ClientSession::new(id, username, outbox, &self.config.session);
        let username = session.username().to_owned();
        self.members.insert(session);

        self.send_to(
            id,
            &ServerEvent::SelfUser {
                id,
                username: username.clone(),
            },
        );
        self.send_to(
            id,
            &ServerEvent::RoomTitle {
                title: self.title.clone(),
            },
        );
        self.send_to(id, &ServerEvent::RoomIdentity { id: self.id });
        self.send_to(id, &ServerEvent::RoomStateChanged { state: self.state });

        for other in existing {
            let Some(member) = self.members.get(other) else {
                continue;
            };
            let event = ServerEvent::UserJoin {
                id: other,
                username: member.username().to_owned(),
                state: member.state(),
            };
            self.send_to(id, &event);
        }

        self.members.elect_host();
        if let Some(host) = self.members.host() {
            self.send_to(id, &ServerEvent::RoomHost { id: host });
        }
        if let Some(song) = self.song.clone() {
            self.send_to(id, &ServerEvent::RoomSong(song));
        }

        self.broadcast_where(
            &ServerEvent::UserJoin {
                id,
                username: username.clone(),
                state: ClientState::Idle,
            },
            |s| s.id() != id,
        );

        tracing::info!(
            room_id = %self.id,
            session_id = %id,
            %username,
            players = self.members.len(),
            "player joined"
        );
    }

    /// The single leave path: voluntary disconnects, evictions and
    /// grace-period enforcement all end up here.
    fn remove_member(&mut self, id: SessionId) {
        let Some(session) = self.members.remove(id) else {
            tracing::debug!(room_id = %self.id, session_id = %id, "leave for non-member ignored");
            return;
        };
        self.evictions.retain(|other| *other != id);
        let was_host = session.is_host();

        tracing::info!(
            room_id = %self.id,
            session_id = %id,
            username = %session.username(),
            players = self.members.len(),
            "player left"
        );
        drop(session);

        if self.members.is_empty() {
            self.closing = true;
            return;
        }

        self.broadcast(&ServerEvent::UserLeave { id });

        if was_host {
            if let Some(host) = self.members.elect_host() {
                tracing::info!(room_id = %self.id, session_id = %host, "host reassigned");
                self.broadcast(&ServerEvent::RoomHost { id: host });
            }
        }

        self.arm_end_grace();
        self.reevaluate_match();
    }

    /// A departed match member may have been the one everyone was
    /// waiting for.
    fn reevaluate_match(&mut self) {
        if self.state == RoomState::Idle {
            return;
        }
        if !self.members.iter().any(ClientSession::in_match) {
            self.finish_match(true);
            return;
        }
        match self.state {
            RoomState::Preparing => self.start_match(false),
            RoomState::Playing => self.finish_match(false),
            RoomState::Idle => {}
        }
    }

    fn process_evictions(&mut self) {
        while !self.evictions.is_empty() {
            let id = self.evictions.remove(0);
            tracing::warn!(room_id = %self.id, session_id = %id, "evicting session");
            self.remove_member(id);
        }
    }

    // -----------------------------------------------------------------
    // Client events
    // -----------------------------------------------------------------

    fn handle_client_event(&mut self, id: SessionId, event: ClientEvent) {
        if !self.members.contains(id) {
            tracing::debug!(
                room_id = %self.id,
                session_id = %id,
                kind = event.kind(),
                "event from non-member ignored"
            );
            return;
        }

        match event {
            ClientEvent::SetSong(song) => self.set_song(id, song),
            ClientEvent::SongAvailability { has_song } => self.report_song(id, has_song),
            ClientEvent::SetReady { ready } => self.set_ready(id, ready),
            ClientEvent::StartMatch => self.ready_match(id),
            ClientEvent::GameReady => self.mark_loaded(id),
            ClientEvent::Score { score } => self.relay_score(id, score),
            ClientEvent::Finish(report) => self.finish_player(id, report),
        }
    }

    fn is_host(&self, id: SessionId) -> bool {
        self.members.get(id).is_some_and(ClientSession::is_host)
    }

    fn set_song(&mut self, id: SessionId, song: SongSelection) {
        if self.state != RoomState::Idle || !self.is_host(id) {
            tracing::debug!(room_id = %self.id, session_id = %id, "song change rejected");
            return;
        }

        tracing::info!(
            room_id = %self.id,
            hash = %song.hash,
            difficulty = song.difficulty,
            "song selected"
        );
        self.song = Some(song.clone());
        for member in self.members.iter_mut() {
            member.reset_for_new_song();
        }
        for member in self.members.ids() {
            self.announce_state(member);
        }
        self.broadcast(&ServerEvent::RoomSong(song));
    }

    fn report_song(&mut self, id: SessionId, has_song: bool) {
        if self.state != RoomState::Idle {
            return;
        }
        if let Some(session) = self.members.get_mut(id) {
            if session.report_song(has_song) {
                self.announce_state(id);
            }
        }
    }

    fn set_ready(&mut self, id: SessionId, ready: bool) {
        if let Some(session) = self.members.get_mut(id) {
            if session.set_ready(ready) {
                self.announce_state(id);
            }
        }
    }

    fn mark_loaded(&mut self, id: SessionId) {
        if self.state != RoomState::Preparing {
            return;
        }
        let loaded = self
            .members
            .get_mut(id)
            .is_some_and(|s| s.in_match() && s.mark_loaded());
        if loaded {
            self.announce_state(id);
            self.start_match(false);
        }
    }

    fn relay_score(&mut self, id: SessionId, score: u32) {
        let now = Instant::now();
        let accepted = self
            .members
            .get_mut(id)
            .is_some_and(|s| s.accept_score(now));
        if !accepted {
            tracing::trace!(room_id = %self.id, session_id = %id, "score update dropped");
            return;
        }
        tracing::trace!(room_id = %self.id, session_id = %id, score, "relaying score");
        self.broadcast_where(&ServerEvent::GameScore { id, score }, |s| {
            s.in_match() && s.id() != id
        });
    }

    fn finish_player(&mut self, id: SessionId, report: FinishReport) {
        let playing = self
            .members
            .get(id)
            .is_some_and(ClientSession::is_playing_in_match);
        if !playing {
            tracing::debug!(room_id = %self.id, session_id = %id, "finish outside match ignored");
            return;
        }

        self.broadcast_where(&ServerEvent::GameFinish(PlayerResult { id, report }), |s| {
            s.in_match() && s.id() != id
        });

        let Some(session) = self.members.get_mut(id) else {
            return;
        };
        session.finish();
        self.announce_state(id);

        self.arm_end_grace();
        self.finish_match(false);
    }

    // -----------------------------------------------------------------
    // Match lifecycle
    // -----------------------------------------------------------------

    /// `Idle → Preparing`, requested by the host.
    fn ready_match(&mut self, id: SessionId) {
        if self.state != RoomState::Idle || !self.is_host(id) {
            tracing::debug!(room_id = %self.id, session_id = %id, "match start rejected");
            return;
        }

        let ready = {
            let mut candidates = self
                .members
                .iter()
                .filter(|s| s.state() != ClientState::MissingSong)
                .peekable();
            candidates.peek().is_some()
                && candidates.all(|s| s.state() == ClientState::LobbyReady)
        };
        if !ready {
            return;
        }

        for member in self.members.ids() {
            let loading = self
                .members
                .get_mut(member)
                .is_some_and(ClientSession::begin_loading);
            if loading {
                self.announce_state(member);
            }
        }
        self.broadcast_where(&ServerEvent::MatchPrepare {}, ClientSession::in_match);

        self.match_start = Some(Instant::now());
        self.match_end = None;
        self.set_state(RoomState::Preparing);
    }

    /// `Preparing → Playing`, once every match member has loaded the
    /// chart or when forced by the start grace period.
    fn start_match(&mut self, force: bool) {
        if self.state != RoomState::Preparing {
            return;
        }
        let all_loaded = self
            .members
            .iter()
            .filter(|s| s.in_match())
            .all(|s| s.state() == ClientState::GameReady);
        if !force && !all_loaded {
            return;
        }

        for member in self.members.ids() {
            let started = match self.members.get_mut(member) {
                Some(session) if session.in_match() => {
                    session.start_playing();
                    true
                }
                _ => false,
            };
            if started {
                self.announce_state(member);
            }
        }
        self.broadcast_where(&ServerEvent::GameStart {}, ClientSession::in_match);
        self.set_state(RoomState::Playing);
    }

    /// `Playing → Idle`, once every match member reached the results
    /// screen. The forced variant also ends a match still preparing.
    fn finish_match(&mut self, force: bool) {
        if self.state == RoomState::Idle {
            return;
        }
        if !force {
            let all_finished = self
                .members
                .iter()
                .filter(|s| s.in_match())
                .all(|s| s.state() == ClientState::Results);
            if self.state != RoomState::Playing || !all_finished {
                return;
            }
        }

        let participants: Vec<SessionId> = self
            .members
            .iter()
            .filter(|s| s.in_match())
            .map(ClientSession::id)
            .collect();
        for member in &participants {
            if let Some(session) = self.members.get_mut(*member) {
                session.end_match();
            }
            self.announce_state(*member);
        }
        self.broadcast_where(&ServerEvent::EvaluationShow {}, |s| {
            participants.contains(&s.id())
        });

        self.match_start = None;
        self.match_end = None;
        self.set_state(RoomState::Idle);
    }

    fn set_state(&mut self, state: RoomState) {
        tracing::info!(room_id = %self.id, from = %self.state, to = %state, "room state changed");
        self.state = state;
        self.broadcast(&ServerEvent::RoomStateChanged { state });
    }

    // -----------------------------------------------------------------
    // Grace periods
    // -----------------------------------------------------------------

    fn on_tick(&mut self, now: Instant) {
        match self.state {
            RoomState::Preparing => {
                let Some(start) = self.match_start else { return };
                if now.saturating_duration_since(start) < self.config.start_grace {
                    return;
                }
                self.disconnect_laggards(ClientState::GameReady, "start");
                self.start_match(true);
            }
            RoomState::Playing => {
                let Some(end) = self.match_end else { return };
                if now.saturating_duration_since(end) < self.config.end_grace {
                    return;
                }
                self.disconnect_laggards(ClientState::Results, "end");
                self.finish_match(true);
            }
            RoomState::Idle => {}
        }
    }

    /// Starts the end grace period once the host has finished. A host
    /// sitting the match out is replaced by the first finished member.
    fn arm_end_grace(&mut self) {
        if self.state != RoomState::Playing || self.match_end.is_some() {
            return;
        }
        let armed = match self.members.iter().find(|s| s.is_host()) {
            Some(host) if host.in_match() => host.state() == ClientState::Results,
            _ => self
                .members
                .iter()
                .any(|s| s.in_match() && s.state() == ClientState::Results),
        };
        if armed {
            tracing::debug!(room_id = %self.id, "end grace period started");
            self.match_end = Some(Instant::now());
        }
    }

    /// Removes every match member that has not reached `expected`.
    fn disconnect_laggards(&mut self, expected: ClientState, phase: &'static str) {
        let laggards: Vec<SessionId> = self
            .members
            .iter()
            .filter(|s| s.in_match() && s.state() != expected)
            .map(ClientSession::id)
            .collect();
        for id in laggards {
            tracing::warn!(
                room_id = %self.id,
                session_id = %id,
                phase,
                "grace period expired, disconnecting"
            );
            self.remove_member(id);
        }
    }

    // -----------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------

    fn announce_state(&mut self, id: SessionId) {
        let Some(state) = self.members.get(id).map(ClientSession::state) else {
            return;
        };
        self.broadcast(&ServerEvent::UserState { id, state });
    }

    fn broadcast(&mut self, event: &ServerEvent) {
        self.broadcast_where(event, |_| true);
    }

    fn broadcast_where(&mut self, event: &ServerEvent, filter: impl Fn(&ClientSession) -> bool) {
        let Some(frame) = self.encode(event) else {
            return;
        };
        let targets: Vec<SessionId> = self
            .members
            .iter()
            .filter(|s| filter(*s))
            .map(ClientSession::id)
            .collect();
        for id in targets {
            self.deliver(id, &frame);
        }
    }

    fn send_to(&mut self, id: SessionId, event: &ServerEvent) {
        if let Some(frame) = self.encode(event) {
            self.deliver(id, &frame);
        }
    }

    fn deliver(&mut self, id: SessionId, frame: &Frame) {
        if self.evictions.contains(&id) {
            return;
        }
        let Some(session) = self.members.get(id) else {
            return;
        };
        if let Err(err) = session.deliver(Frame::clone(frame)) {
            tracing::warn!(
                room_id = %self.id,
                session_id = %id,
                error = %err,
                "outbound mailbox rejected frame"
            );
            self.evictions.push(id);
        }
    }

    fn encode(&self, event: &ServerEvent) -> Option<Frame> {
        match encode_event(event) {
            Ok(frame) => Some(frame),
            Err(err) => {
                tracing::error!(room_id = %self.id, error = %err, "failed to encode event");
                None
            }
        }
    }

    fn publish(&self) {
        self.summary.send_replace(self.summarize());
    }

    fn summarize(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            title: self.title.clone(),
            players: self
                .members
                .iter()
                .map(|s| s.username().to_owned())
                .collect(),
            state: self.state,
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
pub(crate) fn spawn_room(
    id: RoomId,
    title: String,
    config: RoomConfig,
    lobby: Lobby,
) -> RoomHandle {
    let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
    let (summary_tx, summary_rx) = watch::channel(RoomSummary {
        id,
        title: title.clone(),
        players: Vec::new(),
        state: RoomState::Idle,
    });
    let shutdown = Arc::new(Notify::new());

    let handle = RoomHandle {
        id,
        title: Arc::from(title.as_str()),
        commands: command_tx,
        summary: summary_rx,
        shutdown: Arc::clone(&shutdown),
    };

    let actor = RoomActor {
        id,
        title,
        state: RoomState::Idle,
        song: None,
        members: Members::default(),
        match_start: None,
        match_end: None,
        evictions: Vec::new(),
        closing: false,
        config,
        lobby,
        commands: command_rx,
        summary: summary_tx,
        shutdown,
    };

    tokio::spawn(actor.run());
    handle
}
