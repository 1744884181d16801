//! Presence and message fan-out.
//!
//! All state lives behind one lock. Every command takes the lock, mutates the
//! registry and log, and queues the resulting events on each recipient's
//! outbound channel before releasing it, so every client sees events in the
//! order the hub processed them.

use std::{collections::HashMap, sync::Arc};

use time::OffsetDateTime;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use super::{
    log::MessageLog,
    protocol::{ClientCommand, ConnectionId, MAX_CONTENT_LEN, MAX_USERNAME_LEN, Message, ServerEvent, User, clean},
    registry::Registry,
};

pub type Outbox = mpsc::UnboundedSender<Arc<ServerEvent>>;

struct Connection {
    identity: Option<User>,
    tx: Outbox,
}

#[derive(Default)]
struct HubState {
    connections: HashMap<ConnectionId, Connection>,
    registry: Registry,
    log: MessageLog,
}

#[derive(Clone, Default)]
pub struct Hub {
    state: Arc<Mutex<HubState>>,
}

impl Hub {
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                log: MessageLog::new(history_limit),
                ..Default::default()
            })),
        }
    }

    /// Registers an anonymous connection. Nothing is announced until it joins.
    pub async fn connect(&self, id: ConnectionId, tx: Outbox) {
        info!(conn = %id, "user connected");
        let mut state = self.state.lock().await;
        state.connections.insert(id, Connection { identity: None, tx });
    }

    pub async fn handle(&self, id: &ConnectionId, command: ClientCommand) {
        match command {
            ClientCommand::JoinRoom(username) => self.join(id, &username).await,
            ClientCommand::SendMessage(content) => self.send_message(id, &content).await,
        }
    }

    pub async fn join(&self, id: &ConnectionId, username: &str) {
        let Some(username) = clean(username, MAX_USERNAME_LEN) else {
            return;
        };

        let mut state = self.state.lock().await;
        let state = &mut *state;
        let Some(conn) = state.connections.get_mut(id) else {
            return;
        };

        let user = User { id: id.clone(), username };
        info!(conn = %id, username = %user.username, "user joined");
        conn.identity = Some(user.clone());
        state.registry.register(id, user.clone());

        let users = state.registry.list();
        send(id, &conn.tx, ServerEvent::UsersList(users.clone()));
        for message in state.log.snapshot() {
            send(id, &conn.tx, ServerEvent::Message(message));
        }

        state.broadcast(ServerEvent::UserJoined(user.clone()), Some(id));
        state.broadcast(ServerEvent::UsersList(users), Some(id));

        let notice = Message::system(format!("{} joined the chat", user.username), state.now());
        state.log.append(notice.clone());
        state.broadcast(ServerEvent::Message(notice), None);
    }

    pub async fn send_message(&self, id: &ConnectionId, content: &str) {
        let mut state = self.state.lock().await;
        let Some(author) = state.connections.get(id).and_then(|c| c.identity.clone()) else {
            debug!(conn = %id, "message from anonymous connection dropped");
            return;
        };
        let Some(content) = clean(content, MAX_CONTENT_LEN) else {
            return;
        };

        let message = Message::text(&author, content, state.now());
        state.log.append(message.clone());
        state.broadcast(ServerEvent::Message(message), None);
    }

    pub async fn disconnect(&self, id: &ConnectionId) {
        info!(conn = %id, "user disconnected");
        let mut state = self.state.lock().await;
        let Some(conn) = state.connections.remove(id) else {
            return;
        };
        let Some(user) = conn.identity else {
            return;
        };

        state.registry.unregister(id);
        state.broadcast(ServerEvent::UserLeft(user.clone()), None);
        state.broadcast(ServerEvent::UsersList(state.registry.list()), None);

        let notice = Message::system(format!("{} left the chat", user.username), state.now());
        state.log.append(notice.clone());
        state.broadcast(ServerEvent::Message(notice), None);
    }

    #[cfg(test)]
    async fn users(&self) -> Vec<User> {
        self.state.lock().await.registry.list()
    }

    #[cfg(test)]
    async fn history(&self) -> Vec<Message> {
        self.state.lock().await.log.snapshot()
    }

    #[cfg(test)]
    async fn connection_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }
}

impl HubState {
    fn broadcast(&self, event: ServerEvent, except: Option<&ConnectionId>) {
        let event = Arc::new(event);
        for (id, conn) in &self.connections {
            if Some(id) != except {
                send(id, &conn.tx, event.clone());
            }
        }
    }

    /// Wall clock in ms, never behind the newest logged message.
    fn now(&self) -> i64 {
        let now = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        self.log.last_timestamp().map_or(now, |last| now.max(last))
    }
}

fn send(id: &ConnectionId, tx: &Outbox, event: impl Into<Arc<ServerEvent>>) {
    if tx.send(event.into()).is_err() {
        debug!(conn = %id, "outbound queue closed");
    }
}
