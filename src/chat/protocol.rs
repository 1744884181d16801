use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SYSTEM_ID: &str = "system";
pub const SYSTEM_NAME: &str = "System";

pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_CONTENT_LEN: usize = 1000;

/// Opaque per-socket id handed out by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ConnectionId,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "userId")]
    pub author_id: String,
    #[serde(rename = "username")]
    pub author_name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl Message {
    pub fn text(author: &User, content: String, timestamp: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            content,
            author_id: author.id.to_string(),
            author_name: author.username.clone(),
            timestamp,
            kind: MessageKind::Text,
        }
    }

    pub fn system(content: String, timestamp: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            content,
            author_id: SYSTEM_ID.to_owned(),
            author_name: SYSTEM_NAME.to_owned(),
            timestamp,
            kind: MessageKind::System,
        }
    }
}

/// Inbound frames, `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    JoinRoom(String),
    SendMessage(String),
}

/// Outbound frames, same envelope as [`ClientCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UsersList(Vec<User>),
    Message(Message),
    UserJoined(User),
    UserLeft(User),
}

/// Trims `raw` and caps it at `max` chars. `None` when nothing is left.
pub fn clean(raw: &str, max: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.chars().take(max).collect())
}
