mod hub;
mod log;
mod protocol;
mod registry;
mod ws;

use axum::{Router, routing::get};

use crate::AppState;

pub use hub::{Hub, Outbox};
pub use protocol::{ClientCommand, ConnectionId, Message, MessageKind, ServerEvent, User};

pub const SOCKET_PATH: &str = "/api/socket";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(SOCKET_PATH, get(ws::chat_ws))
}
