use axum::{debug_handler, extract::{State, WebSocketUpgrade, ws::Message as WsMessage}, response::IntoResponse};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::{hub::Hub, protocol::{ClientCommand, ConnectionId}};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn chat_ws(
    State(hub): State<Hub>,

    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(async move |stream| {
        let id = ConnectionId::random();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.connect(id.clone(), tx).await;

        let (mut sender, mut receiver) = stream.split();

        let mut write_task = {
            let id = id.clone();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    let text = match serde_json::to_string(&*event) {
                        Ok(text) => text,
                        Err(err) => {
                            debug!(conn = %id, %err, "could not encode event");
                            continue;
                        }
                    };
                    if sender.send(WsMessage::Text(text.into())).await.is_err() {
                        debug!(conn = %id, "send failed, closing writer");
                        break;
                    }
                }
            })
        };

        let mut read_task = {
            let hub = hub.clone();
            let id = id.clone();
            tokio::spawn(async move {
                while let Some(Ok(msg)) = receiver.next().await {
                    let text = match msg {
                        WsMessage::Text(text) => text,
                        WsMessage::Close(_) => break,
                        _ => continue,
                    };
                    let Ok(command) = serde_json::from_str::<ClientCommand>(text.as_str()) else {
                        debug!(conn = %id, "dropping malformed frame");
                        continue;
                    };

                    hub.handle(&id, command).await;
                }
            })
        };

        tokio::select! {
            _ = &mut write_task => read_task.abort(),
            _ = &mut read_task => write_task.abort(),
        };

        hub.disconnect(&id).await;
    })
}
