//! Socket transport — GET /ws upgrades to a WebSocket that both sends requests and
//! receives every broadcast.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use relay_hub::{DirectSink, FrameWriter, HubError, HubResult, SinkId, SinkRegistry};
use tokio::sync::Mutex;

use super::framing;
use super::http::ServerState;

/// Write half of a WebSocket, used as the socket's direct sink.
struct WsWriter {
    sender: Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl FrameWriter for WsWriter {
    async fn write_frame(&self, frame: &str) -> HubResult<()> {
        self.sender
            .lock()
            .await
            .send(Message::Text(frame.to_string()))
            .await
            .map_err(|e| HubError::SendFailed(e.to_string()))
    }
}

/// Unregisters the socket's sink however the connection task ends.
struct Registration {
    id: SinkId,
    hub: Arc<SinkRegistry>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
        tracing::info!(
            "WebSocket disconnected. Active sockets: {}",
            self.hub.counts().sockets
        );
    }
}

/// GET /ws: upgrade and hand the connection to its own task.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Read frames until the peer closes or errors, dispatching each request in order.
async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    let (sender, mut receiver) = socket.split();

    let sink = DirectSink::new(WsWriter {
        sender: Mutex::new(sender),
    })
    .with_timeout(state.send_timeout);

    let hub = state.relay.hub().clone();
    let registration = Registration {
        id: hub.register(Arc::new(sink)),
        hub,
    };
    tracing::info!(
        "WebSocket connected ({}). Active sockets: {}",
        registration.id,
        registration.hub.counts().sockets
    );

    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    tracing::warn!("Skipping non-UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => {
                tracing::debug!("WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::debug!("WebSocket error/closed: {e}");
                break;
            }
        };

        tracing::debug!("WebSocket received: {text}");
        state.relay.process_batch(framing::decode_text(&text)).await;
    }

    drop(registration);
}
