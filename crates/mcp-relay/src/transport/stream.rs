//! Event-stream transport — GET /mcp subscribes a queue sink and streams it as SSE.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use relay_hub::{Frame, QueueSink, SinkId, SinkRegistry};
use tokio::sync::mpsc::UnboundedReceiver;

use super::http::ServerState;

/// Event type label carried by every streamed message.
pub const EVENT_NAME: &str = "message";

/// A registered queue sink and the receiving end of its queue.
///
/// Dropping the subscription is the only way its sink leaves the registry.
pub struct Subscription {
    id: SinkId,
    hub: Arc<SinkRegistry>,
    rx: UnboundedReceiver<Frame>,
}

impl Subscription {
    pub fn open(hub: Arc<SinkRegistry>) -> Self {
        let (sink, rx) = QueueSink::channel();
        let id = hub.register(Arc::new(sink));
        tracing::info!(
            "Stream client connected. Active queues: {}",
            hub.counts().streams
        );
        Self { id, hub, rx }
    }

    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Wait for the next broadcast frame.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }

    /// Take a frame that is already queued, without waiting.
    pub fn try_next_frame(&mut self) -> Option<Frame> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
        tracing::info!(
            "Stream client disconnected. Active queues: {}",
            self.hub.counts().streams
        );
    }
}

/// GET /mcp: register before the response starts, then stream until the client goes away.
pub async fn subscribe(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = Subscription::open(state.relay.hub().clone());

    let stream = async_stream::stream! {
        while let Some(frame) = subscription.next_frame().await {
            tracing::trace!("Yielding message from queue {}", subscription.id());
            yield Ok(Event::default().event(EVENT_NAME).data(&*frame));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
