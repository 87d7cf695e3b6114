//! Glue between the dispatcher and the broadcast hub.

use std::sync::Arc;

use relay_hub::SinkRegistry;
use serde_json::Value;

use super::handler::ProtocolHandler;

/// Dispatches requests and broadcasts every resulting message to every sink.
pub struct Relay {
    handler: ProtocolHandler,
    hub: Arc<SinkRegistry>,
}

impl Relay {
    pub fn new(handler: ProtocolHandler, hub: Arc<SinkRegistry>) -> Self {
        Self { handler, hub }
    }

    pub fn hub(&self) -> &Arc<SinkRegistry> {
        &self.hub
    }

    /// Dispatch one request and broadcast its messages in emission order.
    ///
    /// Each message is fully broadcast before the next one's delay starts.
    /// Returns the number of messages broadcast.
    pub async fn process(&self, request: Value) -> usize {
        let emissions = self.handler.dispatch(request).await;
        let count = emissions.len();

        for emission in emissions {
            if !emission.delay.is_zero() {
                tokio::time::sleep(emission.delay).await;
            }
            self.hub.broadcast(&emission.message.to_value()).await;
        }

        count
    }

    /// Process a batch strictly in order; request k+1 starts only after request k
    /// has broadcast everything, including delayed messages.
    pub async fn process_batch(&self, requests: Vec<Value>) -> usize {
        let mut total = 0;
        for request in requests {
            total += self.process(request).await;
        }
        total
    }
}
