//! Handshake bookkeeping for `initialize`.

use serde_json::Value;

use crate::types::{Implementation, InitializeResult};

/// What the relay learned from `initialize` calls.
///
/// Every connected client shares the same relay, so this only records the most
/// recent client and how many handshakes were served.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub last_client: Option<Implementation>,
    pub handshakes: u64,
}

impl NegotiatedCapabilities {
    /// Record an `initialize` call. The descriptor is fixed, so params never make it fail.
    pub fn negotiate(&mut self, params: Option<&Value>) -> InitializeResult {
        self.handshakes += 1;

        let client = params
            .and_then(|p| p.get("clientInfo"))
            .cloned()
            .and_then(|info| serde_json::from_value::<Implementation>(info).ok());

        match &client {
            Some(info) => tracing::info!(
                "Initialize #{} from client: {} v{}",
                self.handshakes,
                info.name,
                info.version
            ),
            None => tracing::info!("Initialize #{} from anonymous client", self.handshakes),
        }

        if let Some(requested) = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
        {
            if requested != crate::types::MCP_VERSION {
                tracing::warn!(
                    "Client requested protocol version {requested}, server supports {}. Proceeding with server version.",
                    crate::types::MCP_VERSION
                );
            }
        }

        if client.is_some() {
            self.last_client = client;
        }

        InitializeResult::default_result()
    }
}
