//! Main request dispatcher — interprets one request and produces the messages to broadcast.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::config::DEFAULT_HANDSHAKE_DELAY_MS;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;

/// One outbound message plus the pause to observe before broadcasting it.
#[derive(Debug, Clone)]
pub struct Emission {
    pub delay: Duration,
    pub message: JsonRpcMessage,
}

impl Emission {
    pub fn now(message: JsonRpcMessage) -> Self {
        Self {
            delay: Duration::ZERO,
            message,
        }
    }

    pub fn after(delay: Duration, message: JsonRpcMessage) -> Self {
        Self { delay, message }
    }
}

/// Routes requests to the catalog, the tool handlers, or a protocol error.
pub struct ProtocolHandler {
    catalog: Arc<Catalog>,
    tools: Arc<ToolRegistry>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
    handshake_delay: Duration,
}

impl ProtocolHandler {
    pub fn new(catalog: Catalog, tools: ToolRegistry) -> Self {
        Self {
            catalog: Arc::new(catalog),
            tools: Arc::new(tools),
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
            handshake_delay: Duration::from_millis(DEFAULT_HANDSHAKE_DELAY_MS),
        }
    }

    pub fn with_handshake_delay(mut self, delay: Duration) -> Self {
        self.handshake_delay = delay;
        self
    }

    /// Dispatch one decoded request.
    ///
    /// Always yields at least the response; `initialize` additionally yields the
    /// delayed `initialized` notification after it.
    pub async fn dispatch(&self, request: Value) -> Vec<Emission> {
        let request = IncomingRequest::from_value(request);
        let id = request.id.clone();

        tracing::debug!("Dispatching {:?} (id {id})", request.method_name());

        let reply = match self.dispatch_request(&request).await {
            Ok(result) => JsonRpcMessage::Response(JsonRpcResponse::new(id, result)),
            Err(e) => {
                tracing::debug!("Request {id} failed: {e:?}");
                JsonRpcMessage::Error(e.to_json_rpc_error(id))
            }
        };

        let mut emissions = vec![Emission::now(reply)];
        if request.method.as_deref() == Some("initialize") {
            emissions.push(Emission::after(
                self.handshake_delay,
                JsonRpcMessage::Notification(initialized()),
            ));
        }
        emissions
    }

    async fn dispatch_request(&self, request: &IncomingRequest) -> McpResult<Value> {
        match request.method_name() {
            "initialize" => self.handle_initialize(request.params.as_ref()).await,
            "ping" => Ok(empty_result()),

            "tools/list" => Ok(self.catalog.tools.clone()),
            "tools/invoke" => self.handle_tools_invoke(request.params.as_ref()).await,

            "resources/list" => Ok(self.catalog.resources.clone()),
            "prompts/list" => Ok(self.catalog.prompts.clone()),

            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    async fn handle_initialize(&self, params: Option<&Value>) -> McpResult<Value> {
        let result = self.capabilities.lock().await.negotiate(params);
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_invoke(&self, params: Option<&Value>) -> McpResult<Value> {
        let invoke = ToolInvokeParams::from_params(params);
        let name = invoke.name.unwrap_or_default();

        // A panicking handler becomes an error response instead of killing the connection task.
        AssertUnwindSafe(self.tools.invoke(&name, invoke.arguments))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!("Tool {name:?} panicked");
                Err(McpError::InternalError(format!("tool {name} panicked")))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolHandler;
    use async_trait::async_trait;
    use serde_json::json;

    struct Exploding;

    #[async_trait]
    impl ToolHandler for Exploding {
        async fn invoke(&self, _arguments: Option<Value>) -> McpResult<Value> {
            panic!("boom");
        }
    }

    fn handler() -> ProtocolHandler {
        ProtocolHandler::new(Catalog::builtin(), ToolRegistry::builtin(Duration::ZERO))
            .with_handshake_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_initialize_emits_response_then_notification() {
        let out = handler()
            .dispatch(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await;
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].message, JsonRpcMessage::Response(_)));
        assert_eq!(out[0].delay, Duration::ZERO);
        assert_eq!(out[1].delay, Duration::from_millis(5));
        let notification = out[1].message.to_value();
        assert_eq!(notification, json!({"jsonrpc": "2.0", "method": "initialized", "params": {}}));
    }

    #[tokio::test]
    async fn test_missing_invoke_params_resolve_no_tool() {
        let out = handler()
            .dispatch(json!({"jsonrpc": "2.0", "id": "x", "method": "tools/invoke"}))
            .await;
        let value = out[0].message.to_value();
        assert_eq!(value["id"], "x");
        assert_eq!(value["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_panicking_tool_becomes_internal_error() {
        let mut tools = ToolRegistry::new();
        tools.register("explode", Exploding);
        let handler = ProtocolHandler::new(Catalog::builtin(), tools);

        let out = handler
            .dispatch(json!({
                "jsonrpc": "2.0", "id": 9, "method": "tools/invoke",
                "params": {"name": "explode"}
            }))
            .await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message.to_value()["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn test_ping() {
        let out = handler().dispatch(json!({"id": 2, "method": "ping"})).await;
        assert_eq!(out[0].message.to_value()["result"], json!({}));
    }
}
