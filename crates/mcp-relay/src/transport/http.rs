//! HTTP server — event stream, socket upgrade, POST ingestion, and /health.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::config::DEFAULT_SEND_TIMEOUT_MS;
use crate::protocol::Relay;
use crate::types::{McpError, McpResult};

use super::{framing, socket, stream};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub relay: Relay,
    /// Socket writes slower than this unregister the socket.
    pub send_timeout: Duration,
}

/// HTTP transport serving every client of one relay.
pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    pub fn new(relay: Relay) -> Self {
        Self::with_send_timeout(relay, Duration::from_millis(DEFAULT_SEND_TIMEOUT_MS))
    }

    pub fn with_send_timeout(relay: Relay, send_timeout: Duration) -> Self {
        Self {
            state: Arc::new(ServerState {
                relay,
                send_timeout,
            }),
        }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Build the axum Router with all endpoints.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/mcp", get(stream::subscribe).post(handle_post))
            .route("/ws", get(socket::upgrade))
            .route("/health", get(handle_health))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Run the HTTP server on the given address until `shutdown` resolves.
    pub async fn run(&self, addr: &str, shutdown: impl Future<Output = ()> + Send + 'static) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(
        &self,
        listener: tokio::net::TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> McpResult<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        tracing::info!("HTTP transport stopped");
        Ok(())
    }
}

/// POST /mcp: decode the body and dispatch every request in order.
///
/// Replies only after the whole batch has been dispatched and broadcast. The
/// batch runs on its own task so a caller hanging up mid-batch does not cut it short.
async fn handle_post(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let requests = match framing::decode_payload(&body) {
        Ok(requests) => requests,
        Err(e) => return server_error(e.to_string()),
    };

    let batch = Uuid::new_v4();
    tracing::debug!("POST /mcp batch {batch} carried {} request(s)", requests.len());

    let worker = state.clone();
    let processed = tokio::spawn(async move {
        let broadcast = worker.relay.process_batch(requests).await;
        tracing::debug!("Batch {batch} broadcast {broadcast} message(s)");
    });
    match processed.await {
        Ok(_) => (StatusCode::OK, AxumJson(json!({"status": "accepted"}))).into_response(),
        Err(e) => server_error(format!("request processing aborted: {e}")),
    }
}

fn server_error(message: String) -> Response {
    tracing::warn!("Server error: {message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        AxumJson(json!({"status": "error", "message": message})),
    )
        .into_response()
}

/// Health check endpoint with live sink counts.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    let counts = state.relay.hub().counts();
    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "streams": counts.streams,
        "sockets": counts.sockets,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::protocol::ProtocolHandler;
    use crate::tools::ToolRegistry;
    use axum::body::Body;
    use axum::http::Request;
    use relay_hub::{QueueSink, SinkRegistry};
    use tower::ServiceExt;

    fn transport() -> (HttpTransport, tokio::sync::mpsc::UnboundedReceiver<relay_hub::Frame>) {
        let hub = Arc::new(SinkRegistry::new());
        let (sink, rx) = QueueSink::channel();
        hub.register(Arc::new(sink));
        let handler = ProtocolHandler::new(Catalog::builtin(), ToolRegistry::builtin(Duration::ZERO))
            .with_handshake_delay(Duration::ZERO);
        (HttpTransport::new(Relay::new(handler, hub)), rx)
    }

    async fn post(transport: &HttpTransport, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let response = transport
            .router()
            .oneshot(Request::post("/mcp").body(body.into()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_post_acknowledges_and_broadcasts() {
        let (transport, mut rx) = transport();
        let (status, body) = post(&transport, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "accepted"}));

        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["id"], 1);
        assert!(frame["result"].get("get_user").is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_non_utf8_is_internal_error() {
        let (transport, mut rx) = transport();
        let (status, body) = post(&transport, vec![0xffu8, 0xfe]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("UTF-8"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_garbage_is_still_accepted() {
        let (transport, mut rx) = transport();
        let (status, body) = post(&transport, "{bad json}\nalso bad").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "accepted");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let (transport, _rx) = transport();
        let response = transport
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["streams"], 1);
        assert_eq!(body["sockets"], 0);
    }
}
