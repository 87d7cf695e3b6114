//! JSON-RPC 2.0 message types for the MCP protocol.

use serde::Serialize;
use serde_json::{Number, Value};

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier, echoed verbatim in the response.
///
/// A request without an `id` is answered with `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(Number),
    #[default]
    Null,
    /// Any other JSON value a client chose to use as an id.
    Opaque(Value),
}

impl From<Value> for RequestId {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RequestId::String(s),
            Value::Number(n) => RequestId::Number(n),
            Value::Null => RequestId::Null,
            other => RequestId::Opaque(other),
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
            RequestId::Opaque(v) => write!(f, "{v}"),
        }
    }
}

/// A JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 notification (no id, not a reply to anything).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Any message the server broadcasts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
}

impl JsonRpcMessage {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The id this message answers, `None` for notifications.
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(r) => Some(&r.id),
            JsonRpcMessage::Error(e) => Some(&e.id),
            JsonRpcMessage::Notification(_) => None,
        }
    }
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}

impl JsonRpcNotification {
    pub fn new(method: String, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_echoes_any_json_value() {
        for raw in [json!("abc"), json!(7), json!(1.5), json!(null), json!({"k": [1]})] {
            let id = RequestId::from(raw.clone());
            assert_eq!(serde_json::to_value(&id).unwrap(), raw);
        }
    }

    #[test]
    fn test_error_response_has_no_result() {
        let msg = JsonRpcMessage::Error(JsonRpcError::new(RequestId::Null, -32601, "x".into()));
        let value = msg.to_value();
        assert!(value.get("result").is_none());
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32601);
    }

    #[test]
    fn test_notification_has_no_id() {
        let msg = JsonRpcMessage::Notification(JsonRpcNotification::new(
            "initialized".into(),
            Some(json!({})),
        ));
        assert!(msg.id().is_none());
        assert!(msg.to_value().get("id").is_none());
    }
}
