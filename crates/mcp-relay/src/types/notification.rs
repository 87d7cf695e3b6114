//! Server-initiated notifications.

use serde_json::{json, Value};

use super::message::JsonRpcNotification;

/// Sent after the `initialize` response to complete the handshake.
pub const INITIALIZED: &str = "initialized";

pub fn initialized() -> JsonRpcNotification {
    JsonRpcNotification::new(INITIALIZED.to_string(), Some(Value::Object(Default::default())))
}

/// Empty object result, shared by methods that acknowledge without data.
pub fn empty_result() -> Value {
    json!({})
}
