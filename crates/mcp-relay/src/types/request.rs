//! Inbound request view and MCP request parameter types.

use serde_json::Value;

use super::message::RequestId;

/// One decoded request, read leniently from whatever JSON value the codec yielded.
///
/// Nothing is rejected here: a missing or non-string `method` simply resolves to
/// no route, and a non-object value becomes a request with neither id nor method.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub id: RequestId,
    pub method: Option<String>,
    pub params: Option<Value>,
}

impl IncomingRequest {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(super::JSONRPC_VERSION) {
            tracing::debug!("Request without jsonrpc \"2.0\" marker, routing anyway");
        }

        Self {
            id: obj.remove("id").map(RequestId::from).unwrap_or_default(),
            method: obj
                .remove("method")
                .and_then(|m| m.as_str().map(str::to_string)),
            params: obj.remove("params").filter(|p| !p.is_null()),
        }
    }

    pub fn method_name(&self) -> &str {
        self.method.as_deref().unwrap_or("")
    }
}

/// Parameters of `tools/invoke`, read leniently.
#[derive(Debug, Clone, Default)]
pub struct ToolInvokeParams {
    pub name: Option<String>,
    pub arguments: Option<Value>,
}

impl ToolInvokeParams {
    /// Anything that is not an object with a string `name` resolves no tool.
    pub fn from_params(params: Option<&Value>) -> Self {
        let Some(Value::Object(obj)) = params else {
            return Self::default();
        };
        Self {
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
            arguments: obj.get("arguments").cloned().filter(|a| !a.is_null()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_id_becomes_null() {
        let req = IncomingRequest::from_value(json!({"jsonrpc": "2.0", "method": "ping"}));
        assert_eq!(req.id, RequestId::Null);
        assert_eq!(req.method.as_deref(), Some("ping"));
    }

    #[test]
    fn test_non_object_has_no_method() {
        let req = IncomingRequest::from_value(json!(42));
        assert!(req.method.is_none());
        assert_eq!(req.id, RequestId::Null);
    }

    #[test]
    fn test_non_string_method_has_no_route() {
        let req = IncomingRequest::from_value(json!({"id": 3, "method": 5}));
        assert!(req.method.is_none());
        assert_eq!(req.id, RequestId::from(json!(3)));
    }

    #[test]
    fn test_invoke_params_without_name() {
        assert!(ToolInvokeParams::from_params(None).name.is_none());
        assert!(ToolInvokeParams::from_params(Some(&json!([1, 2]))).name.is_none());
        let params = ToolInvokeParams::from_params(Some(&json!({"name": "get_user"})));
        assert_eq!(params.name.as_deref(), Some("get_user"));
        assert!(params.arguments.is_none());
    }
}
