//! Error types and JSON-RPC error codes for the relay.

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// All errors that can occur in the relay.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Payload is not UTF-8 text.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown top-level method. Message text is fixed by the protocol.
    #[error("Method not found")]
    MethodNotFound(String),

    /// Unknown tool passed to `tools/invoke`; reported like an unknown method.
    #[error("Method not found")]
    ToolNotFound(String),

    /// A known tool received a malformed argument.
    #[error("Invalid {field}")]
    InvalidArgument { field: String },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) | McpError::ToolNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidArgument { .. } => INVALID_PARAMS,
            McpError::InternalError(_)
            | McpError::Catalog(_)
            | McpError::Transport(_)
            | McpError::Io(_) => INTERNAL_ERROR,
        }
    }

    pub fn invalid_argument(field: &str) -> Self {
        McpError::InvalidArgument {
            field: field.to_string(),
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: None,
            },
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_errors_share_method_not_found() {
        for err in [
            McpError::MethodNotFound("nope".into()),
            McpError::ToolNotFound("get_nothing".into()),
        ] {
            let rpc = err.to_json_rpc_error(RequestId::Null);
            assert_eq!(rpc.error.code, -32601);
            assert_eq!(rpc.error.message, "Method not found");
        }
    }

    #[test]
    fn test_invalid_argument_names_the_field() {
        let err = McpError::invalid_argument("user_id");
        assert_eq!(err.code(), -32602);
        assert_eq!(err.to_string(), "Invalid user_id");
    }
}
