//! mcp-relay — a JSON-RPC front-end that broadcasts every reply and notification
//! to every connected client, over WebSocket and SSE alike.

pub mod catalog;
pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use catalog::Catalog;
pub use config::ServerConfig;
pub use protocol::{ProtocolHandler, Relay};
pub use tools::ToolRegistry;
pub use transport::HttpTransport;
