//! Transport layer: HTTP POST ingestion, event stream, and WebSocket.

pub mod framing;
pub mod http;
pub mod socket;
pub mod stream;

pub use http::{HttpTransport, ServerState};
pub use stream::Subscription;
