//! Relay hub — connection registry and broadcast fan-out for mcp-relay.
//!
//! Every outbound message is delivered to every live sink, whichever transport
//! the sink belongs to. Sinks are registered on connect/subscribe and removed on
//! disconnect, or on the first failed delivery for socket sinks.

pub mod registry;
pub mod sink;
pub mod types;

pub use registry::{BroadcastReport, SinkCounts, SinkRegistry};
pub use sink::{DirectSink, FrameWriter, QueueSink, Sink};
pub use types::*;
