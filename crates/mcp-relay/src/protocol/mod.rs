//! MCP protocol handling — request dispatch and broadcast sequencing.

pub mod handler;
pub mod negotiation;
pub mod relay;

pub use handler::{Emission, ProtocolHandler};
pub use relay::Relay;
