//! All MCP data types used by the relay.

pub mod capabilities;
pub mod error;
pub mod message;
pub mod notification;
pub mod request;
pub mod response;

pub use capabilities::*;
pub use error::*;
pub use message::*;
pub use notification::{empty_result, initialized, INITIALIZED};
pub use request::*;
pub use response::*;
