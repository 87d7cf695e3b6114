//! Invokable tool handlers.

pub mod get_user;
pub mod get_weather;
pub mod registry;

pub use registry::{ToolHandler, ToolRegistry};
