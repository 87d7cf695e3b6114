//! Core types shared by sinks and the registry.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

/// One serialized outbound message, shared by every sink it is delivered to.
pub type Frame = Arc<str>;

/// Opaque handle identifying one connection's sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(Uuid);

impl SinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which transport a sink belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Event-stream subscriber fed through an unbounded queue.
    Stream,
    /// Persistent socket written to directly.
    Socket,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Stream => write!(f, "stream"),
            SinkKind::Socket => write!(f, "socket"),
        }
    }
}

/// Errors raised while delivering a frame to a sink.
#[derive(thiserror::Error, Debug)]
pub enum HubError {
    #[error("Queue closed: subscriber is gone")]
    QueueClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Send timed out after {0:?}")]
    SendTimedOut(Duration),
}

/// Convenience result type.
pub type HubResult<T> = Result<T, HubError>;
