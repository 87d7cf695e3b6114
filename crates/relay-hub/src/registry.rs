//! Process-wide set of live sinks and the broadcast fan-out over it.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::sink::Sink;
use crate::types::{Frame, SinkId, SinkKind};

/// Live sinks, partitioned by transport.
#[derive(Default)]
struct SinkSet {
    streams: Vec<Arc<dyn Sink>>,
    sockets: Vec<Arc<dyn Sink>>,
}

impl SinkSet {
    fn partition_mut(&mut self, kind: SinkKind) -> &mut Vec<Arc<dyn Sink>> {
        match kind {
            SinkKind::Stream => &mut self.streams,
            SinkKind::Socket => &mut self.sockets,
        }
    }
}

/// Number of registered sinks per transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkCounts {
    pub streams: usize,
    pub sockets: usize,
}

impl SinkCounts {
    pub fn total(&self) -> usize {
        self.streams + self.sockets
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default)]
pub struct BroadcastReport {
    /// Sinks in the snapshot taken when the broadcast started.
    pub recipients: usize,
    /// Sinks that accepted the frame.
    pub delivered: usize,
    /// Socket sinks unregistered because delivery failed.
    pub removed: Vec<SinkId>,
}

/// Registry of live sinks.
///
/// The sink set sits behind a short synchronous lock that is never held across
/// an await, so `register`/`unregister` may be called from any task or from
/// `Drop`. Broadcasts are serialized by a separate async lock held for the whole
/// fan-out: each sink observes frames in the order `broadcast` was called.
pub struct SinkRegistry {
    sinks: Mutex<SinkSet>,
    fanout: tokio::sync::Mutex<()>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(SinkSet::default()),
            fanout: tokio::sync::Mutex::new(()),
        }
    }

    fn set(&self) -> MutexGuard<'_, SinkSet> {
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a sink. Registering an id that is already present replaces it.
    pub fn register(&self, sink: Arc<dyn Sink>) -> SinkId {
        let id = sink.id();
        let kind = sink.kind();
        let counts = {
            let mut set = self.set();
            let partition = set.partition_mut(kind);
            partition.retain(|s| s.id() != id);
            partition.push(sink);
            SinkCounts {
                streams: set.streams.len(),
                sockets: set.sockets.len(),
            }
        };
        tracing::info!(
            "Registered {kind} sink {id}. Active: {} streams, {} sockets",
            counts.streams,
            counts.sockets
        );
        id
    }

    /// Remove a sink. Removing an absent sink is a no-op that returns `false`.
    pub fn unregister(&self, id: SinkId) -> bool {
        let (removed, counts) = {
            let mut set = self.set();
            let before = set.streams.len() + set.sockets.len();
            set.streams.retain(|s| s.id() != id);
            set.sockets.retain(|s| s.id() != id);
            let counts = SinkCounts {
                streams: set.streams.len(),
                sockets: set.sockets.len(),
            };
            (counts.total() < before, counts)
        };
        if removed {
            tracing::info!(
                "Unregistered sink {id}. Active: {} streams, {} sockets",
                counts.streams,
                counts.sockets
            );
        }
        removed
    }

    pub fn contains(&self, id: SinkId) -> bool {
        let set = self.set();
        set.streams.iter().chain(set.sockets.iter()).any(|s| s.id() == id)
    }

    pub fn counts(&self) -> SinkCounts {
        let set = self.set();
        SinkCounts {
            streams: set.streams.len(),
            sockets: set.sockets.len(),
        }
    }

    /// Immutable copy of the current sink set: stream sinks first, then socket sinks.
    pub fn snapshot(&self) -> Vec<Arc<dyn Sink>> {
        let set = self.set();
        set.streams.iter().chain(set.sockets.iter()).cloned().collect()
    }

    /// Serialize `message` once and deliver it to every registered sink.
    pub async fn broadcast(&self, message: &Value) -> BroadcastReport {
        match serde_json::to_string(message) {
            Ok(text) => self.broadcast_frame(Frame::from(text)).await,
            Err(e) => {
                tracing::warn!("Failed to serialize broadcast message: {e}");
                BroadcastReport::default()
            }
        }
    }

    /// Deliver one frame to every sink in a snapshot taken at call time.
    ///
    /// A failed socket delivery unregisters that sink and never stops delivery
    /// to the rest of the snapshot. Stream sinks are only ever removed by their
    /// own subscriber.
    pub async fn broadcast_frame(&self, frame: Frame) -> BroadcastReport {
        let _turn = self.fanout.lock().await;
        let snapshot = self.snapshot();

        let streams = snapshot
            .iter()
            .filter(|s| s.kind() == SinkKind::Stream)
            .count();
        tracing::debug!(
            "Broadcasting message to {} queues and {} sockets: {frame}",
            streams,
            snapshot.len() - streams
        );

        let mut report = BroadcastReport {
            recipients: snapshot.len(),
            ..BroadcastReport::default()
        };

        for sink in snapshot {
            match sink.deliver(frame.clone()).await {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::trace!("Delivered to {} sink {}", sink.kind(), sink.id());
                }
                Err(e) => match sink.kind() {
                    SinkKind::Socket => {
                        tracing::warn!("Failed to send to socket sink {}: {e}", sink.id());
                        if self.unregister(sink.id()) {
                            report.removed.push(sink.id());
                        }
                    }
                    SinkKind::Stream => {
                        tracing::debug!("Stream sink {} did not accept frame: {e}", sink.id());
                    }
                },
            }
        }

        report
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
