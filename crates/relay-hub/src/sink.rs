//! Connection sinks — the per-connection end of a broadcast.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{Frame, HubError, HubResult, SinkId, SinkKind};

/// A single connection's ability to receive outbound messages.
#[async_trait]
pub trait Sink: Send + Sync {
    fn id(&self) -> SinkId;

    fn kind(&self) -> SinkKind;

    /// Hand one frame to the connection.
    async fn deliver(&self, frame: Frame) -> HubResult<()>;
}

/// Stream-transport sink: delivery enqueues onto an unbounded per-connection queue.
///
/// The queue is drained by the subscriber's own reader loop, which is also the
/// only party that removes this sink from the registry.
pub struct QueueSink {
    id: SinkId,
    tx: mpsc::UnboundedSender<Frame>,
}

impl QueueSink {
    /// Create a sink together with the receiving end of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: SinkId::new(),
                tx,
            },
            rx,
        )
    }
}

#[async_trait]
impl Sink for QueueSink {
    fn id(&self) -> SinkId {
        self.id
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Stream
    }

    async fn deliver(&self, frame: Frame) -> HubResult<()> {
        self.tx.send(frame).map_err(|_| HubError::QueueClosed)
    }
}

/// Write half of a persistent connection.
#[async_trait]
pub trait FrameWriter: Send + Sync {
    async fn write_frame(&self, frame: &str) -> HubResult<()>;
}

/// Socket-transport sink: delivery is an immediate write attempt.
pub struct DirectSink<W> {
    id: SinkId,
    writer: W,
    timeout: Option<Duration>,
}

impl<W: FrameWriter> DirectSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            id: SinkId::new(),
            writer,
            timeout: None,
        }
    }

    /// Treat a write that takes longer than `timeout` as a failed delivery.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<W: FrameWriter> Sink for DirectSink<W> {
    fn id(&self) -> SinkId {
        self.id
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Socket
    }

    async fn deliver(&self, frame: Frame) -> HubResult<()> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.writer.write_frame(&frame))
                .await
                .map_err(|_| HubError::SendTimedOut(limit))?,
            None => self.writer.write_frame(&frame).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct StalledWriter;

    #[async_trait]
    impl FrameWriter for StalledWriter {
        async fn write_frame(&self, _frame: &str) -> HubResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_queue_sink_enqueues_in_order() {
        let (sink, mut rx) = QueueSink::channel();
        tokio_test::assert_ok!(sink.deliver(Arc::from("a")).await);
        tokio_test::assert_ok!(sink.deliver(Arc::from("b")).await);
        assert_eq!(&*rx.recv().await.unwrap(), "a");
        assert_eq!(&*rx.recv().await.unwrap(), "b");
        assert_eq!(sink.kind(), SinkKind::Stream);
    }

    #[tokio::test]
    async fn test_queue_sink_reports_closed_queue() {
        let (sink, rx) = QueueSink::channel();
        drop(rx);
        let err = sink.deliver(Arc::from("a")).await.unwrap_err();
        assert!(matches!(err, HubError::QueueClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_sink_times_out_stalled_writer() {
        let sink = DirectSink::new(StalledWriter).with_timeout(Duration::from_millis(20));
        let err = sink.deliver(Arc::from("a")).await.unwrap_err();
        assert!(matches!(err, HubError::SendTimedOut(_)));
        assert_eq!(sink.kind(), SinkKind::Socket);
    }

    #[test]
    fn test_sink_ids_are_unique() {
        let (a, _rx_a) = QueueSink::channel();
        let (b, _rx_b) = QueueSink::channel();
        assert_ne!(a.id(), b.id());
    }
}
