//! Observation sink between the forwarding tasks and record consumers.
//!
//! The sink is an unbounded mpsc channel: pushes from the relay never block,
//! so a slow or absent consumer can never delay a forwarded byte. The flip
//! side is that an absent consumer lets queued records accumulate without
//! bound; records are never dropped, since dropping would falsify the
//! observation stream.

use log::trace;
use tokio::sync::mpsc;

use super::types::CaptureRecord;

/// Creates a connected sink/stream pair for one session.
pub fn record_channel() -> (RecordSink, RecordStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RecordSink { tx }, RecordStream { rx })
}

/// Producer side, shared by the two forwarding tasks.
#[derive(Clone)]
pub struct RecordSink {
    tx: mpsc::UnboundedSender<CaptureRecord>,
}

impl RecordSink {
    /// Enqueues a record without blocking. Returns `false` when the consumer
    /// side is gone; the relay keeps forwarding either way.
    pub fn push(&self, record: CaptureRecord) -> bool {
        let delivered = self.tx.send(record).is_ok();
        if !delivered {
            trace!("capture record dropped, consumer is gone");
        }
        delivered
    }
}

/// Consumer side; yields records in push order.
pub struct RecordStream {
    rx: mpsc::UnboundedReceiver<CaptureRecord>,
}

impl RecordStream {
    /// Waits for the next record. `None` once every sink handle is dropped
    /// and the queue is drained.
    pub async fn next(&mut self) -> Option<CaptureRecord> {
        self.rx.recv().await
    }

    /// Non-blocking variant, `None` when the queue is currently empty.
    pub fn try_next(&mut self) -> Option<CaptureRecord> {
        self.rx.try_recv().ok()
    }
}
