//! # Inbound Queue
//!
//! One bounded FIFO from the message router to the dispatcher. Senders are
//! cheap to clone; there is exactly one `InboundQueue`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shared_types::{RicMessage, TransportError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Create a connected sender/queue pair.
pub fn inbound_channel(capacity: usize) -> (InboundSender, InboundQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let delivered = Arc::new(AtomicU64::new(0));
    (
        InboundSender {
            tx,
            delivered: delivered.clone(),
        },
        InboundQueue { rx, delivered },
    )
}

/// Producer handle used by the router (or by tests) to hand messages to
/// the xApp.
#[derive(Clone)]
pub struct InboundSender {
    tx: mpsc::Sender<RicMessage>,
    delivered: Arc<AtomicU64>,
}

impl InboundSender {
    /// Enqueue a message, waiting for space if the queue is full.
    pub async fn deliver(&self, msg: RicMessage) -> Result<(), TransportError> {
        debug!(mtype = msg.mtype, ran_name = %msg.meid.ran_name, "Inbound message queued");
        self.tx.send(msg).await.map_err(|_| TransportError::Closed)?;
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Enqueue without waiting.
    pub fn try_deliver(&self, msg: RicMessage) -> Result<(), TransportError> {
        self.tx.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
            mpsc::error::TrySendError::Full(m) => TransportError::SendFailed {
                mtype: m.mtype,
                ran_name: m.meid.ran_name,
                reason: "inbound queue full".to_string(),
            },
        })?;
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer end, owned by the dispatcher.
pub struct InboundQueue {
    rx: mpsc::Receiver<RicMessage>,
    delivered: Arc<AtomicU64>,
}

impl InboundQueue {
    /// Next message in arrival order. `None` once every sender is dropped
    /// and the queue is drained.
    pub async fn recv(&mut self) -> Option<RicMessage> {
        self.rx.recv().await
    }

    /// Total messages ever enqueued.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn into_stream(self) -> ReceiverStream<RicMessage> {
        ReceiverStream::new(self.rx)
    }
}
