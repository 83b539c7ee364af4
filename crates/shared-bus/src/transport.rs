//! # RIC Transport
//!
//! The sending side of the message router.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{RicMessage, TransportError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::DEFAULT_CHANNEL_CAPACITY;

/// Fire-and-forget transport toward radio nodes.
///
/// `Ok(())` means the router accepted the message, nothing more.
#[async_trait]
pub trait RicTransport: Send + Sync {
    /// Route a message by its type code and node identity.
    async fn send(&self, msg: RicMessage) -> Result<(), TransportError>;

    /// Route a message back to the endpoint that sent the message being
    /// answered.
    async fn reply_to_sender(&self, msg: RicMessage) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: RicTransport + ?Sized> RicTransport for Arc<T> {
    async fn send(&self, msg: RicMessage) -> Result<(), TransportError> {
        (**self).send(msg).await
    }

    async fn reply_to_sender(&self, msg: RicMessage) -> Result<(), TransportError> {
        (**self).reply_to_sender(msg).await
    }
}

/// A message accepted by the in-memory transport.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: RicMessage,
    pub reply: bool,
}

/// In-process router.
///
/// Accepted messages are recorded and re-broadcast to any outbound tap.
/// `fail_next(n)` makes the next `n` sends fail, which is how send retry
/// behaviour is exercised.
pub struct InMemoryTransport {
    sent: Mutex<Vec<SentMessage>>,
    attempts: AtomicU64,
    fail_remaining: AtomicU32,
    fail_always: AtomicBool,
    outbound: broadcast::Sender<RicMessage>,
}

impl InMemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        let (outbound, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            sent: Mutex::new(Vec::new()),
            attempts: AtomicU64::new(0),
            fail_remaining: AtomicU32::new(0),
            fail_always: AtomicBool::new(false),
            outbound,
        }
    }

    /// Fail the next `n` send attempts.
    pub fn fail_next(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    /// Fail every send attempt until cleared.
    pub fn set_fail_always(&self, fail: bool) {
        self.fail_always.store(fail, Ordering::SeqCst);
    }

    /// Total send attempts, successful or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Messages accepted so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Receive a copy of every accepted message from now on.
    pub fn tap(&self) -> broadcast::Receiver<RicMessage> {
        self.outbound.subscribe()
    }

    fn should_fail(&self) -> bool {
        if self.fail_always.load(Ordering::SeqCst) {
            return true;
        }
        self.fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn accept(&self, msg: RicMessage, reply: bool) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.should_fail() {
            warn!(
                mtype = msg.mtype,
                ran_name = %msg.meid.ran_name,
                "Injected transport failure"
            );
            return Err(TransportError::SendFailed {
                mtype: msg.mtype,
                ran_name: msg.meid.ran_name.clone(),
                reason: "router rejected message".to_string(),
            });
        }

        debug!(
            mtype = msg.mtype,
            sub_id = msg.sub_id,
            ran_name = %msg.meid.ran_name,
            bytes = msg.payload.len(),
            reply,
            "Message routed"
        );

        // No tap attached is not an error.
        let _ = self.outbound.send(msg.clone());
        self.sent.lock().push(SentMessage { message: msg, reply });
        Ok(())
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RicTransport for InMemoryTransport {
    async fn send(&self, msg: RicMessage) -> Result<(), TransportError> {
        self.accept(msg, false)
    }

    async fn reply_to_sender(&self, msg: RicMessage) -> Result<(), TransportError> {
        self.accept(msg, true)
    }
}
