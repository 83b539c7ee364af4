//! # Message Dispatcher
//!
//! The single consumer of the inbound queue. Messages are handled one at a
//! time in arrival order and routed by type code:
//!
//! | Code | Handler |
//! |------|---------|
//! | 12050 | `IndicationApi::handle` |
//! | 12011 | `SubscriptionApi::on_subscription_response` |
//! | 12012 | `SubscriptionApi::on_subscription_failure` |
//! | 12021 | `DeletionApi::on_deletion_response` |
//! | 12022 | `DeletionApi::on_deletion_failure` |
//! | other | logged and discarded |
//!
//! A handler error is logged; the loop never exits because of one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kpm_01_subscription::{AnswerOutcome, DeletionApi, LifecycleError, SubscriptionApi};
use kpm_02_indication::IndicationApi;
use kpm_telemetry::{log_event, metric_inc, MESSAGES_DISCARDED, MESSAGES_RECEIVED};
use shared_bus::InboundQueue;
use shared_types::{MessageType, RicMessage};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const SUBSYSTEM: &str = "runtime";

/// What became of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Routed and handled.
    Handled(MessageType),
    /// Routed, but the answer was late or a duplicate.
    Ignored(MessageType),
    /// Routed, and the handler reported an error.
    Failed(MessageType),
    /// Unknown or outbound-only type code.
    Discarded(i32),
}

/// Dispatcher counters.
#[derive(Debug, Default)]
pub struct DispatcherStats {
    pub received: AtomicU64,
    pub handled: AtomicU64,
    pub ignored: AtomicU64,
    pub failed: AtomicU64,
    pub discarded: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherSnapshot {
    pub received: u64,
    pub handled: u64,
    pub ignored: u64,
    pub failed: u64,
    pub discarded: u64,
}

impl DispatcherStats {
    fn record(&self, outcome: DispatchOutcome) {
        self.received.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            DispatchOutcome::Handled(_) => &self.handled,
            DispatchOutcome::Ignored(_) => &self.ignored,
            DispatchOutcome::Failed(_) => &self.failed,
            DispatchOutcome::Discarded(_) => &self.discarded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherSnapshot {
        DispatcherSnapshot {
            received: self.received.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

pub struct MessageDispatcher {
    subscriptions: Arc<dyn SubscriptionApi>,
    deletions: Arc<dyn DeletionApi>,
    indications: Arc<dyn IndicationApi>,
    stats: Arc<DispatcherStats>,
}

impl MessageDispatcher {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionApi>,
        deletions: Arc<dyn DeletionApi>,
        indications: Arc<dyn IndicationApi>,
    ) -> Self {
        Self {
            subscriptions,
            deletions,
            indications,
            stats: Arc::new(DispatcherStats::default()),
        }
    }

    /// Shared handle to the counters, readable while `run` owns the
    /// dispatcher.
    pub fn stats(&self) -> Arc<DispatcherStats> {
        self.stats.clone()
    }

    /// Route one message.
    pub async fn dispatch(&self, msg: RicMessage) -> DispatchOutcome {
        metric_inc!(MESSAGES_RECEIVED, &[mtype_label(&msg).as_str()]);

        let outcome = match msg.message_type() {
            Some(MessageType::Indication) => match self.indications.handle(&msg).await {
                Ok(summary) => {
                    debug!(
                        ran_name = %msg.ran_name(),
                        points = summary.points_emitted,
                        sink_failures = summary.sink_failures,
                        "RIC_INDICATION handled"
                    );
                    DispatchOutcome::Handled(MessageType::Indication)
                }
                Err(_) => DispatchOutcome::Failed(MessageType::Indication),
            },
            Some(mtype @ MessageType::SubscriptionResponse) => answer_outcome(
                mtype,
                &msg,
                self.subscriptions
                    .on_subscription_response(&msg.meid, msg.sub_id, &msg.payload),
            ),
            Some(mtype @ MessageType::SubscriptionFailure) => answer_outcome(
                mtype,
                &msg,
                self.subscriptions
                    .on_subscription_failure(&msg.meid, msg.sub_id, &msg.payload),
            ),
            Some(mtype @ MessageType::SubscriptionDeleteResponse) => answer_outcome(
                mtype,
                &msg,
                self.deletions
                    .on_deletion_response(&msg.meid, msg.sub_id, &msg.payload),
            ),
            Some(mtype @ MessageType::SubscriptionDeleteFailure) => answer_outcome(
                mtype,
                &msg,
                self.deletions
                    .on_deletion_failure(&msg.meid, msg.sub_id, &msg.payload),
            ),
            Some(MessageType::SubscriptionRequest | MessageType::SubscriptionDeleteRequest)
            | None => {
                log_event!(
                    warn,
                    SUBSYSTEM,
                    "Unknown message type, discarding",
                    mtype = msg.mtype,
                    ran_name = %msg.ran_name()
                );
                metric_inc!(MESSAGES_DISCARDED);
                DispatchOutcome::Discarded(msg.mtype)
            }
        };

        self.stats.record(outcome);
        outcome
    }

    /// Consume `queue` until shutdown is signalled or every sender is gone.
    pub async fn run(
        self,
        mut queue: InboundQueue,
        mut shutdown: watch::Receiver<bool>,
    ) -> DispatcherSnapshot {
        log_event!(info, SUBSYSTEM, "Message dispatcher started");

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        log_event!(info, SUBSYSTEM, "Shutdown signal received");
                        break;
                    }
                }
                next = queue.recv() => match next {
                    Some(msg) => {
                        self.dispatch(msg).await;
                    }
                    None => {
                        log_event!(info, SUBSYSTEM, "Inbound queue closed");
                        break;
                    }
                },
            }
        }

        let snapshot = self.stats.snapshot();
        info!(
            received = snapshot.received,
            handled = snapshot.handled,
            ignored = snapshot.ignored,
            failed = snapshot.failed,
            discarded = snapshot.discarded,
            "Message dispatcher stopped"
        );
        snapshot
    }
}

/// Metric label for a message type. Codes off the wire outside the known
/// set share one series.
fn mtype_label(msg: &RicMessage) -> String {
    match msg.message_type() {
        Some(mtype) => mtype.code().to_string(),
        None => "unknown".to_string(),
    }
}

fn answer_outcome(
    mtype: MessageType,
    msg: &RicMessage,
    result: Result<AnswerOutcome, LifecycleError>,
) -> DispatchOutcome {
    match result {
        Ok(outcome) if outcome.is_first_answer() => DispatchOutcome::Handled(mtype),
        Ok(_) => DispatchOutcome::Ignored(mtype),
        Err(e) => {
            warn!(
                mtype = msg.mtype,
                ran_name = %msg.ran_name(),
                error = %e,
                "Handler failed"
            );
            DispatchOutcome::Failed(mtype)
        }
    }
}
