//! # Expiry timer
//!
//! `Armed -> {Expired | Cancelled}`. One task per armed node. The task waits
//! on whichever comes first: the duration elapsing, or the node's answered
//! notification. It then check-and-removes the table entry under the lock;
//! the flag it finds decides the outcome, so a late wake-up on either branch
//! still yields exactly one outcome.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::answered::AnsweredTable;
use crate::error::LifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOutcome {
    /// The duration elapsed with no answer.
    Expired,
    /// An answer arrived first.
    Cancelled,
}

impl fmt::Display for TimerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("expired"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Notified once per armed timer with its outcome.
#[async_trait]
pub trait ExpiryObserver: Send + Sync {
    async fn on_timer_resolved(&self, ran_name: &str, outcome: TimerOutcome);
}

pub struct ExpiryTimer;

impl ExpiryTimer {
    /// Insert `(ran_name -> false)` into `table` and start the countdown.
    ///
    /// Fails without spawning if the node already has an armed entry.
    pub fn arm(
        table: Arc<AnsweredTable>,
        ran_name: &str,
        duration: Duration,
        observer: Arc<dyn ExpiryObserver>,
    ) -> Result<JoinHandle<TimerOutcome>, LifecycleError> {
        let armed = table.arm(ran_name)?;
        let ran_name = ran_name.to_string();

        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = armed.notify.notified() => {}
            }

            let outcome = match table.resolve(&ran_name, armed.generation) {
                Some(false) => {
                    info!(
                        table = table.label(),
                        ran_name = %ran_name,
                        timeout_ms = duration.as_millis() as u64,
                        "Request expired without an answer"
                    );
                    TimerOutcome::Expired
                }
                Some(true) => {
                    info!(
                        table = table.label(),
                        ran_name = %ran_name,
                        "Answer received, expiry timer cancelled"
                    );
                    TimerOutcome::Cancelled
                }
                None => {
                    // Only this task removes the entry.
                    warn!(
                        table = table.label(),
                        ran_name = %ran_name,
                        "Answered flag vanished before the timer resolved"
                    );
                    TimerOutcome::Cancelled
                }
            };

            observer.on_timer_resolved(&ran_name, outcome).await;
            outcome
        }))
    }
}
