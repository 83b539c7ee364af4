//! Metrics hooks for subscription procedures
//!
//! `LifecycleMetrics` keeps lock-free counters with a snapshot. Implement
//! `LifecycleRecorder` to forward to an external metrics system.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::domain::{ProcedureKind, ProcedureState, TimerOutcome};

/// Hooks called by the lifecycle managers.
pub trait LifecycleRecorder: Send + Sync {
    fn record_send_attempt(&self, kind: ProcedureKind, success: bool);

    fn record_outcome(&self, kind: ProcedureKind, state: ProcedureState);

    fn record_timer_armed(&self, kind: ProcedureKind);

    fn record_timer_resolved(&self, kind: ProcedureKind, outcome: TimerOutcome);

    /// A response or failure arrived with no armed entry, or twice.
    fn record_ignored_answer(&self, kind: ProcedureKind);
}

/// No-op recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpRecorder;

impl LifecycleRecorder for NoOpRecorder {
    fn record_send_attempt(&self, _: ProcedureKind, _: bool) {}
    fn record_outcome(&self, _: ProcedureKind, _: ProcedureState) {}
    fn record_timer_armed(&self, _: ProcedureKind) {}
    fn record_timer_resolved(&self, _: ProcedureKind, _: TimerOutcome) {}
    fn record_ignored_answer(&self, _: ProcedureKind) {}
}

/// Thread-safe lifecycle counters.
#[derive(Default)]
pub struct LifecycleMetrics {
    pub send_ok: AtomicU64,
    pub send_failed: AtomicU64,
    pub confirmed: AtomicU64,
    pub failed: AtomicU64,
    pub expired: AtomicU64,
    pub cancelled: AtomicU64,
    pub timers_armed: AtomicU64,
    pub timers_active: AtomicI64,
    pub ignored_answers: AtomicU64,
}

impl LifecycleMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            send_ok: self.send_ok.load(Ordering::Relaxed),
            send_failed: self.send_failed.load(Ordering::Relaxed),
            confirmed: self.confirmed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            timers_armed: self.timers_armed.load(Ordering::Relaxed),
            timers_active: self.timers_active.load(Ordering::Relaxed),
            ignored_answers: self.ignored_answers.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub send_ok: u64,
    pub send_failed: u64,
    pub confirmed: u64,
    pub failed: u64,
    pub expired: u64,
    pub cancelled: u64,
    pub timers_armed: u64,
    pub timers_active: i64,
    pub ignored_answers: u64,
}

impl LifecycleRecorder for LifecycleMetrics {
    fn record_send_attempt(&self, _kind: ProcedureKind, success: bool) {
        if success {
            self.send_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.send_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_outcome(&self, _kind: ProcedureKind, state: ProcedureState) {
        let counter = match state {
            ProcedureState::Pending => return,
            ProcedureState::Confirmed => &self.confirmed,
            ProcedureState::Failed => &self.failed,
            ProcedureState::Expired => &self.expired,
            ProcedureState::Cancelled => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_timer_armed(&self, _kind: ProcedureKind) {
        self.timers_armed.fetch_add(1, Ordering::Relaxed);
        self.timers_active.fetch_add(1, Ordering::Relaxed);
    }

    fn record_timer_resolved(&self, _kind: ProcedureKind, _outcome: TimerOutcome) {
        self.timers_active.fetch_sub(1, Ordering::Relaxed);
    }

    fn record_ignored_answer(&self, _kind: ProcedureKind) {
        self.ignored_answers.fetch_add(1, Ordering::Relaxed);
    }
}
