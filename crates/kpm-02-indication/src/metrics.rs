//! Metrics hooks for the indication processor
//!
//! `ProcessorStats` is always kept by the processor. An additional
//! `IndicationRecorder` can forward the same events to an external system.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub trait IndicationRecorder: Send + Sync {
    /// `result` is "ok" or an `IndicationError::result_label`.
    fn record_indication(&self, result: &'static str, elapsed: Duration);

    fn record_points_emitted(&self, count: usize);

    fn record_sink_failure(&self);
}

#[derive(Default)]
pub struct NoOpRecorder;

impl IndicationRecorder for NoOpRecorder {
    fn record_indication(&self, _: &'static str, _: Duration) {}
    fn record_points_emitted(&self, _: usize) {}
    fn record_sink_failure(&self) {}
}

/// Lock-free processing counters.
#[derive(Default)]
pub struct ProcessorStats {
    pub processed: AtomicU64,
    pub decode_failures: AtomicU64,
    pub protocol_violations: AtomicU64,
    pub points_emitted: AtomicU64,
    pub sink_failures: AtomicU64,
}

impl ProcessorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProcessorSnapshot {
        ProcessorSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            protocol_violations: self.protocol_violations.load(Ordering::Relaxed),
            points_emitted: self.points_emitted.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}

impl IndicationRecorder for ProcessorStats {
    fn record_indication(&self, result: &'static str, _elapsed: Duration) {
        let counter = match result {
            "ok" => &self.processed,
            "protocol_error" => &self.protocol_violations,
            _ => &self.decode_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_points_emitted(&self, count: usize) {
        self.points_emitted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessorSnapshot {
    pub processed: u64,
    pub decode_failures: u64,
    pub protocol_violations: u64,
    pub points_emitted: u64,
    pub sink_failures: u64,
}
