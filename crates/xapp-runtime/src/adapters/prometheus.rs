//! Prometheus recorder
//!
//! Forwards lifecycle and indication events to the `kpm-telemetry`
//! registry.

use std::time::Duration;

use kpm_01_subscription::{LifecycleRecorder, ProcedureKind, ProcedureState, TimerOutcome};
use kpm_02_indication::IndicationRecorder;
use kpm_telemetry::{
    metric_inc, EXPIRY_TIMERS_ACTIVE, INDICATIONS_PROCESSED, INDICATION_DURATION,
    METRIC_POINTS_EMITTED, PROCEDURE_OUTCOMES, REQUEST_SEND_ATTEMPTS, SINK_WRITE_FAILURES,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl LifecycleRecorder for PrometheusRecorder {
    fn record_send_attempt(&self, kind: ProcedureKind, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        metric_inc!(REQUEST_SEND_ATTEMPTS, &[kind.as_str(), outcome]);
    }

    fn record_outcome(&self, kind: ProcedureKind, state: ProcedureState) {
        if state.is_terminal() {
            metric_inc!(PROCEDURE_OUTCOMES, &[kind.as_str(), state.as_str()]);
        }
    }

    fn record_timer_armed(&self, _kind: ProcedureKind) {
        EXPIRY_TIMERS_ACTIVE.inc();
    }

    fn record_timer_resolved(&self, _kind: ProcedureKind, _outcome: TimerOutcome) {
        EXPIRY_TIMERS_ACTIVE.dec();
    }

    fn record_ignored_answer(&self, kind: ProcedureKind) {
        metric_inc!(PROCEDURE_OUTCOMES, &[kind.as_str(), "ignored"]);
    }
}

impl IndicationRecorder for PrometheusRecorder {
    fn record_indication(&self, result: &'static str, elapsed: Duration) {
        metric_inc!(INDICATIONS_PROCESSED, &[result]);
        INDICATION_DURATION.observe(elapsed.as_secs_f64());
    }

    fn record_points_emitted(&self, count: usize) {
        METRIC_POINTS_EMITTED.inc_by(count as u64);
    }

    fn record_sink_failure(&self) {
        metric_inc!(SINK_WRITE_FAILURES);
    }
}
