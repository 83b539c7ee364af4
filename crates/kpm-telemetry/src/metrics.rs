//! Prometheus metrics for the KPIMON xApp.
//!
//! Naming convention: `kpimon_<area>_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Registry for every xApp metric
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SUBSCRIPTION LIFECYCLE
    // =========================================================================

    /// Transport send attempts for Create/Delete requests
    pub static ref REQUEST_SEND_ATTEMPTS: IntCounterVec = IntCounterVec::new(
        Opts::new("kpimon_request_send_attempts_total", "Subscription request send attempts"),
        &["procedure", "outcome"]  // procedure: create/delete, outcome: ok/error
    ).expect("metric creation failed");

    /// Terminal procedure outcomes
    pub static ref PROCEDURE_OUTCOMES: IntCounterVec = IntCounterVec::new(
        Opts::new("kpimon_procedure_outcomes_total", "Subscription procedure terminal outcomes"),
        &["procedure", "outcome"]  // confirmed/failed/expired/cancelled
    ).expect("metric creation failed");

    /// Expiry timers currently armed
    pub static ref EXPIRY_TIMERS_ACTIVE: IntGauge = IntGauge::new(
        "kpimon_expiry_timers_active",
        "Expiry timers currently waiting for an answer"
    ).expect("metric creation failed");

    // =========================================================================
    // INDICATION PIPELINE
    // =========================================================================

    /// Indications handled, by result
    pub static ref INDICATIONS_PROCESSED: IntCounterVec = IntCounterVec::new(
        Opts::new("kpimon_indications_total", "RIC Indications handled"),
        &["result"]  // ok/decode_error/protocol_error
    ).expect("metric creation failed");

    /// Metric points handed to the sink
    pub static ref METRIC_POINTS_EMITTED: IntCounter = IntCounter::new(
        "kpimon_metric_points_total",
        "Metric points produced from KPM reports"
    ).expect("metric creation failed");

    /// Sink writes that failed
    pub static ref SINK_WRITE_FAILURES: IntCounter = IntCounter::new(
        "kpimon_sink_write_failures_total",
        "Metric sink write failures"
    ).expect("metric creation failed");

    /// Indication handling latency
    pub static ref INDICATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "kpimon_indication_duration_seconds",
            "Time spent decoding and flattening one indication"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // DISPATCHER
    // =========================================================================

    /// Inbound messages by type code
    pub static ref MESSAGES_RECEIVED: IntCounterVec = IntCounterVec::new(
        Opts::new("kpimon_messages_received_total", "Inbound messages by type code"),
        &["mtype"]
    ).expect("metric creation failed");

    /// Inbound messages with an unknown type code
    pub static ref MESSAGES_DISCARDED: IntCounter = IntCounter::new(
        "kpimon_messages_discarded_total",
        "Inbound messages discarded for an unknown type code"
    ).expect("metric creation failed");
}

/// Keeps the registry referenced.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register every metric with the registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REQUEST_SEND_ATTEMPTS.clone()),
        Box::new(PROCEDURE_OUTCOMES.clone()),
        Box::new(EXPIRY_TIMERS_ACTIVE.clone()),
        Box::new(INDICATIONS_PROCESSED.clone()),
        Box::new(METRIC_POINTS_EMITTED.clone()),
        Box::new(SINK_WRITE_FAILURES.clone()),
        Box::new(INDICATION_DURATION.clone()),
        Box::new(MESSAGES_RECEIVED.clone()),
        Box::new(MESSAGES_DISCARDED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
