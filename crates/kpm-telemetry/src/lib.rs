//! # KPM Telemetry
//!
//! Process observability for the KPIMON xApp.
//!
//! ## Components
//!
//! - **Logging**: a `tracing-subscriber` fmt subscriber (pretty or JSON)
//!   filtered by an `EnvFilter`.
//! - **Metrics**: Prometheus counters for subscription procedures,
//!   indications and dispatcher activity, rendered in the text exposition
//!   format by [`encode_metrics`].
//!
//! These are not the KPM measurements themselves. Those go to the metric
//! sink owned by the indication pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kpm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KPIMON_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `KPIMON_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `KPIMON_SERVICE_NAME` | `kpimon` | Service name stamped on startup lines |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, EXPIRY_TIMERS_ACTIVE,
    INDICATIONS_PROCESSED, INDICATION_DURATION, MESSAGES_DISCARDED, MESSAGES_RECEIVED,
    METRIC_POINTS_EMITTED, PROCEDURE_OUTCOMES, REQUEST_SEND_ATTEMPTS, SINK_WRITE_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Call once, from the binary. Libraries never install a subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Keeps telemetry alive for the lifetime of the process.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

/// Emit a structured log line stamped with a `subsystem` field.
///
/// ```rust,ignore
/// log_event!(info, "kpm-01", "Subscription confirmed", ran_name = %ran);
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Emit a structured log line about a radio node.
#[macro_export]
macro_rules! log_node_event {
    ($level:ident, $subsystem:expr, $msg:expr, $ran_name:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            ran_name = %$ran_name,
            $($($field)*,)?
            $msg
        )
    };
}

/// Increment a counter, optionally with label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
