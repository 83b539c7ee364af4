//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on startup lines
    pub service_name: String,

    /// Filter directive (e.g. `info`, `kpm_01_subscription=debug`)
    pub log_level: String,

    /// JSON formatted log lines
    pub json_logs: bool,

    /// Annotate lines with the emitting thread id
    pub thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "kpimon".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            thread_ids: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `KPIMON_SERVICE_NAME`: service name (default: kpimon)
    /// - `KPIMON_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `KPIMON_JSON_LOGS`: JSON output (default: false, true in containers)
    /// - `KPIMON_THREAD_IDS`: thread id annotation (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("KPIMON_SERVICE_NAME")
                .unwrap_or_else(|_| "kpimon".to_string()),

            log_level: env::var("KPIMON_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("KPIMON_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            thread_ids: env::var("KPIMON_THREAD_IDS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
