//! # InfluxDB Sink
//!
//! Writes each metric point as one line of line protocol to
//! `{addr}/write?db={database}&precision={precision}`. Query values are
//! form-encoded.

use std::time::Duration;

use async_trait::async_trait;
use kpm_02_indication::{MetricPoint, MetricSink, Precision, SinkError};
use tracing::{debug, info};

use crate::container::SinkConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct InfluxSink {
    client: reqwest::Client,
    write_url: reqwest::Url,
    precision: Precision,
    credentials: Option<(String, Option<String>)>,
}

impl InfluxSink {
    /// Fails with `SinkError::Unreachable` when no address is configured, the
    /// address is not a URL, or the HTTP client cannot be built.
    pub fn new(config: &SinkConfig) -> Result<Self, SinkError> {
        let addr = config
            .addr
            .as_deref()
            .ok_or_else(|| SinkError::Unreachable("influxAddr is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            write_url: write_url(addr, &config.database, config.precision)?,
            precision: config.precision,
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn write_url(&self) -> &str {
        self.write_url.as_str()
    }
}

fn write_url(
    addr: &str,
    database: &str,
    precision: Precision,
) -> Result<reqwest::Url, SinkError> {
    let mut url = reqwest::Url::parse(&format!("{}/write", addr.trim_end_matches('/')))
        .map_err(|e| SinkError::Unreachable(format!("invalid influxAddr {addr}: {e}")))?;
    url.query_pairs_mut()
        .append_pair("db", database)
        .append_pair("precision", precision.as_str());
    Ok(url)
}

#[async_trait]
impl MetricSink for InfluxSink {
    async fn write(&self, point: &MetricPoint) -> Result<(), SinkError> {
        let line = point.to_line_protocol(self.precision)?;
        debug!(line = %line, "Writing metric point");

        let mut request = self.client.post(self.write_url.clone()).body(line);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Sink used when no database is configured: points are logged.
#[derive(Debug, Default)]
pub struct LogSink {
    precision: Precision,
}

impl LogSink {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }
}

#[async_trait]
impl MetricSink for LogSink {
    async fn write(&self, point: &MetricPoint) -> Result<(), SinkError> {
        let line = point.to_line_protocol(self.precision)?;
        info!(line = %line, "Metric point");
        Ok(())
    }
}
