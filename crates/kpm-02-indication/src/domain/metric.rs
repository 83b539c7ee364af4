//! Metric points and InfluxDB line protocol rendering

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::label::MeasurementLabel;
use crate::error::SinkError;

/// Measurement name every KPM point is written under.
pub const MEASUREMENT_NAME: &str = "metrics";

/// One time-series point derived from one measurement label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, i64>,
    pub timestamp: DateTime<Utc>,
}

impl MetricPoint {
    pub fn from_label(label: &MeasurementLabel, timestamp: DateTime<Utc>) -> Self {
        Self {
            measurement: MEASUREMENT_NAME.to_string(),
            tags: label.tags(),
            fields: label.fields(),
            timestamp,
        }
    }

    /// Render as one line of InfluxDB line protocol.
    ///
    /// Fails with `SinkError::NoFields` when the label reported no numeric
    /// attribute, since a line without fields is rejected by the database.
    /// Tag values holding control characters are written as `0x`-prefixed
    /// hex of their bytes; line protocol has no escape for them.
    pub fn to_line_protocol(&self, precision: Precision) -> Result<String, SinkError> {
        if self.fields.is_empty() {
            return Err(SinkError::NoFields);
        }

        let mut line = escape(&self.measurement, &[',', ' ']);
        for (key, value) in &self.tags {
            let _ = write!(
                line,
                ",{}={}",
                escape(key, &[',', '=', ' ']),
                tag_value(value)
            );
        }

        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}={}i", escape(key, &[',', '=', ' ']), value))
            .collect();
        let _ = write!(
            line,
            " {} {}",
            fields.join(","),
            precision.timestamp(&self.timestamp)
        );
        Ok(line)
    }
}

fn tag_value(raw: &str) -> String {
    if raw.chars().any(char::is_control) {
        format!("0x{}", hex::encode(raw.as_bytes()))
    } else {
        escape(raw, &[',', '=', ' '])
    }
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Timestamp precision of the time-series database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
}

impl Precision {
    /// Query-string value understood by the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Nanoseconds => "ns",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
        }
    }

    pub fn timestamp(self, at: &DateTime<Utc>) -> i64 {
        match self {
            Precision::Nanoseconds => at
                .timestamp_nanos_opt()
                .unwrap_or_else(|| at.timestamp_micros().saturating_mul(1_000)),
            Precision::Microseconds => at.timestamp_micros(),
            Precision::Milliseconds => at.timestamp_millis(),
            Precision::Seconds => at.timestamp(),
        }
    }
}

impl FromStr for Precision {
    type Err = SinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" | "n" => Ok(Precision::Nanoseconds),
            "us" | "u" => Ok(Precision::Microseconds),
            "ms" => Ok(Precision::Milliseconds),
            "s" => Ok(Precision::Seconds),
            other => Err(SinkError::InvalidPrecision(other.to_string())),
        }
    }
}
