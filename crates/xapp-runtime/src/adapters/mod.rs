//! # Adapters
//!
//! Implementations of the subsystem ports for this process.
//!
//! - `SerdeCodec`: both codec ports, bincode over the typed PDU model
//! - `InfluxSink` / `LogSink`: metric sinks
//! - `PrometheusRecorder`: lifecycle and indication metrics

pub mod codec;
pub mod influx;
pub mod prometheus;

pub use codec::{ActionDefinition, EventTriggerDefinition, SerdeCodec};
pub use influx::{InfluxSink, LogSink};
pub use prometheus::PrometheusRecorder;
