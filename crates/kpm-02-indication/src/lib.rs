//! # KPM-02 Indication Normalization
//!
//! Turns E2SM-KPM Indication reports into time-series metric points.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure data, no I/O
//!   - `RicIndication`: E2AP envelope around the KPM header and message
//!   - `IndicationHeader`: node identity (gNB, en-gNB, ng-eNB, eNB)
//!   - `IndicationReport`: Format1 (cell level) or Format2 (per UE)
//!   - `flatten_report`: one `MetricPoint` per measurement label
//!   - `MetricPoint::to_line_protocol`: InfluxDB line rendering
//!
//! - **Ports Layer** (`ports/`)
//!   - `IndicationApi`: driving port used by the message dispatcher
//!   - `IndicationCodec`: driven port to the E2AP/E2SM decoder
//!   - `MetricSink`: driven port to the time-series database
//!
//! - **Service Layer** (`service/`)
//!   - `IndicationProcessor`: decode, flatten, write
//!
//! - **Adapters** (`adapters/`)
//!   - `InMemorySink`
//!
//! ## Rules
//!
//! | Input | Result |
//! |-------|--------|
//! | Label in a Format1 info item | one point |
//! | `Label` matching condition in Format2 | one point |
//! | `Test` matching condition | logged, no point |
//! | Measurement records | logged, not tied to labels |
//! | Absent label attribute | no tag or field |
//! | Decode failure or unknown discriminator | message discarded |
//!
//! Tags are `PLMNID`, `SliceID.SST`, `SliceID.SD`, with the raw octets taken
//! as text. Every point is written under the measurement `metrics`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemorySink;
pub use domain::{
    flatten_report, EnbId, FlattenedItem, FlattenedReport, GlobalKpmNodeId, HeaderFormat1,
    IndicationHeader, IndicationReport, IndicationType, MatchingCondition, MeasurementCondUeItem,
    MeasurementData, MeasurementInfoItem, MeasurementLabel, MeasurementRecord, MeasurementType,
    MetricPoint, NgEnbId, NodeContext, Precision, ReportFormat1, ReportFormat2, RicIndication,
    SliceId, TestCondition, TestExpression, TestType, TestValue,
};
pub use error::{DecodeStage, IndicationError, SinkError};
pub use metrics::{IndicationRecorder, NoOpRecorder, ProcessorSnapshot, ProcessorStats};
pub use ports::{IndicationApi, IndicationCodec, IndicationSummary, MetricSink};
pub use service::IndicationProcessor;
