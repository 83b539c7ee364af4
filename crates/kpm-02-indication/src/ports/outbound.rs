//! Outbound Ports (Driven Ports)
//!
//! The E2AP/E2SM-KPM decoder and the time-series sink.

use async_trait::async_trait;
use shared_types::DecodeError;

use crate::domain::{IndicationHeader, IndicationReport, MetricPoint, RicIndication};
use crate::error::SinkError;

/// Decoder for Indication payloads.
///
/// Each call either yields a fully materialized value or a `DecodeError`.
/// Unknown discriminators must surface as
/// `DecodeError::UnknownDiscriminator`.
pub trait IndicationCodec: Send + Sync {
    fn decode_ric_indication(&self, payload: &[u8]) -> Result<RicIndication, DecodeError>;

    fn decode_indication_header(&self, bytes: &[u8]) -> Result<IndicationHeader, DecodeError>;

    fn decode_indication_message(&self, bytes: &[u8]) -> Result<IndicationReport, DecodeError>;
}

/// Time-series sink. One call per point.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn write(&self, point: &MetricPoint) -> Result<(), SinkError>;
}
