//! Ports layer: driving and driven interfaces

pub mod inbound;
pub mod outbound;

pub use inbound::{IndicationApi, IndicationSummary};
pub use outbound::{IndicationCodec, MetricSink};
