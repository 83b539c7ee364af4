//! Domain layer: the decoded E2SM-KPM tree and its flattening

pub mod envelope;
pub mod flatten;
pub mod header;
pub mod label;
pub mod metric;
pub mod report;

pub use envelope::{IndicationType, RicIndication};
pub use flatten::{flatten_report, FlattenedItem, FlattenedReport};
pub use header::{EnbId, GlobalKpmNodeId, HeaderFormat1, IndicationHeader, NgEnbId, NodeContext};
pub use label::{MeasurementLabel, SliceId, TAG_PLMN_ID, TAG_SLICE_SD, TAG_SLICE_SST};
pub use metric::{MetricPoint, Precision, MEASUREMENT_NAME};
pub use report::{
    IndicationReport, MatchingCondition, MeasurementCondUeItem, MeasurementData,
    MeasurementInfoItem, MeasurementRecord, MeasurementType, ReportFormat1, ReportFormat2,
    TestCondition, TestExpression, TestType, TestValue,
};
