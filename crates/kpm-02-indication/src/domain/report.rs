//! E2SM-KPM Indication Message
//!
//! Two report formats share the same skeleton: a granularity period, an
//! optional subscription id and cell object id, a list of measurement
//! descriptions and a list of measurement data. Format2 replaces plain
//! labels with matching conditions and adds matched UE ids.

use serde::{Deserialize, Serialize};
use shared_types::BitString;

use crate::domain::label::MeasurementLabel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicationReport {
    /// Cell-level report.
    Format1(ReportFormat1),
    /// Per-UE report.
    Format2(ReportFormat2),
}

impl IndicationReport {
    pub fn format(&self) -> u8 {
        match self {
            IndicationReport::Format1(_) => 1,
            IndicationReport::Format2(_) => 2,
        }
    }

    pub fn granularity_period(&self) -> Option<u32> {
        match self {
            IndicationReport::Format1(f) => f.granularity_period,
            IndicationReport::Format2(f) => f.granularity_period,
        }
    }

    pub fn subscription_id(&self) -> Option<i64> {
        match self {
            IndicationReport::Format1(f) => f.subscription_id,
            IndicationReport::Format2(f) => f.subscription_id,
        }
    }

    pub fn cell_object_id(&self) -> Option<&str> {
        match self {
            IndicationReport::Format1(f) => f.cell_object_id.as_deref(),
            IndicationReport::Format2(f) => f.cell_object_id.as_deref(),
        }
    }

    pub fn measurement_data(&self) -> &[MeasurementData] {
        match self {
            IndicationReport::Format1(f) => &f.measurement_data,
            IndicationReport::Format2(f) => &f.measurement_data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFormat1 {
    /// Milliseconds; `None` when the node omitted it.
    pub granularity_period: Option<u32>,
    pub subscription_id: Option<i64>,
    pub cell_object_id: Option<String>,
    pub measurement_info: Vec<MeasurementInfoItem>,
    pub measurement_data: Vec<MeasurementData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFormat2 {
    pub granularity_period: Option<u32>,
    pub subscription_id: Option<i64>,
    pub cell_object_id: Option<String>,
    pub measurement_cond_ue: Vec<MeasurementCondUeItem>,
    pub measurement_data: Vec<MeasurementData>,
}

/// How a measurement is identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementType {
    ById(i64),
    ByName(String),
}

impl std::fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementType::ById(id) => write!(f, "id:{}", id),
            MeasurementType::ByName(name) => write!(f, "name:{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementInfoItem {
    pub measurement: MeasurementType,
    pub labels: Vec<MeasurementLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementCondUeItem {
    pub measurement: MeasurementType,
    pub matching_conditions: Vec<MatchingCondition>,
    /// Opaque UE identifiers, one per matched UE.
    pub matched_ue_ids: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingCondition {
    Label(MeasurementLabel),
    Test(TestCondition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCondition {
    pub test_type: TestType,
    pub expression: TestExpression,
    pub value: TestValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestType {
    Gbr,
    Ambr,
    IsStat,
    IsCatM,
    Rsrp,
    Rsrq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestExpression {
    Equal,
    GreaterThan,
    LessThan,
    Contains,
    Present,
}

/// Test value; the active member follows the value-type discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestValue {
    Integer(i64),
    Enumerated(i64),
    Boolean(bool),
    BitString(BitString),
    OctetString(Vec<u8>),
    PrintableString(String),
}

impl std::fmt::Display for TestValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestValue::Integer(v) => write!(f, "integer:{}", v),
            TestValue::Enumerated(v) => write!(f, "enumerated:{}", v),
            TestValue::Boolean(v) => write!(f, "boolean:{}", v),
            TestValue::BitString(b) => write!(f, "bits:{} unused:{}", b.to_hex(), b.bits_unused),
            TestValue::OctetString(o) => write!(f, "octets:{}", hex::encode(o)),
            TestValue::PrintableString(s) => write!(f, "string:{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementData {
    pub records: Vec<MeasurementRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementRecord {
    Integer(i64),
    Real(f64),
    NoValue,
}

impl std::fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementRecord::Integer(v) => write!(f, "integer:{}", v),
            MeasurementRecord::Real(v) => write!(f, "real:{}", v),
            MeasurementRecord::NoValue => write!(f, "no-value"),
        }
    }
}
