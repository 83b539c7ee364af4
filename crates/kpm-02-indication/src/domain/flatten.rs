//! Report flattening
//!
//! Walks a decoded report and produces one `MetricPoint` per measurement
//! label. Test conditions, matched UE ids and measurement records are
//! collected for logging only. Records are not correlated with labels.
//!
//! Results stay grouped by the info item (Format1) or condition item
//! (Format2) they came from, so every point and UE can be traced back to
//! its measurement.

use chrono::{DateTime, Utc};

use crate::domain::metric::MetricPoint;
use crate::domain::report::{
    IndicationReport, MatchingCondition, MeasurementRecord, MeasurementType, TestCondition,
};

/// What one measurement item yields.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedItem {
    /// Position of the item within the report.
    pub index: usize,
    pub measurement: MeasurementType,
    pub points: Vec<MetricPoint>,
    pub test_conditions: Vec<TestCondition>,
    pub matched_ue_ids: Vec<Vec<u8>>,
}

impl FlattenedItem {
    fn new(index: usize, measurement: &MeasurementType) -> Self {
        Self {
            index,
            measurement: measurement.clone(),
            points: Vec::new(),
            test_conditions: Vec::new(),
            matched_ue_ids: Vec::new(),
        }
    }
}

/// Everything a report yields, in report order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedReport {
    pub items: Vec<FlattenedItem>,
    /// Record lists, one per measurement-data item.
    pub records: Vec<Vec<MeasurementRecord>>,
}

impl FlattenedReport {
    /// All points in report order, each with the item it came from.
    pub fn points(&self) -> impl Iterator<Item = (&FlattenedItem, &MetricPoint)> {
        self.items
            .iter()
            .flat_map(|item| item.points.iter().map(move |point| (item, point)))
    }

    pub fn point_count(&self) -> usize {
        self.items.iter().map(|item| item.points.len()).sum()
    }

    pub fn test_condition_count(&self) -> usize {
        self.items.iter().map(|item| item.test_conditions.len()).sum()
    }

    pub fn record_count(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    pub fn into_points(self) -> Vec<MetricPoint> {
        self.items.into_iter().flat_map(|item| item.points).collect()
    }
}

pub fn flatten_report(report: &IndicationReport, timestamp: DateTime<Utc>) -> FlattenedReport {
    let mut out = FlattenedReport::default();

    match report {
        IndicationReport::Format1(f1) => {
            for (index, info) in f1.measurement_info.iter().enumerate() {
                let mut item = FlattenedItem::new(index, &info.measurement);
                item.points = info
                    .labels
                    .iter()
                    .map(|label| MetricPoint::from_label(label, timestamp))
                    .collect();
                out.items.push(item);
            }
        }
        IndicationReport::Format2(f2) => {
            for (index, cond) in f2.measurement_cond_ue.iter().enumerate() {
                let mut item = FlattenedItem::new(index, &cond.measurement);
                for condition in &cond.matching_conditions {
                    match condition {
                        MatchingCondition::Label(label) => {
                            item.points.push(MetricPoint::from_label(label, timestamp))
                        }
                        MatchingCondition::Test(test) => item.test_conditions.push(test.clone()),
                    }
                }
                item.matched_ue_ids = cond.matched_ue_ids.clone();
                out.items.push(item);
            }
        }
    }

    out.records = report
        .measurement_data()
        .iter()
        .map(|data| data.records.clone())
        .collect();
    out
}
