//! # Indication Pipeline Benchmarks
//!
//! | Stage | What is measured |
//! |-------|------------------|
//! | decode | E2AP envelope + KPM header + KPM message |
//! | flatten | report tree to metric points |
//! | render | metric points to line protocol |

use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kpm_02_indication::{
    flatten_report, HeaderFormat1, IndicationCodec, IndicationHeader, IndicationReport,
    IndicationType, MeasurementData, MeasurementInfoItem, MeasurementLabel, MeasurementRecord,
    MeasurementType, Precision, ReportFormat1, RicIndication, SliceId,
};
use xapp_runtime::adapters::SerdeCodec;

fn report_with_labels(labels: usize) -> IndicationReport {
    let labels = (0..labels)
        .map(|i| MeasurementLabel {
            plmn_id: Some(b"111".to_vec()),
            slice_id: Some(SliceId {
                sst: b"1".to_vec(),
                sd: Some(format!("{i:06}").into_bytes()),
            }),
            five_qi: Some(9),
            qci: Some(i as i64),
            ..Default::default()
        })
        .collect();

    IndicationReport::Format1(ReportFormat1 {
        granularity_period: Some(1000),
        measurement_info: vec![MeasurementInfoItem {
            measurement: MeasurementType::ByName("DRB.UEThpDl".to_string()),
            labels,
        }],
        measurement_data: vec![MeasurementData {
            records: vec![MeasurementRecord::Integer(1); 16],
        }],
        ..Default::default()
    })
}

fn encoded_indication(codec: &SerdeCodec, report: &IndicationReport) -> Vec<u8> {
    let header = codec
        .encode_indication_header(&IndicationHeader::Format1(HeaderFormat1::default()))
        .unwrap();
    let message = codec.encode_indication_message(report).unwrap();
    codec
        .encode_ric_indication(&RicIndication {
            request_id: 123,
            request_seq_num: 1,
            func_id: 2,
            action_id: 1,
            indication_sn: None,
            indication_type: IndicationType::Report,
            header,
            message,
            call_process_id: None,
        })
        .unwrap()
}

// ============================================================================
// DECODE
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let codec = SerdeCodec::new();
    let mut group = c.benchmark_group("indication-decode");
    group.measurement_time(Duration::from_secs(5));

    for labels in [1, 16, 256] {
        let payload = encoded_indication(&codec, &report_with_labels(labels));
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("full", labels), &payload, |b, payload| {
            b.iter(|| {
                let ind = codec.decode_ric_indication(black_box(payload)).unwrap();
                let header = codec.decode_indication_header(&ind.header).unwrap();
                let report = codec.decode_indication_message(&ind.message).unwrap();
                black_box((header, report))
            })
        });
    }

    group.finish();
}

// ============================================================================
// FLATTEN AND RENDER
// ============================================================================

fn bench_flatten_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("indication-flatten");

    for labels in [1, 16, 256] {
        let report = report_with_labels(labels);
        group.throughput(Throughput::Elements(labels as u64));

        group.bench_with_input(BenchmarkId::new("flatten", labels), &report, |b, report| {
            b.iter(|| black_box(flatten_report(black_box(report), Utc::now())))
        });

        let points = flatten_report(&report, Utc::now()).into_points();
        group.bench_with_input(BenchmarkId::new("render", labels), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|p| p.to_line_protocol(Precision::Milliseconds).unwrap().len())
                    .sum::<usize>()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_flatten_and_render);
criterion_main!(benches);
