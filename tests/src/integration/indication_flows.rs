//! # Indication Flows
//!
//! `RIC_INDICATION` payloads built with the serde codec, routed through the
//! dispatcher, and checked at the metric sink.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use kpm_02_indication::{
        GlobalKpmNodeId, HeaderFormat1, IndicationApi, IndicationHeader, IndicationProcessor,
        IndicationReport, MatchingCondition, MeasurementCondUeItem, MeasurementData,
        MeasurementInfoItem, MeasurementLabel, MeasurementRecord, MeasurementType, MetricPoint,
        MetricSink, Precision, ReportFormat1, ReportFormat2, SinkError, SliceId, TestCondition,
        TestExpression, TestType, TestValue,
    };
    use parking_lot::Mutex;
    use shared_types::{BitString, MessageType, NodeIdentity, RicMessage};
    use xapp_runtime::adapters::SerdeCodec;
    use xapp_runtime::DispatchOutcome;

    use crate::integration::Harness;

    const RAN: &str = "gnb_734_733_b5c67788";

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn gnb_header() -> IndicationHeader {
        IndicationHeader::Format1(HeaderFormat1 {
            node_id: Some(GlobalKpmNodeId::Gnb {
                plmn_id: vec![0x37, 0x34, 0x37],
                gnb_id: BitString::new(vec![0xb5, 0xc6, 0x77, 0x88], 3),
                cu_up_id: Some(1),
                du_id: None,
            }),
            collect_start_time: Some(vec![0x65, 0x4f, 0x2a, 0x00]),
            sender_name: Some("du-sim".to_string()),
            ..Default::default()
        })
    }

    fn format1_report() -> IndicationReport {
        IndicationReport::Format1(ReportFormat1 {
            granularity_period: Some(1000),
            subscription_id: Some(1001),
            cell_object_id: Some("cell-1".to_string()),
            measurement_info: vec![
                MeasurementInfoItem {
                    measurement: MeasurementType::ByName("DRB.UEThpDl".to_string()),
                    labels: vec![MeasurementLabel {
                        plmn_id: Some(b"111".to_vec()),
                        five_qi: Some(9),
                        ..Default::default()
                    }],
                },
                MeasurementInfoItem {
                    measurement: MeasurementType::ById(3),
                    labels: vec![MeasurementLabel {
                        slice_id: Some(SliceId {
                            sst: b"1".to_vec(),
                            sd: Some(b"ABC".to_vec()),
                        }),
                        qci: Some(-1),
                        arp_max: Some(15),
                        ..Default::default()
                    }],
                },
            ],
            measurement_data: vec![MeasurementData {
                records: vec![
                    MeasurementRecord::Integer(10),
                    MeasurementRecord::Real(0.5),
                    MeasurementRecord::NoValue,
                ],
            }],
        })
    }

    fn test_condition() -> TestCondition {
        TestCondition {
            test_type: TestType::Rsrp,
            expression: TestExpression::GreaterThan,
            value: TestValue::Integer(-100),
        }
    }

    fn format2_report(conditions: Vec<MatchingCondition>) -> IndicationReport {
        IndicationReport::Format2(ReportFormat2 {
            granularity_period: Some(500),
            measurement_cond_ue: vec![MeasurementCondUeItem {
                measurement: MeasurementType::ById(1),
                matching_conditions: conditions,
                matched_ue_ids: vec![vec![0x01, 0x02]],
            }],
            ..Default::default()
        })
    }

    /// Sink that stores the rendered line protocol, the way the database
    /// adapter would send it.
    #[derive(Default)]
    struct LineSink {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MetricSink for LineSink {
        async fn write(&self, point: &MetricPoint) -> Result<(), SinkError> {
            let line = point.to_line_protocol(Precision::Milliseconds)?;
            self.lines.lock().push(line);
            Ok(())
        }
    }

    // =========================================================================
    // FORMAT 1
    // =========================================================================

    #[tokio::test]
    async fn test_format1_labels_become_points() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let outcome = dispatcher
            .dispatch(h.indication(RAN, &gnb_header(), &format1_report()))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::Indication));

        let points = h.sink.points();
        assert_eq!(points.len(), 2);

        assert!(points.iter().all(|p| p.measurement == "metrics"));
        assert_eq!(points[0].tags.get("PLMNID").map(String::as_str), Some("111"));
        assert_eq!(points[0].fields.len(), 1);
        assert_eq!(points[0].fields.get("FiveQI"), Some(&9));

        assert_eq!(points[1].tags.get("SliceID.SST").map(String::as_str), Some("1"));
        assert_eq!(points[1].tags.get("SliceID.SD").map(String::as_str), Some("ABC"));
        assert!(points[1].tags.get("PLMNID").is_none());
        assert_eq!(points[1].fields.get("QCI"), Some(&-1));
        assert_eq!(points[1].fields.get("ARPmax"), Some(&15));

        // One timestamp per message.
        assert_eq!(points[0].timestamp, points[1].timestamp);

        let stats = h.context.indications.stats();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.points_emitted, 2);
    }

    #[tokio::test]
    async fn test_format1_line_protocol_end_to_end() {
        let sink = Arc::new(LineSink::default());
        let processor = IndicationProcessor::new(Arc::new(SerdeCodec::new()), sink.clone());
        let h = Harness::with_defaults(&[RAN]);

        let summary = processor
            .handle(&h.indication(RAN, &gnb_header(), &format1_report()))
            .await
            .unwrap();
        assert_eq!(summary.report_format, 1);
        assert_eq!(summary.points_emitted, 2);
        assert_eq!(summary.measurement_records, 3);

        let lines = sink.lines.lock().clone();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("metrics,PLMNID=111 FiveQI=9i "));
        assert!(lines[1].starts_with("metrics,SliceID.SD=ABC,SliceID.SST=1 ARPmax=15i,QCI=-1i "));
    }

    #[tokio::test]
    async fn test_label_without_fields_counts_as_sink_failure() {
        let sink = Arc::new(LineSink::default());
        let processor = IndicationProcessor::new(Arc::new(SerdeCodec::new()), sink.clone());
        let h = Harness::with_defaults(&[RAN]);

        let report = IndicationReport::Format1(ReportFormat1 {
            measurement_info: vec![MeasurementInfoItem {
                measurement: MeasurementType::ById(1),
                labels: vec![
                    MeasurementLabel {
                        plmn_id: Some(b"222".to_vec()),
                        ..Default::default()
                    },
                    MeasurementLabel {
                        sum: Some(1),
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        });

        let summary = processor
            .handle(&h.indication(RAN, &gnb_header(), &report))
            .await
            .unwrap();
        assert_eq!(summary.points_emitted, 1);
        assert_eq!(summary.sink_failures, 1);
        assert_eq!(sink.lines.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_indication() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();
        h.sink.set_fail_writes(true);

        let outcome = dispatcher
            .dispatch(h.indication(RAN, &gnb_header(), &format1_report()))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::Indication));
        assert!(h.sink.is_empty());

        let stats = h.context.indications.stats();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.points_emitted, 0);
        assert_eq!(stats.sink_failures, 2);
    }

    #[tokio::test]
    async fn test_header_without_node_id_still_processed() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();
        let header = IndicationHeader::Format1(HeaderFormat1::default());

        let outcome = dispatcher
            .dispatch(h.indication(RAN, &header, &format1_report()))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::Indication));
        assert_eq!(h.sink.len(), 2);
    }

    // =========================================================================
    // FORMAT 2
    // =========================================================================

    #[tokio::test]
    async fn test_format2_test_condition_emits_nothing() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();
        let report = format2_report(vec![MatchingCondition::Test(test_condition())]);

        let outcome = dispatcher
            .dispatch(h.indication(RAN, &gnb_header(), &report))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled(MessageType::Indication));
        assert!(h.sink.is_empty());
        assert_eq!(h.context.indications.stats().processed, 1);
    }

    #[tokio::test]
    async fn test_format2_mixed_conditions() {
        let sink = Arc::new(LineSink::default());
        let processor = IndicationProcessor::new(Arc::new(SerdeCodec::new()), sink.clone());
        let h = Harness::with_defaults(&[RAN]);
        let report = format2_report(vec![
            MatchingCondition::Test(test_condition()),
            MatchingCondition::Label(MeasurementLabel {
                plmn_id: Some(b"111".to_vec()),
                five_qi: Some(7),
                ..Default::default()
            }),
        ]);

        let summary = processor
            .handle(&h.indication(RAN, &gnb_header(), &report))
            .await
            .unwrap();
        assert_eq!(summary.report_format, 2);
        assert_eq!(summary.points_emitted, 1);
        assert_eq!(summary.test_conditions, 1);
        assert!(sink.lines.lock()[0].starts_with("metrics,PLMNID=111 FiveQI=7i "));
    }

    // =========================================================================
    // MALFORMED INPUT
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_report_format_is_protocol_violation() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let header = h.codec.encode_indication_header(&gnb_header()).unwrap();
        let message = h.codec.encode_frame(3, &[0x00, 0x01]).unwrap();
        let outcome = dispatcher
            .dispatch(h.indication_with(RAN, header, message))
            .await;

        assert_eq!(outcome, DispatchOutcome::Failed(MessageType::Indication));
        assert!(h.sink.is_empty());
        let stats = h.context.indications.stats();
        assert_eq!(stats.protocol_violations, 1);
        assert_eq!(stats.processed, 0);
    }

    #[tokio::test]
    async fn test_garbage_payload_is_decode_failure() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let msg = RicMessage::new(
            MessageType::Indication,
            42,
            NodeIdentity::named(RAN),
            vec![0xff, 0xff],
        );
        let outcome = dispatcher.dispatch(msg).await;

        assert_eq!(outcome, DispatchOutcome::Failed(MessageType::Indication));
        assert_eq!(h.context.indications.stats().decode_failures, 1);
    }

    #[tokio::test]
    async fn test_empty_payload_is_discarded() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let msg = RicMessage::new(MessageType::Indication, 42, NodeIdentity::named(RAN), vec![]);
        let outcome = dispatcher.dispatch(msg).await;

        assert_eq!(outcome, DispatchOutcome::Failed(MessageType::Indication));
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn test_bad_message_does_not_poison_next_one() {
        let h = Harness::with_defaults(&[RAN]);
        let dispatcher = h.context.dispatcher();

        let header = h.codec.encode_indication_header(&gnb_header()).unwrap();
        let bad = h.indication_with(RAN, header, vec![0xde, 0xad]);
        let good = h.indication(RAN, &gnb_header(), &format1_report());

        assert_eq!(
            dispatcher.dispatch(bad).await,
            DispatchOutcome::Failed(MessageType::Indication)
        );
        assert_eq!(
            dispatcher.dispatch(good).await,
            DispatchOutcome::Handled(MessageType::Indication)
        );
        assert_eq!(h.sink.len(), 2);
    }
}
