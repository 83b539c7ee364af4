//! # Runtime Flows
//!
//! The whole process wiring: startup delay, one Create per configured node,
//! the dispatch loop fed from the inbound queue, and shutdown.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kpm_01_subscription::{
        LifecycleConfig, ProcedureState, SubscriptionApi, SubscriptionResponse, TimerOutcome,
    };
    use kpm_02_indication::{
        HeaderFormat1, IndicationHeader, IndicationReport, MeasurementInfoItem,
        MeasurementLabel, MeasurementType, ReportFormat1,
    };
    use shared_bus::{inbound_channel, InboundSender, InMemoryTransport};
    use shared_types::{MessageType, NodeIdentity, RicMessage};
    use tokio::task::JoinHandle;
    use xapp_runtime::adapters::SerdeCodec;
    use xapp_runtime::{DispatcherSnapshot, XappRuntime};

    use crate::integration::{indication, subscription_response, Harness};

    fn runtime(nodes: &[&str]) -> (Arc<XappRuntime>, Arc<InMemoryTransport>) {
        let Harness {
            context, transport, ..
        } = Harness::new(nodes, LifecycleConfig::default());
        (Arc::new(XappRuntime::new(context)), transport)
    }

    fn one_label_report() -> IndicationReport {
        IndicationReport::Format1(ReportFormat1 {
            measurement_info: vec![MeasurementInfoItem {
                measurement: MeasurementType::ById(1),
                labels: vec![MeasurementLabel {
                    plmn_id: Some(b"111".to_vec()),
                    five_qi: Some(9),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        })
    }

    /// Answers every RIC_SUB_REQ the transport carries, as a node would.
    fn spawn_simulated_nodes(
        transport: &InMemoryTransport,
        inbound: InboundSender,
        sub_id_base: i32,
    ) -> JoinHandle<usize> {
        let mut tap = transport.tap();
        let codec = SerdeCodec::new();
        tokio::spawn(async move {
            let mut answered = 0;
            while let Ok(msg) = tap.recv().await {
                if msg.message_type() != Some(MessageType::SubscriptionRequest) {
                    continue;
                }
                let Ok(params) = codec.decode_subscription_request(&msg.payload) else {
                    continue;
                };
                let response = SubscriptionResponse {
                    request_id: params.request_id,
                    request_seq_num: params.request_seq_num,
                    func_id: params.func_id,
                    admitted: vec![1],
                    not_admitted: Vec::new(),
                };
                let Ok(payload) = codec.encode_subscription_response(&response) else {
                    continue;
                };
                answered += 1;
                let reply = RicMessage::new(
                    MessageType::SubscriptionResponse,
                    sub_id_base + answered as i32,
                    msg.meid,
                    payload,
                );
                if inbound.deliver(reply).await.is_err() {
                    break;
                }
            }
            answered
        })
    }

    // =========================================================================
    // STARTUP AND DISPATCH
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_full_session_through_inbound_queue() {
        let (runtime, transport) = runtime(&["gnb_001", "gnb_002"]);
        let context = runtime.context();
        let codec = SerdeCodec::new();
        let (tx, queue) = inbound_channel(16);

        let dispatcher = runtime.spawn_dispatcher(queue);
        let results = runtime.spawn_subscriptions().await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(transport.sent_count(), 2);

        let mut timers = Vec::new();
        for (ran_name, result) in results {
            let armed = result.unwrap();
            assert_eq!(armed.ran_name, ran_name);
            timers.push(armed.timer);
        }

        for (i, ran) in ["gnb_001", "gnb_002"].iter().enumerate() {
            let response = subscription_response(&codec, &transport, ran, 100 + i as i32, vec![1]);
            tx.deliver(response).await.unwrap();
        }

        let header = codec
            .encode_indication_header(&IndicationHeader::Format1(HeaderFormat1::default()))
            .unwrap();
        let message = codec.encode_indication_message(&one_label_report()).unwrap();
        tx.deliver(indication(&codec, "gnb_001", header, message))
            .await
            .unwrap();
        tx.deliver(RicMessage::with_code(
            9999,
            -1,
            NodeIdentity::named("gnb_001"),
            vec![0xab],
        ))
        .await
        .unwrap();
        drop(tx);

        let snapshot: DispatcherSnapshot = dispatcher.await.unwrap();
        assert_eq!(snapshot.received, 4);
        assert_eq!(snapshot.handled, 3);
        assert_eq!(snapshot.discarded, 1);
        assert_eq!(snapshot.failed, 0);

        for timer in timers {
            assert_eq!(timer.await.unwrap(), TimerOutcome::Cancelled);
        }
        for (ran, sub_id) in [("gnb_001", 100), ("gnb_002", 101)] {
            let record = context.subscriptions.record(ran).unwrap();
            assert_eq!(record.state, ProcedureState::Confirmed);
            assert_eq!(record.sub_id, sub_id);
        }
        assert_eq!(context.indications.stats().points_emitted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_nodes_answer_every_request() {
        let (runtime, transport) = runtime(&["gnb_001", "gnb_002", "gnb_003"]);
        let context = runtime.context();
        let (tx, queue) = inbound_channel(16);

        let nodes = spawn_simulated_nodes(&transport, tx, 500);
        let dispatcher = runtime.spawn_dispatcher(queue);

        let results = runtime.spawn_subscriptions().await.unwrap();
        let mut timers = Vec::new();
        for (_, result) in results {
            timers.push(result.unwrap().timer);
        }
        for timer in timers {
            assert_eq!(timer.await.unwrap(), TimerOutcome::Cancelled);
        }

        for ran in ["gnb_001", "gnb_002", "gnb_003"] {
            assert_eq!(
                context.subscriptions.record(ran).unwrap().state,
                ProcedureState::Confirmed
            );
        }

        runtime.shutdown().await;
        let snapshot = dispatcher.await.unwrap();
        assert_eq!(snapshot.handled, 3);
        nodes.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_nodes_expire() {
        let (runtime, transport) = runtime(&["gnb_001"]);
        let context = runtime.context();

        let results = runtime.spawn_subscriptions().await.unwrap();
        let (_, result) = results.into_iter().next().unwrap();
        assert_eq!(result.unwrap().timer.await.unwrap(), TimerOutcome::Expired);

        assert_eq!(transport.sent_count(), 1);
        assert_eq!(
            context.subscriptions.record("gnb_001").unwrap().state,
            ProcedureState::Expired
        );
    }
}
