//! # Integration Harness
//!
//! Builds a full `XappContext` over the in-process transport, the serde
//! codec and an in-memory sink, and plays the node side of the protocol.

pub mod indication_flows;
pub mod runtime_flows;
pub mod subscription_flows;

use std::sync::Arc;

use kpm_01_subscription::{LifecycleConfig, SubscriptionResponse};
use kpm_02_indication::{
    IndicationHeader, IndicationReport, IndicationType, InMemorySink, RicIndication,
};
use shared_bus::InMemoryTransport;
use shared_types::{MessageType, NodeIdentity, RicMessage};
use xapp_runtime::adapters::{PrometheusRecorder, SerdeCodec};
use xapp_runtime::{XappConfig, XappContext};

/// RAN function id carried on every request in these flows.
pub const FUNC_ID: u16 = 2;

pub struct Harness {
    pub context: XappContext,
    pub transport: Arc<InMemoryTransport>,
    pub sink: Arc<InMemorySink>,
    pub codec: SerdeCodec,
}

impl Harness {
    pub fn new(nodes: &[&str], lifecycle: LifecycleConfig) -> Self {
        let transport = Arc::new(InMemoryTransport::new());
        let sink = Arc::new(InMemorySink::new());
        let config = XappConfig {
            nodes: nodes.iter().map(|n| NodeIdentity::named(*n)).collect(),
            func_id: FUNC_ID,
            lifecycle,
            ..Default::default()
        };
        let context = XappContext::build(
            config,
            transport.clone(),
            Arc::new(SerdeCodec::new()),
            sink.clone(),
            Arc::new(PrometheusRecorder),
        )
        .expect("harness config is valid");

        Self {
            context,
            transport,
            sink,
            codec: SerdeCodec::new(),
        }
    }

    pub fn with_defaults(nodes: &[&str]) -> Self {
        Self::new(nodes, LifecycleConfig::default())
    }

    /// Messages the xApp sent with the given type, in order.
    pub fn sent_of(&self, mtype: MessageType) -> Vec<RicMessage> {
        self.transport
            .sent()
            .into_iter()
            .map(|s| s.message)
            .filter(|m| m.message_type() == Some(mtype))
            .collect()
    }

    // =========================================================================
    // Node side
    // =========================================================================

    /// Answer the last RIC_SUB_REQ sent to `ran_name`.
    pub fn subscription_response(&self, ran_name: &str, sub_id: i32, admitted: Vec<i64>) -> RicMessage {
        subscription_response(&self.codec, &self.transport, ran_name, sub_id, admitted)
    }

    pub fn answer(&self, mtype: MessageType, ran_name: &str, sub_id: i32) -> RicMessage {
        RicMessage::new(mtype, sub_id, NodeIdentity::named(ran_name), vec![0x01])
    }

    /// RIC_INDICATION carrying `header` and `report`.
    pub fn indication(
        &self,
        ran_name: &str,
        header: &IndicationHeader,
        report: &IndicationReport,
    ) -> RicMessage {
        let header = self
            .codec
            .encode_indication_header(header)
            .expect("header encodes");
        let message = self
            .codec
            .encode_indication_message(report)
            .expect("report encodes");
        indication(&self.codec, ran_name, header, message)
    }

    /// RIC_INDICATION with pre-encoded header and message octets.
    pub fn indication_with(&self, ran_name: &str, header: Vec<u8>, message: Vec<u8>) -> RicMessage {
        indication(&self.codec, ran_name, header, message)
    }
}

/// RIC_INDICATION toward the xApp wrapping the given header and message
/// octets.
pub fn indication(codec: &SerdeCodec, ran_name: &str, header: Vec<u8>, message: Vec<u8>) -> RicMessage {
    let indication = RicIndication {
        request_id: 123,
        request_seq_num: 1,
        func_id: FUNC_ID,
        action_id: 1,
        indication_sn: Some(7),
        indication_type: IndicationType::Report,
        header,
        message,
        call_process_id: None,
    };
    RicMessage::new(
        MessageType::Indication,
        42,
        NodeIdentity::named(ran_name),
        codec
            .encode_ric_indication(&indication)
            .expect("indication encodes"),
    )
}

/// Response to the last RIC_SUB_REQ that `transport` carried to `ran_name`,
/// admitting `admitted`.
pub fn subscription_response(
    codec: &SerdeCodec,
    transport: &InMemoryTransport,
    ran_name: &str,
    sub_id: i32,
    admitted: Vec<i64>,
) -> RicMessage {
    let request = transport
        .sent()
        .into_iter()
        .rev()
        .map(|s| s.message)
        .find(|m| {
            m.message_type() == Some(MessageType::SubscriptionRequest) && m.ran_name() == ran_name
        })
        .expect("a request was sent to the node");
    let params = codec
        .decode_subscription_request(&request.payload)
        .expect("request decodes");

    let response = SubscriptionResponse {
        request_id: params.request_id,
        request_seq_num: params.request_seq_num,
        func_id: params.func_id,
        admitted,
        not_admitted: Vec::new(),
    };
    RicMessage::new(
        MessageType::SubscriptionResponse,
        sub_id,
        request.meid,
        codec
            .encode_subscription_response(&response)
            .expect("response encodes"),
    )
}
