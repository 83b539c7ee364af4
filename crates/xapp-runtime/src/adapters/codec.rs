//! # Serde Codec
//!
//! A `bincode` codec over the typed E2AP / E2SM-KPM model. It implements
//! both codec ports so the xApp can run against an in-process transport.
//! An ASN.1 PER adapter would implement the same two traits.
//!
//! Header and report payloads are framed with an explicit format number so
//! an unknown format surfaces as `DecodeError::UnknownDiscriminator`.

use kpm_01_subscription::{
    domain::DeleteRequestParams, SubscriptionCodec, SubscriptionRequestParams,
    SubscriptionResponse,
};
use kpm_02_indication::{
    HeaderFormat1, IndicationCodec, IndicationHeader, IndicationReport, ReportFormat1,
    ReportFormat2, RicIndication,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{DecodeError, EncodeError};

/// Event trigger definition: `count` reports, one every `period_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTriggerDefinition {
    pub count: u32,
    pub period_secs: u32,
}

/// Action definition for a RIC style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub style_type: i64,
}

#[derive(Serialize, Deserialize)]
struct Frame {
    format: i64,
    body: Vec<u8>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeCodec;

impl SerdeCodec {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    // Encoders for the node side (simulators and tests)
    // =========================================================================

    pub fn encode_ric_indication(&self, ind: &RicIndication) -> Result<Vec<u8>, EncodeError> {
        encode("RIC indication", ind)
    }

    pub fn encode_indication_header(
        &self,
        header: &IndicationHeader,
    ) -> Result<Vec<u8>, EncodeError> {
        let IndicationHeader::Format1(f1) = header;
        self.encode_frame(1, &encode("indication header", f1)?)
    }

    pub fn encode_indication_message(
        &self,
        report: &IndicationReport,
    ) -> Result<Vec<u8>, EncodeError> {
        let (format, body) = match report {
            IndicationReport::Format1(f1) => (1, encode("indication message", f1)?),
            IndicationReport::Format2(f2) => (2, encode("indication message", f2)?),
        };
        self.encode_frame(format, &body)
    }

    /// Raw framed payload with an arbitrary format number.
    pub fn encode_frame(&self, format: i64, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
        encode(
            "frame",
            &Frame {
                format,
                body: body.to_vec(),
            },
        )
    }

    pub fn encode_subscription_response(
        &self,
        response: &SubscriptionResponse,
    ) -> Result<Vec<u8>, EncodeError> {
        encode("subscription response", response)
    }

    pub fn decode_subscription_request(
        &self,
        payload: &[u8],
    ) -> Result<SubscriptionRequestParams, DecodeError> {
        decode("subscription request", payload)
    }

    pub fn decode_subscription_delete(
        &self,
        payload: &[u8],
    ) -> Result<DeleteRequestParams, DecodeError> {
        decode("subscription delete request", payload)
    }

    pub fn decode_event_trigger(&self, bytes: &[u8]) -> Result<EventTriggerDefinition, DecodeError> {
        decode("event trigger", bytes)
    }

    fn decode_frame(&self, what: &'static str, bytes: &[u8]) -> Result<Frame, DecodeError> {
        decode(what, bytes)
    }
}

fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, EncodeError> {
    bincode::serialize(value).map_err(|e| EncodeError::Failed {
        what,
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty(what));
    }
    bincode::deserialize(bytes).map_err(|e| DecodeError::Malformed {
        what,
        reason: e.to_string(),
    })
}

impl SubscriptionCodec for SerdeCodec {
    fn encode_event_trigger(&self, count: u32, period_secs: u32) -> Result<Vec<u8>, EncodeError> {
        if count == 0 {
            return Err(EncodeError::InvalidParameter {
                what: "event trigger",
                reason: "report count must be at least 1".to_string(),
            });
        }
        encode("event trigger", &EventTriggerDefinition { count, period_secs })
    }

    fn encode_action_definition(&self, style_type: i64) -> Result<Vec<u8>, EncodeError> {
        encode("action definition", &ActionDefinition { style_type })
    }

    fn encode_subscription_request(
        &self,
        params: &SubscriptionRequestParams,
    ) -> Result<Vec<u8>, EncodeError> {
        if params.actions.len() != params.subsequent_actions.len() {
            return Err(EncodeError::InvalidParameter {
                what: "subscription request",
                reason: "subsequent actions must parallel actions".to_string(),
            });
        }
        encode("subscription request", params)
    }

    fn encode_subscription_delete(
        &self,
        params: &DeleteRequestParams,
    ) -> Result<Vec<u8>, EncodeError> {
        encode("subscription delete request", params)
    }

    fn decode_subscription_response(
        &self,
        payload: &[u8],
    ) -> Result<SubscriptionResponse, DecodeError> {
        decode("subscription response", payload)
    }
}

impl IndicationCodec for SerdeCodec {
    fn decode_ric_indication(&self, payload: &[u8]) -> Result<RicIndication, DecodeError> {
        decode("RIC indication", payload)
    }

    fn decode_indication_header(&self, bytes: &[u8]) -> Result<IndicationHeader, DecodeError> {
        let frame = self.decode_frame("indication header", bytes)?;
        match frame.format {
            1 => decode::<HeaderFormat1>("indication header", &frame.body)
                .map(IndicationHeader::Format1),
            other => Err(DecodeError::UnknownDiscriminator {
                what: "indication header format",
                value: other,
            }),
        }
    }

    fn decode_indication_message(&self, bytes: &[u8]) -> Result<IndicationReport, DecodeError> {
        let frame = self.decode_frame("indication message", bytes)?;
        match frame.format {
            1 => decode::<ReportFormat1>("indication message", &frame.body)
                .map(IndicationReport::Format1),
            2 => decode::<ReportFormat2>("indication message", &frame.body)
                .map(IndicationReport::Format2),
            other => Err(DecodeError::UnknownDiscriminator {
                what: "indication message format",
                value: other,
            }),
        }
    }
}
