//! Codec stub for service tests.

use std::sync::atomic::{AtomicBool, Ordering};

use shared_types::{DecodeError, EncodeError};

use crate::domain::{DeleteRequestParams, SubscriptionRequestParams, SubscriptionResponse};
use crate::ports::SubscriptionCodec;

/// Encodes requests as a few marker bytes. A response payload of `b"bad"`
/// fails to decode; anything else decodes to a response admitting action 0.
#[derive(Default)]
pub struct StubCodec {
    pub fail_encode: AtomicBool,
}

impl StubCodec {
    pub fn failing_encode() -> Self {
        Self {
            fail_encode: AtomicBool::new(true),
        }
    }
}

impl SubscriptionCodec for StubCodec {
    fn encode_event_trigger(&self, count: u32, period_secs: u32) -> Result<Vec<u8>, EncodeError> {
        Ok(vec![count as u8, period_secs as u8])
    }

    fn encode_action_definition(&self, style_type: i64) -> Result<Vec<u8>, EncodeError> {
        Ok(vec![style_type as u8])
    }

    fn encode_subscription_request(
        &self,
        params: &SubscriptionRequestParams,
    ) -> Result<Vec<u8>, EncodeError> {
        if self.fail_encode.load(Ordering::SeqCst) {
            return Err(EncodeError::Failed {
                what: "subscription request",
                reason: "stub".to_string(),
            });
        }
        Ok(params.request_seq_num.to_be_bytes().to_vec())
    }

    fn encode_subscription_delete(
        &self,
        params: &DeleteRequestParams,
    ) -> Result<Vec<u8>, EncodeError> {
        Ok(params.request_seq_num.to_be_bytes().to_vec())
    }

    fn decode_subscription_response(
        &self,
        payload: &[u8],
    ) -> Result<SubscriptionResponse, DecodeError> {
        if payload == b"bad" {
            return Err(DecodeError::Malformed {
                what: "subscription response",
                reason: "stub".to_string(),
            });
        }
        Ok(SubscriptionResponse {
            request_id: 1001,
            request_seq_num: 1001,
            func_id: 0,
            admitted: vec![0],
            not_admitted: vec![],
        })
    }
}
