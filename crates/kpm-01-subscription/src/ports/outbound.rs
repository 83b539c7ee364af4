//! Outbound Ports (Driven Ports)
//!
//! The E2AP / E2SM-KPM codec. This subsystem never inspects wire bytes; it
//! only calls these functions.

use shared_types::{DecodeError, EncodeError};

use crate::domain::{DeleteRequestParams, SubscriptionRequestParams, SubscriptionResponse};

pub trait SubscriptionCodec: Send + Sync {
    /// E2SM-KPM event trigger definition: `count` triggers, one every
    /// `period_secs`.
    fn encode_event_trigger(&self, count: u32, period_secs: u32) -> Result<Vec<u8>, EncodeError>;

    /// E2SM-KPM action definition for a RIC style type.
    fn encode_action_definition(&self, style_type: i64) -> Result<Vec<u8>, EncodeError>;

    fn encode_subscription_request(
        &self,
        params: &SubscriptionRequestParams,
    ) -> Result<Vec<u8>, EncodeError>;

    fn encode_subscription_delete(
        &self,
        params: &DeleteRequestParams,
    ) -> Result<Vec<u8>, EncodeError>;

    fn decode_subscription_response(
        &self,
        payload: &[u8],
    ) -> Result<SubscriptionResponse, DecodeError>;
}
