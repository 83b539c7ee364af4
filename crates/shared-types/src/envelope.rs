//! # `RicMessage` Envelope
//!
//! The transport-level wrapper for every message exchanged with the RIC
//! platform.
//!
//! ## Properties
//!
//! - **Type code**: `mtype` is the raw wire code. Unknown codes are kept as-is
//!   so the dispatcher can log and discard them.
//! - **Correlation**: `sub_id` is the subscription id assigned by the platform;
//!   `correlation_id` traces one message through the logs.
//! - **Node identity**: `meid` names the radio node the message concerns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::NodeIdentity;

/// Message-type codes consumed and produced by the xApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum MessageType {
    /// RIC Subscription Create Request (out).
    SubscriptionRequest = 12010,
    /// RIC Subscription Create Response (in).
    SubscriptionResponse = 12011,
    /// RIC Subscription Create Failure (in).
    SubscriptionFailure = 12012,
    /// RIC Subscription Delete Request (out).
    SubscriptionDeleteRequest = 12020,
    /// RIC Subscription Delete Response (in).
    SubscriptionDeleteResponse = 12021,
    /// RIC Subscription Delete Failure (in).
    SubscriptionDeleteFailure = 12022,
    /// RIC Indication (in).
    Indication = 12050,
}

impl MessageType {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            12010 => Some(Self::SubscriptionRequest),
            12011 => Some(Self::SubscriptionResponse),
            12012 => Some(Self::SubscriptionFailure),
            12020 => Some(Self::SubscriptionDeleteRequest),
            12021 => Some(Self::SubscriptionDeleteResponse),
            12022 => Some(Self::SubscriptionDeleteFailure),
            12050 => Some(Self::Indication),
            _ => None,
        }
    }

    /// True for codes the xApp expects to receive.
    pub fn is_inbound(self) -> bool {
        !matches!(
            self,
            Self::SubscriptionRequest | Self::SubscriptionDeleteRequest
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SubscriptionRequest => "RIC_SUB_REQ",
            Self::SubscriptionResponse => "RIC_SUB_RESP",
            Self::SubscriptionFailure => "RIC_SUB_FAILURE",
            Self::SubscriptionDeleteRequest => "RIC_SUB_DEL_REQ",
            Self::SubscriptionDeleteResponse => "RIC_SUB_DEL_RESP",
            Self::SubscriptionDeleteFailure => "RIC_SUB_DEL_FAILURE",
            Self::Indication => "RIC_INDICATION",
        }
    }
}

/// Opaque message as delivered by, or handed to, the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicMessage {
    /// Raw message-type code.
    pub mtype: i32,
    /// Platform subscription id (-1 when not yet assigned).
    pub sub_id: i32,
    /// Node the message is addressed to or originates from.
    pub meid: NodeIdentity,
    /// Encoded PDU. Never inspected outside the codec adapters.
    pub payload: Vec<u8>,
    /// Log correlation id.
    pub correlation_id: Uuid,
}

impl RicMessage {
    pub fn new(mtype: MessageType, sub_id: i32, meid: NodeIdentity, payload: Vec<u8>) -> Self {
        Self::with_code(mtype.code(), sub_id, meid, payload)
    }

    /// Builds a message with an arbitrary code, including ones the xApp does
    /// not understand.
    pub fn with_code(mtype: i32, sub_id: i32, meid: NodeIdentity, payload: Vec<u8>) -> Self {
        Self {
            mtype,
            sub_id,
            meid,
            payload,
            correlation_id: Uuid::new_v4(),
        }
    }

    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.mtype)
    }

    pub fn ran_name(&self) -> &str {
        &self.meid.ran_name
    }
}
