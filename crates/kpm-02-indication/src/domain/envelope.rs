//! E2AP RIC Indication envelope
//!
//! The outer PDU of a `RIC_INDICATION` message. The E2SM-KPM header and
//! message travel inside it as opaque octets.

use serde::{Deserialize, Serialize};

/// RIC Indication type carried on the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicationType {
    Report = 0,
    Insert = 1,
}

impl IndicationType {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicationType::Report => "report",
            IndicationType::Insert => "insert",
        }
    }
}

/// Decoded E2AP Indication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicIndication {
    pub request_id: u32,
    pub request_seq_num: u32,
    pub func_id: u16,
    pub action_id: i64,
    pub indication_sn: Option<u32>,
    pub indication_type: IndicationType,
    /// E2SM-KPM Indication Header octets.
    pub header: Vec<u8>,
    /// E2SM-KPM Indication Message octets.
    pub message: Vec<u8>,
    pub call_process_id: Option<Vec<u8>>,
}
