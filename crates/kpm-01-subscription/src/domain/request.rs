//! # Request construction
//!
//! Parameters handed to the codec for Create and Delete requests, and the
//! templates they are built from.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Report = 0,
    Insert = 1,
    Policy = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsequentActionType {
    Continue = 0,
    Wait = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeToWait {
    Zero = 0,
    W1ms,
    W2ms,
    W5ms,
    W10ms,
    W20ms,
    W30ms,
    W40ms,
    W50ms,
    W100ms,
    W200ms,
    W500ms,
    W1s,
    W2s,
    W5s,
    W10s,
    W20s,
    W60s,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsequentAction {
    pub action_type: SubsequentActionType,
    pub time_to_wait: TimeToWait,
}

/// Template entry for one RIC action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub action_id: i64,
    pub action_type: ActionType,
    /// RIC style type. Style 0 sends no action definition.
    pub style_type: i64,
    pub subsequent: Option<SubsequentAction>,
}

/// One action after its definition has been encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionToBeSetup {
    pub action_id: i64,
    pub action_type: ActionType,
    pub definition: Vec<u8>,
}

/// Everything `encode_subscription_request` needs.
///
/// `subsequent_actions` is parallel to `actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequestParams {
    pub request_id: u32,
    pub request_seq_num: u32,
    pub func_id: u16,
    pub event_trigger: Vec<u8>,
    pub actions: Vec<ActionToBeSetup>,
    pub subsequent_actions: Vec<Option<SubsequentAction>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequestParams {
    pub request_id: u32,
    pub request_seq_num: u32,
    pub func_id: u16,
}

/// Shape of every Create request the xApp sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequestTemplate {
    pub request_id: u32,
    pub initial_seq_num: u32,
    pub event_trigger_count: u32,
    pub report_period_secs: u32,
    pub actions: Vec<ActionSpec>,
}

impl Default for SubscriptionRequestTemplate {
    fn default() -> Self {
        Self {
            request_id: 1001,
            initial_seq_num: 1001,
            event_trigger_count: 1,
            report_period_secs: 1,
            actions: vec![ActionSpec {
                action_id: 0,
                action_type: ActionType::Report,
                style_type: 0,
                subsequent: None,
            }],
        }
    }
}

/// Shape of every Delete request the xApp sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionTemplate {
    pub request_id: u32,
    pub initial_seq_num: u32,
}

impl Default for DeletionTemplate {
    fn default() -> Self {
        Self {
            request_id: 100,
            initial_seq_num: 1,
        }
    }
}

/// Monotonic request sequence numbers.
pub struct SeqAllocator {
    next: AtomicU32,
}

impl SeqAllocator {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
