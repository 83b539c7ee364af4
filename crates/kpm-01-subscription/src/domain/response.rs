//! Decoded RIC Subscription Response.

use serde::{Deserialize, Serialize};

/// An action the node declined, with its E2AP cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotAdmittedAction {
    pub action_id: i64,
    pub cause_type: i32,
    pub cause_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub request_id: u32,
    pub request_seq_num: u32,
    pub func_id: u16,
    pub admitted: Vec<i64>,
    pub not_admitted: Vec<NotAdmittedAction>,
}

impl SubscriptionResponse {
    /// True when the node admitted at least one action.
    pub fn any_admitted(&self) -> bool {
        !self.admitted.is_empty()
    }
}
