//! # Procedure records
//!
//! One record per node per procedure kind. A record starts `Pending` and
//! moves to exactly one terminal state; terminal states never change.
//! Starting a new procedure for a node whose record is terminal replaces it.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::NodeIdentity;

use crate::domain::response::SubscriptionResponse;
use crate::error::LifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureKind {
    Create,
    Delete,
}

impl ProcedureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureState {
    Pending,
    Confirmed,
    Failed,
    Expired,
    /// The node answered but the answer could not be interpreted.
    Cancelled,
}

impl ProcedureState {
    pub fn is_terminal(self) -> bool {
        self != Self::Pending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProcedureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a procedure ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The node answered with a failure message.
    Rejected,
    /// Every send attempt was refused by the transport.
    SendAttemptsExhausted { attempts: u32 },
    /// A single send was refused (Delete is never retried).
    Transport(String),
    /// The request payload could not be built.
    Encode(String),
    /// A timer for the node was still armed from an earlier procedure.
    TimerConflict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureRecord {
    pub node: NodeIdentity,
    pub kind: ProcedureKind,
    pub request_id: u32,
    pub request_seq_num: u32,
    pub func_id: u16,
    /// Platform subscription id, known once the node has answered.
    pub sub_id: i32,
    pub state: ProcedureState,
    pub failure: Option<FailureReason>,
    pub send_attempts: u32,
    pub response: Option<SubscriptionResponse>,
}

impl ProcedureRecord {
    pub fn pending(
        node: NodeIdentity,
        kind: ProcedureKind,
        request_id: u32,
        request_seq_num: u32,
        func_id: u16,
        sub_id: i32,
    ) -> Self {
        Self {
            node,
            kind,
            request_id,
            request_seq_num,
            func_id,
            sub_id,
            state: ProcedureState::Pending,
            failure: None,
            send_attempts: 0,
            response: None,
        }
    }

    pub fn ran_name(&self) -> &str {
        &self.node.ran_name
    }
}

/// Records for one procedure kind, keyed by RAN name.
pub struct RecordBook {
    kind: ProcedureKind,
    records: Mutex<HashMap<String, ProcedureRecord>>,
}

impl RecordBook {
    pub fn new(kind: ProcedureKind) -> Self {
        Self {
            kind,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    /// Open a new procedure instance for the record's node.
    pub fn begin(&self, record: ProcedureRecord) -> Result<(), LifecycleError> {
        let mut records = self.records.lock();
        if let Some(existing) = records.get(record.ran_name()) {
            if existing.state == ProcedureState::Pending {
                return Err(LifecycleError::AlreadyPending {
                    ran_name: record.node.ran_name.clone(),
                    kind: self.kind,
                });
            }
        }
        records.insert(record.node.ran_name.clone(), record);
        Ok(())
    }

    /// Move a `Pending` record to a terminal state. Returns the updated record.
    pub fn transition(
        &self,
        ran_name: &str,
        to: ProcedureState,
        failure: Option<FailureReason>,
    ) -> Result<ProcedureRecord, LifecycleError> {
        self.update(ran_name, to, |record| record.failure = failure)
    }

    /// `Pending -> Confirmed`, keeping the decoded response and platform id.
    pub fn confirm(
        &self,
        ran_name: &str,
        sub_id: i32,
        response: Option<SubscriptionResponse>,
    ) -> Result<ProcedureRecord, LifecycleError> {
        self.update(ran_name, ProcedureState::Confirmed, |record| {
            record.sub_id = sub_id;
            record.response = response;
        })
    }

    fn update(
        &self,
        ran_name: &str,
        to: ProcedureState,
        apply: impl FnOnce(&mut ProcedureRecord),
    ) -> Result<ProcedureRecord, LifecycleError> {
        let mut records = self.records.lock();
        let record = records
            .get_mut(ran_name)
            .ok_or_else(|| LifecycleError::RecordNotFound {
                ran_name: ran_name.to_string(),
            })?;

        if record.state.is_terminal() || to == ProcedureState::Pending {
            return Err(LifecycleError::InvalidTransition {
                ran_name: ran_name.to_string(),
                from: record.state,
                to,
            });
        }

        record.state = to;
        apply(record);
        Ok(record.clone())
    }

    pub fn record_attempt(&self, ran_name: &str) {
        if let Some(record) = self.records.lock().get_mut(ran_name) {
            record.send_attempts += 1;
        }
    }

    pub fn get(&self, ran_name: &str) -> Option<ProcedureRecord> {
        self.records.lock().get(ran_name).cloned()
    }

    pub fn state(&self, ran_name: &str) -> Option<ProcedureState> {
        self.records.lock().get(ran_name).map(|r| r.state)
    }

    pub fn pending_count(&self) -> usize {
        self.records
            .lock()
            .values()
            .filter(|r| r.state == ProcedureState::Pending)
            .count()
    }
}
