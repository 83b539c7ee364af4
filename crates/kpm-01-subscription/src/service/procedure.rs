//! Bookkeeping shared by the Create and Delete managers: record book,
//! answered table, timer arming and the "first answer wins" rule.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::{
    AnswerOutcome, AnsweredTable, ExpiryObserver, ExpiryTimer, FailureReason, ProcedureKind,
    ProcedureRecord, ProcedureState, RecordBook, TimerOutcome,
};
use crate::error::LifecycleError;
use crate::metrics::LifecycleRecorder;
use crate::ports::DeletionApi;

pub(crate) struct ProcedureCore {
    pub(crate) kind: ProcedureKind,
    pub(crate) expiry: Duration,
    pub(crate) answered: Arc<AnsweredTable>,
    pub(crate) records: Arc<RecordBook>,
    pub(crate) recorder: Arc<dyn LifecycleRecorder>,
}

impl ProcedureCore {
    pub(crate) fn new(
        kind: ProcedureKind,
        expiry: Duration,
        recorder: Arc<dyn LifecycleRecorder>,
    ) -> Self {
        Self {
            kind,
            expiry,
            answered: Arc::new(AnsweredTable::new(kind.as_str())),
            records: Arc::new(RecordBook::new(kind)),
            recorder,
        }
    }

    /// Open a record. Only a `Pending` record blocks a new start; an
    /// answered flag still waiting on its timer is replaced at arm time.
    pub(crate) fn begin(&self, record: ProcedureRecord) -> Result<(), LifecycleError> {
        self.records.begin(record)
    }

    /// Move the node's record to a terminal state and count it.
    pub(crate) fn finish(
        &self,
        ran_name: &str,
        state: ProcedureState,
        failure: Option<FailureReason>,
    ) {
        match self.records.transition(ran_name, state, failure) {
            Ok(_) => self.recorder.record_outcome(self.kind, state),
            Err(e) => debug!(kind = %self.kind, ran_name, error = %e, "Record not updated"),
        }
    }

    pub(crate) fn arm(
        &self,
        ran_name: &str,
        followup: Option<Arc<dyn DeletionApi>>,
    ) -> Result<JoinHandle<TimerOutcome>, LifecycleError> {
        let observer = Arc::new(ProcedureExpiryObserver {
            kind: self.kind,
            records: self.records.clone(),
            recorder: self.recorder.clone(),
            followup,
        });

        match ExpiryTimer::arm(self.answered.clone(), ran_name, self.expiry, observer) {
            Ok(handle) => {
                self.recorder.record_timer_armed(self.kind);
                Ok(handle)
            }
            Err(e) => {
                error!(kind = %self.kind, ran_name, error = %e, "Could not arm expiry timer");
                self.finish(
                    ran_name,
                    ProcedureState::Failed,
                    Some(FailureReason::TimerConflict),
                );
                Err(e)
            }
        }
    }

    /// Mark the node answered. `Late` and `Duplicate` are logged and counted,
    /// never errors.
    pub(crate) fn mark(&self, ran_name: &str, what: &'static str) -> AnswerOutcome {
        let outcome = self.answered.mark_answered(ran_name);
        match outcome {
            AnswerOutcome::Marked => {}
            AnswerOutcome::Duplicate => {
                debug!(ran_name, answer = what, "Duplicate answer ignored");
                self.recorder.record_ignored_answer(self.kind);
            }
            AnswerOutcome::Late => {
                debug!(
                    ran_name,
                    answer = what,
                    "No pending {} request, answer ignored",
                    self.kind
                );
                self.recorder.record_ignored_answer(self.kind);
            }
        }
        outcome
    }
}

/// Applies a timer outcome to the record book.
///
/// On `Expired` the record becomes `Expired`. When `followup` is set, a
/// Delete procedure is started toward the same node.
pub struct ProcedureExpiryObserver {
    kind: ProcedureKind,
    records: Arc<RecordBook>,
    recorder: Arc<dyn LifecycleRecorder>,
    followup: Option<Arc<dyn DeletionApi>>,
}

#[async_trait]
impl ExpiryObserver for ProcedureExpiryObserver {
    async fn on_timer_resolved(&self, ran_name: &str, outcome: TimerOutcome) {
        self.recorder.record_timer_resolved(self.kind, outcome);

        if outcome == TimerOutcome::Cancelled {
            return;
        }

        let record = match self
            .records
            .transition(ran_name, ProcedureState::Expired, None)
        {
            Ok(record) => {
                self.recorder
                    .record_outcome(self.kind, ProcedureState::Expired);
                record
            }
            Err(e) => {
                warn!(kind = %self.kind, ran_name, error = %e, "Expired timer without a pending record");
                return;
            }
        };

        if let Some(deletion) = &self.followup {
            warn!(ran_name, sub_id = record.sub_id, "Sending RIC_SUB_DEL_REQ as expiry cleanup");
            if let Err(e) = deletion
                .start_deletion(record.node.clone(), record.sub_id, record.func_id)
                .await
            {
                error!(ran_name, error = %e, "Expiry cleanup delete failed");
            }
        }
    }
}
