//! # Deletion Manager
//!
//! Drives the RIC Subscription Delete procedure. A Delete request is sent
//! once; a transport failure ends the procedure.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::RicTransport;
use shared_types::{MessageType, NodeIdentity, RicMessage};
use tracing::{error, info};

use crate::domain::{
    AnswerOutcome, AnsweredTable, DeleteRequestParams, DeletionTemplate, FailureReason,
    LifecycleConfig, ProcedureKind, ProcedureRecord, ProcedureState, SeqAllocator,
};
use crate::error::LifecycleError;
use crate::metrics::{LifecycleRecorder, NoOpRecorder};
use crate::ports::{ArmedProcedure, DeletionApi, SubscriptionCodec};
use crate::service::procedure::ProcedureCore;

pub struct DeletionManager {
    core: ProcedureCore,
    codec: Arc<dyn SubscriptionCodec>,
    transport: Arc<dyn RicTransport>,
    template: DeletionTemplate,
    seq: SeqAllocator,
}

impl DeletionManager {
    pub fn new(
        codec: Arc<dyn SubscriptionCodec>,
        transport: Arc<dyn RicTransport>,
        config: &LifecycleConfig,
    ) -> Self {
        let template = DeletionTemplate::default();
        Self {
            core: ProcedureCore::new(
                ProcedureKind::Delete,
                config.delete_expiry,
                Arc::new(NoOpRecorder),
            ),
            codec,
            transport,
            seq: SeqAllocator::starting_at(template.initial_seq_num),
            template,
        }
    }

    pub fn with_template(mut self, template: DeletionTemplate) -> Self {
        self.seq = SeqAllocator::starting_at(template.initial_seq_num);
        self.template = template;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn LifecycleRecorder>) -> Self {
        self.core.recorder = recorder;
        self
    }

    pub fn answered_table(&self) -> &Arc<AnsweredTable> {
        &self.core.answered
    }

    pub fn pending_count(&self) -> usize {
        self.core.records.pending_count()
    }

    fn answer(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        what: &'static str,
        state: ProcedureState,
        failure: Option<FailureReason>,
    ) -> AnswerOutcome {
        info!(ran_name = %node.ran_name, sub_id, "{} received", what);
        let outcome = self.core.mark(&node.ran_name, what);
        if outcome.is_first_answer() {
            self.core.finish(&node.ran_name, state, failure);
        }
        outcome
    }
}

#[async_trait]
impl DeletionApi for DeletionManager {
    async fn start_deletion(
        &self,
        node: NodeIdentity,
        sub_id: i32,
        func_id: u16,
    ) -> Result<ArmedProcedure, LifecycleError> {
        let ran_name = node.ran_name.clone();
        let params = DeleteRequestParams {
            request_id: self.template.request_id,
            request_seq_num: self.seq.next(),
            func_id,
        };

        self.core.begin(ProcedureRecord::pending(
            node.clone(),
            ProcedureKind::Delete,
            params.request_id,
            params.request_seq_num,
            func_id,
            sub_id,
        ))?;

        let payload = match self.codec.encode_subscription_delete(&params) {
            Ok(payload) => payload,
            Err(e) => {
                error!(ran_name = %ran_name, error = %e, "Failed to encode RIC_SUB_DEL_REQ");
                self.core.finish(
                    &ran_name,
                    ProcedureState::Failed,
                    Some(FailureReason::Encode(e.to_string())),
                );
                return Err(e.into());
            }
        };

        let msg = RicMessage::new(MessageType::SubscriptionDeleteRequest, sub_id, node, payload);
        self.core.records.record_attempt(&ran_name);

        if let Err(e) = self.transport.send(msg).await {
            self.core.recorder.record_send_attempt(ProcedureKind::Delete, false);
            error!(ran_name = %ran_name, error = %e, "Failed to send RIC_SUB_DEL_REQ");
            self.core.finish(
                &ran_name,
                ProcedureState::Failed,
                Some(FailureReason::Transport(e.to_string())),
            );
            return Err(e.into());
        }
        self.core.recorder.record_send_attempt(ProcedureKind::Delete, true);

        info!(
            ran_name = %ran_name,
            sub_id,
            request_seq_num = params.request_seq_num,
            "RIC_SUB_DEL_REQ sent"
        );

        let timer = self.core.arm(&ran_name, None)?;
        Ok(ArmedProcedure {
            ran_name,
            attempts: 1,
            timer,
        })
    }

    fn on_deletion_response(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        _payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError> {
        Ok(self.answer(
            node,
            sub_id,
            "RIC_SUB_DEL_RESP",
            ProcedureState::Confirmed,
            None,
        ))
    }

    fn on_deletion_failure(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError> {
        info!(ran_name = %node.ran_name, bytes = payload.len(), "Delete rejected by node");
        Ok(self.answer(
            node,
            sub_id,
            "RIC_SUB_DEL_FAILURE",
            ProcedureState::Failed,
            Some(FailureReason::Rejected),
        ))
    }

    fn record(&self, ran_name: &str) -> Option<ProcedureRecord> {
        self.core.records.get(ran_name)
    }
}
