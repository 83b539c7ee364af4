//! # Subscription Manager
//!
//! Drives the RIC Subscription Create procedure:
//!
//! 1. Encode the event trigger and action list, then the request.
//! 2. Send. A refused send is retried after `retry_delay`, up to
//!    `max_send_attempts` in total.
//! 3. After the first accepted send, arm the Create-expiry timer.
//! 4. The first response or failure for the node decides the record's state.
//!    Anything arriving after that is logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::RicTransport;
use shared_types::{EncodeError, MessageType, NodeIdentity, RicMessage, TransportError};
use tracing::{debug, error, info, warn};

use crate::domain::{
    ActionToBeSetup, AnswerOutcome, AnsweredTable, ExpiryCleanup, FailureReason,
    LifecycleConfig, ProcedureKind, ProcedureRecord, ProcedureState, SeqAllocator,
    SubscriptionRequestParams, SubscriptionRequestTemplate, SubscriptionResponse,
};
use crate::error::LifecycleError;
use crate::metrics::{LifecycleRecorder, NoOpRecorder};
use crate::ports::{ArmedProcedure, DeletionApi, SubscriptionApi, SubscriptionCodec};
use crate::service::procedure::ProcedureCore;

/// Sub id carried on a Create request before the platform assigns one.
const UNASSIGNED_SUB_ID: i32 = -1;

pub struct SubscriptionManager {
    core: ProcedureCore,
    codec: Arc<dyn SubscriptionCodec>,
    transport: Arc<dyn RicTransport>,
    config: LifecycleConfig,
    template: SubscriptionRequestTemplate,
    seq: SeqAllocator,
    cleanup: Option<Arc<dyn DeletionApi>>,
}

impl SubscriptionManager {
    pub fn new(
        codec: Arc<dyn SubscriptionCodec>,
        transport: Arc<dyn RicTransport>,
        config: LifecycleConfig,
    ) -> Self {
        let template = SubscriptionRequestTemplate::default();
        Self {
            core: ProcedureCore::new(
                ProcedureKind::Create,
                config.create_expiry,
                Arc::new(NoOpRecorder),
            ),
            codec,
            transport,
            config,
            seq: SeqAllocator::starting_at(template.initial_seq_num),
            template,
            cleanup: None,
        }
    }

    pub fn with_template(mut self, template: SubscriptionRequestTemplate) -> Self {
        self.seq = SeqAllocator::starting_at(template.initial_seq_num);
        self.template = template;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn LifecycleRecorder>) -> Self {
        self.core.recorder = recorder;
        self
    }

    /// Deletion manager used when `expiry_cleanup` is `SendDelete`.
    pub fn with_cleanup(mut self, deletion: Arc<dyn DeletionApi>) -> Self {
        self.cleanup = Some(deletion);
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn answered_table(&self) -> &Arc<AnsweredTable> {
        &self.core.answered
    }

    pub fn pending_count(&self) -> usize {
        self.core.records.pending_count()
    }

    fn build_request(
        &self,
        request_seq_num: u32,
        func_id: u16,
    ) -> Result<SubscriptionRequestParams, EncodeError> {
        let event_trigger = self.codec.encode_event_trigger(
            self.template.event_trigger_count,
            self.template.report_period_secs,
        )?;
        debug!(event_trigger = ?event_trigger, "Event trigger definition encoded");

        let mut actions = Vec::with_capacity(self.template.actions.len());
        let mut subsequent_actions = Vec::with_capacity(self.template.actions.len());
        for spec in &self.template.actions {
            let definition = if spec.style_type == 0 {
                Vec::new()
            } else {
                self.codec.encode_action_definition(spec.style_type)?
            };
            actions.push(ActionToBeSetup {
                action_id: spec.action_id,
                action_type: spec.action_type,
                definition,
            });
            subsequent_actions.push(spec.subsequent);
        }

        Ok(SubscriptionRequestParams {
            request_id: self.template.request_id,
            request_seq_num,
            func_id,
            event_trigger,
            actions,
            subsequent_actions,
        })
    }

    fn cleanup_followup(&self) -> Option<Arc<dyn DeletionApi>> {
        match self.config.expiry_cleanup {
            ExpiryCleanup::Disabled => None,
            ExpiryCleanup::SendDelete => {
                if self.cleanup.is_none() {
                    warn!("Expiry cleanup enabled but no deletion manager attached");
                }
                self.cleanup.clone()
            }
        }
    }

    fn log_response(&self, ran_name: &str, sub_id: i32, response: &SubscriptionResponse) {
        info!(
            ran_name,
            sub_id,
            request_id = response.request_id,
            request_seq_num = response.request_seq_num,
            func_id = response.func_id,
            "RIC_SUB_RESP received"
        );
        for (index, action_id) in response.admitted.iter().enumerate() {
            info!(ran_name, index, action_id, "Action admitted");
        }
        for (index, entry) in response.not_admitted.iter().enumerate() {
            warn!(
                ran_name,
                index,
                action_id = entry.action_id,
                cause_type = entry.cause_type,
                cause_id = entry.cause_id,
                "Action not admitted"
            );
        }
    }
}

#[async_trait]
impl SubscriptionApi for SubscriptionManager {
    async fn start_subscription(
        &self,
        node: NodeIdentity,
        func_id: u16,
    ) -> Result<ArmedProcedure, LifecycleError> {
        let ran_name = node.ran_name.clone();
        let request_seq_num = self.seq.next();

        self.core.begin(ProcedureRecord::pending(
            node.clone(),
            ProcedureKind::Create,
            self.template.request_id,
            request_seq_num,
            func_id,
            UNASSIGNED_SUB_ID,
        ))?;

        let payload = match self
            .build_request(request_seq_num, func_id)
            .and_then(|params| self.codec.encode_subscription_request(&params))
        {
            Ok(payload) => payload,
            Err(e) => {
                error!(ran_name = %ran_name, error = %e, "Failed to encode RIC_SUB_REQ");
                self.core.finish(
                    &ran_name,
                    ProcedureState::Failed,
                    Some(FailureReason::Encode(e.to_string())),
                );
                return Err(e.into());
            }
        };

        let max_attempts = self.config.max_send_attempts;
        let mut last_error = TransportError::Closed;

        for attempt in 1..=max_attempts {
            self.core.records.record_attempt(&ran_name);
            let msg = RicMessage::new(
                MessageType::SubscriptionRequest,
                UNASSIGNED_SUB_ID,
                node.clone(),
                payload.clone(),
            );

            match self.transport.send(msg).await {
                Ok(()) => {
                    self.core
                        .recorder
                        .record_send_attempt(ProcedureKind::Create, true);
                    info!(
                        ran_name = %ran_name,
                        attempt,
                        request_seq_num,
                        func_id,
                        "RIC_SUB_REQ sent"
                    );

                    let timer = self.core.arm(&ran_name, self.cleanup_followup())?;
                    return Ok(ArmedProcedure {
                        ran_name,
                        attempts: attempt,
                        timer,
                    });
                }
                Err(e) => {
                    self.core
                        .recorder
                        .record_send_attempt(ProcedureKind::Create, false);
                    warn!(
                        ran_name = %ran_name,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Failed to send RIC_SUB_REQ"
                    );
                    last_error = e;
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        error!(
            ran_name = %ran_name,
            attempts = max_attempts,
            "Giving up on RIC_SUB_REQ"
        );
        self.core.finish(
            &ran_name,
            ProcedureState::Failed,
            Some(FailureReason::SendAttemptsExhausted {
                attempts: max_attempts,
            }),
        );
        Err(LifecycleError::SendAttemptsExhausted {
            ran_name,
            attempts: max_attempts,
            last_error,
        })
    }

    fn on_subscription_response(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError> {
        let ran_name = node.ran_name.as_str();
        debug!(ran_name, sub_id, "RIC_SUB_RESP arrived");

        let outcome = self.core.mark(ran_name, "RIC_SUB_RESP");
        if !outcome.is_first_answer() {
            return Ok(outcome);
        }

        let response = match self.codec.decode_subscription_response(payload) {
            Ok(response) => response,
            Err(e) => {
                error!(ran_name, error = %e, "Failed to decode RIC_SUB_RESP");
                self.core
                    .finish(ran_name, ProcedureState::Cancelled, None);
                return Err(e.into());
            }
        };

        self.log_response(ran_name, sub_id, &response);

        if let Some(record) = self.core.records.get(ran_name) {
            if record.request_seq_num != response.request_seq_num {
                warn!(
                    ran_name,
                    expected = record.request_seq_num,
                    received = response.request_seq_num,
                    "RIC_SUB_RESP sequence number does not match the pending request"
                );
            }
        }

        match self.core.records.confirm(ran_name, sub_id, Some(response)) {
            Ok(_) => self
                .core
                .recorder
                .record_outcome(ProcedureKind::Create, ProcedureState::Confirmed),
            Err(e) => debug!(ran_name, error = %e, "Record not updated"),
        }
        Ok(outcome)
    }

    fn on_subscription_failure(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError> {
        let ran_name = node.ran_name.as_str();
        info!(ran_name, sub_id, bytes = payload.len(), "RIC_SUB_FAILURE received");

        let outcome = self.core.mark(ran_name, "RIC_SUB_FAILURE");
        if outcome.is_first_answer() {
            self.core.finish(
                ran_name,
                ProcedureState::Failed,
                Some(FailureReason::Rejected),
            );
        }
        Ok(outcome)
    }

    fn record(&self, ran_name: &str) -> Option<ProcedureRecord> {
        self.core.records.get(ran_name)
    }
}
