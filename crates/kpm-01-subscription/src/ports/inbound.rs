//! Inbound Ports (Driving Ports)
//!
//! Called by bootstrap (`start_*`) and by the message dispatcher (`on_*`).
//! The `on_*` handlers never block: they touch the answered table and the
//! record book and return.

use async_trait::async_trait;
use shared_types::NodeIdentity;
use tokio::task::JoinHandle;

use crate::domain::{AnswerOutcome, ProcedureRecord, TimerOutcome};
use crate::error::LifecycleError;

/// A request that was accepted by the transport and now has a live timer.
#[derive(Debug)]
pub struct ArmedProcedure {
    pub ran_name: String,
    /// Send attempts it took, including the successful one.
    pub attempts: u32,
    pub timer: JoinHandle<TimerOutcome>,
}

/// RIC Subscription Create procedure
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Encode, send (with bounded retry) and arm the Create-expiry timer.
    async fn start_subscription(
        &self,
        node: NodeIdentity,
        func_id: u16,
    ) -> Result<ArmedProcedure, LifecycleError>;

    /// Handle RIC_SUB_RESP.
    fn on_subscription_response(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError>;

    /// Handle RIC_SUB_FAILURE.
    fn on_subscription_failure(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError>;

    fn record(&self, ran_name: &str) -> Option<ProcedureRecord>;
}

/// RIC Subscription Delete procedure
#[async_trait]
pub trait DeletionApi: Send + Sync {
    /// Encode, send once and arm the Delete-expiry timer.
    async fn start_deletion(
        &self,
        node: NodeIdentity,
        sub_id: i32,
        func_id: u16,
    ) -> Result<ArmedProcedure, LifecycleError>;

    /// Handle RIC_SUB_DEL_RESP.
    fn on_deletion_response(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError>;

    /// Handle RIC_SUB_DEL_FAILURE.
    fn on_deletion_failure(
        &self,
        node: &NodeIdentity,
        sub_id: i32,
        payload: &[u8],
    ) -> Result<AnswerOutcome, LifecycleError>;

    fn record(&self, ran_name: &str) -> Option<ProcedureRecord>;
}
