//! Domain layer: lifecycle state, tables and timers. No transport I/O.

pub mod answered;
pub mod config;
pub mod expiry;
pub mod records;
pub mod request;
pub mod response;

pub use answered::{AnswerOutcome, AnsweredTable, ArmedFlag};
pub use config::{ExpiryCleanup, LifecycleConfig, LifecycleConfigBuilder};
pub use expiry::{ExpiryObserver, ExpiryTimer, TimerOutcome};
pub use records::{FailureReason, ProcedureKind, ProcedureRecord, ProcedureState, RecordBook};
pub use request::{
    ActionSpec, ActionToBeSetup, ActionType, DeleteRequestParams, DeletionTemplate,
    SeqAllocator, SubscriptionRequestParams, SubscriptionRequestTemplate, SubsequentAction,
    SubsequentActionType, TimeToWait,
};
pub use response::{NotAdmittedAction, SubscriptionResponse};
