//! # KPM-01 Subscription Lifecycle
//!
//! Issues E2AP RIC Subscription Create/Delete requests toward radio nodes,
//! tracks each node's outcome, retries refused sends and expires unanswered
//! requests.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): no transport I/O
//!   - `AnsweredTable`: `ran_name -> answered`, one per procedure kind
//!   - `ExpiryTimer`: per-node countdown, `Armed -> {Expired | Cancelled}`
//!   - `RecordBook`: per-node `ProcedureRecord` with monotonic state
//!   - `LifecycleConfig` / `LifecycleConfigBuilder`
//!
//! - **Ports Layer** (`ports/`)
//!   - `SubscriptionApi`, `DeletionApi`: driving ports used by bootstrap and
//!     the message dispatcher
//!   - `SubscriptionCodec`: driven port to the E2AP codec
//!
//! - **Service Layer** (`service/`)
//!   - `SubscriptionManager`: Create procedure with bounded send retry
//!   - `DeletionManager`: Delete procedure, single send
//!
//! ## Invariants
//!
//! - At most one `Pending` record per node per procedure kind.
//! - A record leaves `Pending` once and never changes again.
//! - An answered-table entry is removed exactly once, by its timer.
//! - The timer is armed only after the transport accepted the request.
//! - Late or duplicate answers change nothing beyond a log line.
//!
//! ## Usage
//!
//! ```ignore
//! use kpm_01_subscription::{LifecycleConfig, SubscriptionApi, SubscriptionManager};
//!
//! let manager = SubscriptionManager::new(codec, transport, LifecycleConfig::default());
//! let armed = manager.start_subscription(node, 0).await?;
//! // ... dispatcher calls manager.on_subscription_response(...)
//! let outcome = armed.timer.await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    AnswerOutcome, AnsweredTable, ArmedFlag, ExpiryCleanup, ExpiryTimer, FailureReason,
    LifecycleConfig, LifecycleConfigBuilder, NotAdmittedAction, ProcedureKind, ProcedureRecord, ProcedureState,
    SubscriptionRequestParams, SubscriptionRequestTemplate, SubscriptionResponse, TimerOutcome,
};
pub use error::LifecycleError;
pub use metrics::{LifecycleMetrics, LifecycleRecorder, LifecycleSnapshot, NoOpRecorder};
pub use ports::{ArmedProcedure, DeletionApi, SubscriptionApi, SubscriptionCodec};
pub use service::{DeletionManager, SubscriptionManager};
