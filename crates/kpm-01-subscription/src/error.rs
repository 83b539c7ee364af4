//! Error types for the subscription lifecycle subsystem

use shared_types::{DecodeError, EncodeError, TransportError};
use thiserror::Error;

use crate::domain::{ProcedureKind, ProcedureState};

/// Errors that can occur while driving a Create or Delete procedure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{kind} procedure already pending for {ran_name}")]
    AlreadyPending { ran_name: String, kind: ProcedureKind },

    #[error("expiry timer already armed for {ran_name}")]
    AlreadyArmed { ran_name: String },

    #[error("gave up sending to {ran_name} after {attempts} attempts: {last_error}")]
    SendAttemptsExhausted {
        ran_name: String,
        attempts: u32,
        last_error: TransportError,
    },

    #[error("invalid transition for {ran_name}: {from} -> {to}")]
    InvalidTransition {
        ran_name: String,
        from: ProcedureState,
        to: ProcedureState,
    },

    #[error("no procedure record for {ran_name}")]
    RecordNotFound { ran_name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
