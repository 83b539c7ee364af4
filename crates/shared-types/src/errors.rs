//! # Shared Error Types
//!
//! Errors that cross subsystem boundaries: transport sends and codec calls.
//! Subsystem-specific errors wrap these through `#[from]`.

use thiserror::Error;

/// Failure of the fire-and-forget transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("send of message type {mtype} to {ran_name} failed: {reason}")]
    SendFailed {
        mtype: i32,
        ran_name: String,
        reason: String,
    },

    #[error("transport is closed")]
    Closed,
}

/// Malformed or unsupported payload handed to a decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("unknown {what} discriminator: {value}")]
    UnknownDiscriminator { what: &'static str, value: i64 },

    #[error("empty {0} payload")]
    Empty(&'static str),
}

/// Failure to build an outbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("failed to encode {what}: {reason}")]
    Failed { what: &'static str, reason: String },

    #[error("invalid {what}: {reason}")]
    InvalidParameter { what: &'static str, reason: String },
}

/// Invalid node identity input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid bit string {input:?}: unexpected character {offending:?}")]
    InvalidBitString { input: String, offending: char },

    #[error("invalid PLMN id {input:?}: {reason}")]
    InvalidPlmn { input: String, reason: String },
}
