//! # Shared Types Crate
//!
//! Domain entities and transport-level message types shared by the KPIMON
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `NodeIdentity`, `BitString` and the
//!   `RicMessage` envelope are defined here and nowhere else.
//! - **Wire Constants**: `MessageType` carries the de-facto message-type codes
//!   exchanged with the RIC platform. They must not be renumbered.
//! - **Opaque Payloads**: the envelope never interprets its payload; decoding
//!   belongs to the codec adapters.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{MessageType, RicMessage};
pub use errors::*;
