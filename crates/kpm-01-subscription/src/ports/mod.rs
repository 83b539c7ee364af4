//! Ports layer: the driving API and the codec this subsystem depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::{ArmedProcedure, DeletionApi, SubscriptionApi};
pub use outbound::SubscriptionCodec;
