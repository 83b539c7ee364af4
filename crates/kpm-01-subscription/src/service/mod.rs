//! Service layer: the two procedure managers.

mod procedure;
pub mod deletion_manager;
pub mod subscription_manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use deletion_manager::DeletionManager;
pub use procedure::ProcedureExpiryObserver;
pub use subscription_manager::SubscriptionManager;
