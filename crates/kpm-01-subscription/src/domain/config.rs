//! Lifecycle configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use kpm_01_subscription::domain::LifecycleConfigBuilder;
//!
//! let config = LifecycleConfigBuilder::new()
//!     .create_expiry(Duration::from_secs(5))
//!     .max_send_attempts(10)
//!     .build()?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

/// What to do when a Create procedure expires unanswered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryCleanup {
    /// Record the expiry and stop.
    #[default]
    Disabled,
    /// Additionally start a Delete procedure toward the node.
    SendDelete,
}

/// Timing and retry policy for both procedures.
///
/// Durations are read once when a manager is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// How long a Create request may stay unanswered
    pub create_expiry: Duration,
    /// How long a Delete request may stay unanswered
    pub delete_expiry: Duration,
    /// Create send attempts before giving up
    pub max_send_attempts: u32,
    /// Delay between failed Create send attempts
    pub retry_delay: Duration,
    /// Create-expiry cleanup policy
    pub expiry_cleanup: ExpiryCleanup,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            create_expiry: Duration::from_secs(5),
            delete_expiry: Duration::from_secs(5),
            max_send_attempts: 100,
            retry_delay: Duration::from_secs(5),
            expiry_cleanup: ExpiryCleanup::Disabled,
        }
    }
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.max_send_attempts == 0 {
            return Err(LifecycleError::InvalidConfig(
                "max_send_attempts cannot be 0".to_string(),
            ));
        }

        if self.create_expiry.is_zero() || self.delete_expiry.is_zero() {
            return Err(LifecycleError::InvalidConfig(
                "expiry durations must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for `LifecycleConfig` with validation
#[derive(Default)]
pub struct LifecycleConfigBuilder {
    create_expiry: Option<Duration>,
    delete_expiry: Option<Duration>,
    max_send_attempts: Option<u32>,
    retry_delay: Option<Duration>,
    expiry_cleanup: Option<ExpiryCleanup>,
}

impl LifecycleConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_expiry(mut self, duration: Duration) -> Self {
        self.create_expiry = Some(duration);
        self
    }

    pub fn delete_expiry(mut self, duration: Duration) -> Self {
        self.delete_expiry = Some(duration);
        self
    }

    pub fn max_send_attempts(mut self, attempts: u32) -> Self {
        self.max_send_attempts = Some(attempts);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn expiry_cleanup(mut self, policy: ExpiryCleanup) -> Self {
        self.expiry_cleanup = Some(policy);
        self
    }

    pub fn build(self) -> Result<LifecycleConfig, LifecycleError> {
        let defaults = LifecycleConfig::default();

        let config = LifecycleConfig {
            create_expiry: self.create_expiry.unwrap_or(defaults.create_expiry),
            delete_expiry: self.delete_expiry.unwrap_or(defaults.delete_expiry),
            max_send_attempts: self.max_send_attempts.unwrap_or(defaults.max_send_attempts),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
            expiry_cleanup: self.expiry_cleanup.unwrap_or(defaults.expiry_cleanup),
        };

        config.validate()?;
        Ok(config)
    }
}
