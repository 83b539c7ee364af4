//! # xApp Container
//!
//! Configuration and the explicit context object that owns every component.
//! Nothing in the runtime reaches for a process-wide singleton; the context
//! is built once and handed to the dispatcher and the bootstrap.

pub mod config;
pub mod context;

pub use config::{parse_ran_list, ConfigError, SinkConfig, XappConfig};
pub use context::XappContext;
