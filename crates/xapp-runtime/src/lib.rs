//! # xApp Runtime Library
//!
//! Exposes the runtime modules for the `kpimon` binary and for integration
//! tests.
//!
//! ## Structure
//!
//! - `container/` - `XappConfig` from the environment and the `XappContext`
//!   that owns every component
//! - `dispatcher` - the single inbound message loop
//! - `adapters/` - codec, metric sinks and the Prometheus recorder
//! - `runtime` - startup sequencing and graceful shutdown
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load and validate configuration
//! 3. Build the context (managers, processor, adapters)
//! 4. Start the dispatcher
//! 5. After the startup delay, send one Create request per node
//! 6. Run until Ctrl-C, then signal shutdown

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod container;
pub mod dispatcher;
pub mod runtime;

pub use container::{ConfigError, SinkConfig, XappConfig, XappContext};
pub use dispatcher::{DispatchOutcome, DispatcherSnapshot, DispatcherStats, MessageDispatcher};
pub use runtime::{StartResult, XappRuntime};
