//! # Shared Bus - RIC Transport Plumbing
//!
//! Everything between the xApp core and the RIC message router.
//!
//! ## Flow
//!
//! ```text
//!  Radio node ──► message router ──► InboundSender ──► InboundQueue ──► MessageDispatcher
//!                                                                              │
//!  Radio node ◄── message router ◄──────────── RicTransport::send ◄────────────┘
//! ```
//!
//! - **`RicTransport`**: fire-and-forget `send` and `reply_to_sender`. The
//!   core only learns whether the router accepted the message.
//! - **`InboundQueue`**: the single FIFO the dispatcher drains. There is
//!   exactly one consumer.
//! - **`InMemoryTransport`**: an in-process router used by the binary when no
//!   external router is attached, and by tests. Supports failure injection
//!   and an outbound tap.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod inbound;
pub mod transport;

pub use inbound::{inbound_channel, InboundQueue, InboundSender};
pub use transport::{InMemoryTransport, RicTransport, SentMessage};

/// Maximum inbound messages buffered before senders wait.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
