//! Inbound Ports (Driving Ports)
//!
//! Called by the message dispatcher for every `RIC_INDICATION`.

use async_trait::async_trait;
use shared_types::RicMessage;

use crate::error::IndicationError;

/// What one successfully processed Indication produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicationSummary {
    pub report_format: u8,
    pub points_emitted: usize,
    pub sink_failures: usize,
    pub measurement_records: usize,
    pub test_conditions: usize,
}

#[async_trait]
pub trait IndicationApi: Send + Sync {
    /// Decode, flatten and forward one Indication.
    ///
    /// An error means the message was discarded. Sink failures do not make
    /// this fail; they are counted in the summary.
    async fn handle(&self, message: &RicMessage) -> Result<IndicationSummary, IndicationError>;
}
