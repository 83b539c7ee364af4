//! Error types for the indication pipeline

use shared_types::DecodeError;
use thiserror::Error;

/// Why one Indication message was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicationError {
    #[error("indication from {ran_name} has no payload")]
    EmptyPayload { ran_name: String },

    #[error("failed to decode {stage}: {source}")]
    Decode {
        stage: DecodeStage,
        #[source]
        source: DecodeError,
    },

    /// A discriminator outside the known set at the input boundary.
    #[error("unsupported {what} value {value} in {stage}")]
    Protocol {
        stage: DecodeStage,
        what: &'static str,
        value: i64,
    },
}

impl IndicationError {
    /// Classify a codec failure: unknown discriminators are protocol
    /// violations, everything else is malformed input.
    pub fn from_decode(stage: DecodeStage, source: DecodeError) -> Self {
        match source {
            DecodeError::UnknownDiscriminator { what, value } => {
                IndicationError::Protocol { stage, what, value }
            }
            other => IndicationError::Decode {
                stage,
                source: other,
            },
        }
    }

    /// Label used for the result dimension of processing metrics.
    pub fn result_label(&self) -> &'static str {
        match self {
            IndicationError::EmptyPayload { .. } => "empty",
            IndicationError::Decode { .. } => "decode_error",
            IndicationError::Protocol { .. } => "protocol_error",
        }
    }
}

/// Which of the three decode calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Envelope,
    Header,
    Message,
}

impl std::fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecodeStage::Envelope => "RIC indication",
            DecodeStage::Header => "indication header",
            DecodeStage::Message => "indication message",
        };
        f.write_str(s)
    }
}

/// Errors from a metric sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("metric point has no fields")]
    NoFields,

    #[error("invalid write precision: {0}")]
    InvalidPrecision(String),

    #[error("sink unreachable: {0}")]
    Unreachable(String),

    #[error("sink rejected write with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
