//! E2SM-KPM Indication Header
//!
//! The header identifies the node that produced the report. Four node
//! shapes exist; each carries a PLMN id and a variant-specific bit-string
//! node id. The processor only reads the header for log correlation.

use serde::{Deserialize, Serialize};
use shared_types::BitString;

/// Decoded Indication Header. Format1 is the only format defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicationHeader {
    Format1(HeaderFormat1),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFormat1 {
    pub node_id: Option<GlobalKpmNodeId>,
    /// Timestamp octets as sent by the node.
    pub collect_start_time: Option<Vec<u8>>,
    pub file_format_version: Option<String>,
    pub sender_name: Option<String>,
    pub sender_type: Option<String>,
    pub vendor_name: Option<String>,
}

/// Global KPM node identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalKpmNodeId {
    Gnb {
        plmn_id: Vec<u8>,
        gnb_id: BitString,
        cu_up_id: Option<i64>,
        du_id: Option<i64>,
    },
    EnGnb {
        plmn_id: Vec<u8>,
        gnb_id: BitString,
    },
    NgEnb {
        plmn_id: Vec<u8>,
        enb_id: NgEnbId,
    },
    Enb {
        plmn_id: Vec<u8>,
        enb_id: EnbId,
    },
}

/// ng-eNB id choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NgEnbId {
    Macro(BitString),
    ShortMacro(BitString),
    LongMacro(BitString),
}

impl NgEnbId {
    pub fn kind(&self) -> &'static str {
        match self {
            NgEnbId::Macro(_) => "macro",
            NgEnbId::ShortMacro(_) => "short-macro",
            NgEnbId::LongMacro(_) => "long-macro",
        }
    }

    pub fn bits(&self) -> &BitString {
        match self {
            NgEnbId::Macro(b) | NgEnbId::ShortMacro(b) | NgEnbId::LongMacro(b) => b,
        }
    }
}

/// eNB id choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnbId {
    Macro(BitString),
    Home(BitString),
    ShortMacro(BitString),
    LongMacro(BitString),
}

impl EnbId {
    pub fn kind(&self) -> &'static str {
        match self {
            EnbId::Macro(_) => "macro",
            EnbId::Home(_) => "home",
            EnbId::ShortMacro(_) => "short-macro",
            EnbId::LongMacro(_) => "long-macro",
        }
    }

    pub fn bits(&self) -> &BitString {
        match self {
            EnbId::Macro(b) | EnbId::Home(b) | EnbId::ShortMacro(b) | EnbId::LongMacro(b) => b,
        }
    }
}

/// Flat view of a header node identity, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContext {
    /// "gNB", "en-gNB", "ng-eNB" or "eNB".
    pub variant: &'static str,
    /// Id choice inside the variant ("gnb", "macro", "home", ...).
    pub id_kind: &'static str,
    pub plmn_hex: String,
    pub node_id_hex: String,
    pub bits_unused: u8,
    pub cu_up_id: Option<i64>,
    pub du_id: Option<i64>,
}

impl GlobalKpmNodeId {
    pub fn variant_name(&self) -> &'static str {
        match self {
            GlobalKpmNodeId::Gnb { .. } => "gNB",
            GlobalKpmNodeId::EnGnb { .. } => "en-gNB",
            GlobalKpmNodeId::NgEnb { .. } => "ng-eNB",
            GlobalKpmNodeId::Enb { .. } => "eNB",
        }
    }

    pub fn plmn_id(&self) -> &[u8] {
        match self {
            GlobalKpmNodeId::Gnb { plmn_id, .. }
            | GlobalKpmNodeId::EnGnb { plmn_id, .. }
            | GlobalKpmNodeId::NgEnb { plmn_id, .. }
            | GlobalKpmNodeId::Enb { plmn_id, .. } => plmn_id,
        }
    }

    pub fn context(&self) -> NodeContext {
        let (id_kind, bits, cu_up_id, du_id) = match self {
            GlobalKpmNodeId::Gnb {
                gnb_id,
                cu_up_id,
                du_id,
                ..
            } => ("gnb", gnb_id, *cu_up_id, *du_id),
            GlobalKpmNodeId::EnGnb { gnb_id, .. } => ("gnb", gnb_id, None, None),
            GlobalKpmNodeId::NgEnb { enb_id, .. } => (enb_id.kind(), enb_id.bits(), None, None),
            GlobalKpmNodeId::Enb { enb_id, .. } => (enb_id.kind(), enb_id.bits(), None, None),
        };

        NodeContext {
            variant: self.variant_name(),
            id_kind,
            plmn_hex: hex::encode(self.plmn_id()),
            node_id_hex: bits.to_hex(),
            bits_unused: bits.bits_unused,
            cu_up_id,
            du_id,
        }
    }
}

impl IndicationHeader {
    pub fn format(&self) -> u8 {
        match self {
            IndicationHeader::Format1(_) => 1,
        }
    }

    pub fn node_context(&self) -> Option<NodeContext> {
        match self {
            IndicationHeader::Format1(f1) => f1.node_id.as_ref().map(GlobalKpmNodeId::context),
        }
    }
}
