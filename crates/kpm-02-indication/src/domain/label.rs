//! Measurement labels
//!
//! Every attribute is optional. Absence means "not reported" and never turns
//! into a zero-valued tag or field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const TAG_PLMN_ID: &str = "PLMNID";
pub const TAG_SLICE_SST: &str = "SliceID.SST";
pub const TAG_SLICE_SD: &str = "SliceID.SD";

/// S-NSSAI: slice/service type plus optional slice differentiator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceId {
    pub sst: Vec<u8>,
    pub sd: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementLabel {
    pub plmn_id: Option<Vec<u8>>,
    pub slice_id: Option<SliceId>,
    pub five_qi: Option<i64>,
    pub qci: Option<i64>,
    pub qci_max: Option<i64>,
    pub qci_min: Option<i64>,
    pub arp_max: Option<i64>,
    pub arp_min: Option<i64>,
    pub bitrate_range: Option<i64>,
    pub layer_mu_mimo: Option<i64>,
    pub sum: Option<i64>,
    pub dist_bin_x: Option<i64>,
    pub dist_bin_y: Option<i64>,
    pub dist_bin_z: Option<i64>,
    pub pre_label_override: Option<i64>,
    pub start_end_ind: Option<i64>,
}

/// Octets rendered as text, byte for byte.
fn octets_as_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl MeasurementLabel {
    /// Tag set: PLMN id and slice attributes that are present.
    pub fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        if let Some(plmn) = &self.plmn_id {
            tags.insert(TAG_PLMN_ID.to_string(), octets_as_text(plmn));
        }
        if let Some(slice) = &self.slice_id {
            tags.insert(TAG_SLICE_SST.to_string(), octets_as_text(&slice.sst));
            if let Some(sd) = &slice.sd {
                tags.insert(TAG_SLICE_SD.to_string(), octets_as_text(sd));
            }
        }
        tags
    }

    /// Field set: numeric attributes that are present.
    pub fn fields(&self) -> BTreeMap<String, i64> {
        [
            ("FiveQI", self.five_qi),
            ("QCI", self.qci),
            ("QCImax", self.qci_max),
            ("QCImin", self.qci_min),
            ("ARPmax", self.arp_max),
            ("ARPmin", self.arp_min),
            ("BitrateRange", self.bitrate_range),
            ("LayerMU_MIMO", self.layer_mu_mimo),
            ("SUM", self.sum),
            ("DistBinX", self.dist_bin_x),
            ("DistBinY", self.dist_bin_y),
            ("DistBinZ", self.dist_bin_z),
            ("PreLabelOverride", self.pre_label_override),
            ("StartEndInd", self.start_end_ind),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
    }
}
