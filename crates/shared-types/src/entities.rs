//! # Core Domain Entities
//!
//! Identity types for radio nodes. A `NodeIdentity` is immutable once it has
//! been handed to a procedure; the lifecycle tables key on `ran_name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IdentityError;

/// An ASN.1-style bit string: packed bytes, most significant bit first, with
/// a count of unused trailing bits in the last byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitString {
    pub bytes: Vec<u8>,
    pub bits_unused: u8,
}

impl BitString {
    pub fn new(bytes: Vec<u8>, bits_unused: u8) -> Self {
        Self { bytes, bits_unused }
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.bits_unused as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len() == 0
    }

    /// Hex rendering of the packed bytes (unused bits included as zeros).
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Returns the bit at `index` (0 = most significant bit of byte 0).
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len() {
            return None;
        }
        let byte = self.bytes[index / 8];
        Some(byte & (0x80 >> (index % 8)) != 0)
    }
}

impl FromStr for BitString {
    type Err = IdentityError;

    /// Parses a string of `0`/`1` characters, most significant bit first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s.trim();
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, c) in bits.chars().enumerate() {
            match c {
                '1' => bytes[i / 8] |= 0x80 >> (i % 8),
                '0' => {}
                other => {
                    return Err(IdentityError::InvalidBitString {
                        input: s.to_string(),
                        offending: other,
                    })
                }
            }
        }
        let bits_unused = ((8 - bits.len() % 8) % 8) as u8;
        Ok(Self { bytes, bits_unused })
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.bit_len() {
            let set = self.bit(i).unwrap_or(false);
            f.write_str(if set { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Identifies a radio node (the RMR "MEID").
///
/// `ran_name` is the logical correlation key used by the subscription
/// lifecycle tables. `plmn_id` and `node_id_bits` are carried for the
/// transport and for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub plmn_id: Vec<u8>,
    pub node_id_bits: BitString,
    pub ran_name: String,
}

impl NodeIdentity {
    /// Identity known only by its RAN name.
    pub fn named(ran_name: impl Into<String>) -> Self {
        Self {
            plmn_id: Vec::new(),
            node_id_bits: BitString::default(),
            ran_name: ran_name.into(),
        }
    }

    pub fn new(ran_name: impl Into<String>, plmn_id: Vec<u8>, node_id_bits: BitString) -> Self {
        Self {
            plmn_id,
            node_id_bits,
            ran_name: ran_name.into(),
        }
    }

    pub fn plmn_hex(&self) -> String {
        hex::encode(&self.plmn_id)
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plmn_id.is_empty() && self.node_id_bits.is_empty() {
            write!(f, "{}", self.ran_name)
        } else {
            write!(
                f,
                "{} (plmn={}, node={})",
                self.ran_name,
                self.plmn_hex(),
                self.node_id_bits
            )
        }
    }
}
