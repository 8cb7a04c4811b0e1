//! Binary serialization for grammars using postcard.

use super::error::GrammarError;
use super::types::Grammar;

impl Grammar {
    /// Deserialize grammar from binary format.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarError> {
        postcard::from_bytes(bytes).map_err(GrammarError::Binary)
    }

    /// Serialize grammar to binary format.
    pub fn to_binary(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("serialization should not fail")
    }

    /// CRC32 of the binary form. Changes whenever any rule changes.
    pub fn fingerprint(&self) -> u32 {
        crc32fast::hash(&self.to_binary())
    }
}
