//! Binary serialization for ATNs using postcard.

use super::Atn;
use crate::error::AtnError;

impl Atn {
    /// Deserialize and verify.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, AtnError> {
        let atn: Atn =
            postcard::from_bytes(bytes).map_err(|e| AtnError::Binary(e.to_string()))?;
        atn.verify()?;
        Ok(atn)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("serialization should not fail")
    }

    /// CRC32 of the binary form. Two ATNs with equal fingerprints are
    /// treated as the same grammar by long-lived caches.
    pub fn fingerprint(&self) -> u32 {
        crc32fast::hash(&self.to_binary())
    }
}
