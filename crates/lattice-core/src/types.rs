//! Strong type definitions for the lattice ledger.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte block hash, computed as Blake3(canonical_hashable_bytes(block)).
///
/// This is the content-address of a block and its sole identity: two blocks
/// with the same hashable fields have the same hash. The all-zero value is a
/// reserved sentinel meaning "no dependency" and never names a real block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    /// Create a new BlockHash from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the Blake3 digest of the given data.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash: the "no dependency" sentinel.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Whether this is the sentinel value.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for BlockHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// An amount of ledger units, in the smallest denomination.
///
/// Stored as 16 big-endian bytes in the canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(pub u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Get the raw value.
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Big-endian byte encoding, as used in the canonical form.
    pub const fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Decode from big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_hash_hex_roundtrip() {
        let hash = BlockHash::from_bytes([0x42; 32]);
        let hex = hash.to_hex();
        let recovered = BlockHash::from_hex(&hex).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_block_hash_display() {
        let hash = BlockHash::from_bytes([0xab; 32]);
        let display = format!("{}", hash);
        assert_eq!(display, "abababababababab");
    }

    #[test]
    fn test_block_hash_debug() {
        let hash = BlockHash::from_bytes([0xcd; 32]);
        let debug = format!("{:?}", hash);
        assert!(debug.starts_with("BlockHash("));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(BlockHash::ZERO.is_zero());
        assert!(!BlockHash::from_bytes([1; 32]).is_zero());
    }

    #[test]
    fn test_digest_deterministic() {
        let h1 = BlockHash::digest(b"block data");
        let h2 = BlockHash::digest(b"block data");
        assert_eq!(h1, h2);
        assert_ne!(h1, BlockHash::digest(b"other data"));
    }

    #[test]
    fn test_amount_be_bytes_roundtrip() {
        let amount = Amount(340_282_366_920_938_463_463_374_607_431_768_211_455);
        assert_eq!(Amount::from_be_bytes(amount.to_be_bytes()), amount);
        assert_eq!(Amount::from_be_bytes(Amount::ZERO.to_be_bytes()), Amount::ZERO);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_hash_hex_roundtrip(bytes in any::<[u8; 32]>()) {
                let hash = BlockHash::from_bytes(bytes);
                prop_assert_eq!(BlockHash::from_hex(&hash.to_hex()).unwrap(), hash);
            }

            #[test]
            fn prop_amount_be_roundtrip(raw in any::<u128>()) {
                let amount = Amount(raw);
                prop_assert_eq!(Amount::from_be_bytes(amount.to_be_bytes()), amount);
            }
        }
    }
}
