//! Strong type definitions for the star ledger.
//!
//! Identifiers are newtypes so a block hash can never be passed where a
//! wallet address is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::crypto::Ed25519PublicKey;

/// A 32-byte block hash, computed as Blake3(domain || canonical block bytes).
///
/// Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    /// Create a new BlockHash from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
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
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
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

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A wallet address: the hex encoding of an Ed25519 public key.
///
/// Addresses are compared as strings. An address that does not decode to a
/// valid key can still be named (e.g. in a star listing query), it just can
/// never pass an ownership proof.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Wrap an address string as given.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address owned by a public key.
    pub fn from_public_key(key: &Ed25519PublicKey) -> Self {
        Self(key.to_hex())
    }

    /// Decode the public key this address names, if it names one.
    ///
    /// Only the canonical lowercase form names a key, so every key has
    /// exactly one address that can prove ownership.
    pub fn public_key(&self) -> Option<Ed25519PublicKey> {
        Ed25519PublicKey::from_hex(&self.0)
            .ok()
            .filter(|key| key.to_hex() == self.0)
    }

    /// The address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_block_hash_hex_roundtrip() {
        let hash = BlockHash::from_bytes([0x42; 32]);
        let recovered = BlockHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_block_hash_rejects_wrong_length() {
        assert!(BlockHash::from_hex("abcd").is_err());
        assert!(BlockHash::from_hex(&"ab".repeat(33)).is_err());
    }

    #[test]
    fn test_block_hash_display_is_full_hex() {
        let hash = BlockHash::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", hash), "ab".repeat(32));
        assert!(format!("{:?}", hash).starts_with("BlockHash(abababab"));
    }

    #[test]
    fn test_block_hash_serializes_as_hex() {
        let hash = BlockHash::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: BlockHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_address_names_its_key() {
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let address = WalletAddress::from_public_key(&keypair.public_key());
        assert_eq!(address.public_key(), Some(keypair.public_key()));
        assert_eq!(address.as_str().len(), 64);
    }

    #[test]
    fn test_non_lowercase_address_names_no_key() {
        let address = Keypair::from_seed(&[0x08; 32]).address();
        let upper = WalletAddress::new(address.as_str().to_uppercase());
        assert_ne!(upper, address);
        assert_eq!(upper.public_key(), None);

        let mixed: String = address
            .as_str()
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c })
            .collect();
        assert_ne!(mixed, address.as_str());
        assert_eq!(WalletAddress::new(mixed).public_key(), None);
    }

    #[test]
    fn test_garbage_address_names_no_key() {
        assert_eq!(WalletAddress::new("not-a-key").public_key(), None);
        assert_eq!(WalletAddress::new("ab").public_key(), None);
    }
}
