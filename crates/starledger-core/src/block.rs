//! Block: one immutable, hash-linked record in the chain.
//!
//! A block is sealed exactly once, when it is appended. There is no update
//! path; a changed block is a corrupt block.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::block_digest;
use crate::error::CoreError;
use crate::types::{BlockHash, WalletAddress};

/// The data carried by the genesis block.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// The stored payload document of every genesis block.
pub const GENESIS_PAYLOAD: &[u8] = br#"{"data":"Genesis Block"}"#;

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain; genesis is 0.
    pub height: u64,

    /// Creation time (Unix seconds), assigned at append.
    pub time: i64,

    /// The serialized payload document. This exact byte string is hashed.
    #[serde(with = "hex_bytes")]
    pub payload: Bytes,

    /// Hash of the predecessor (None only for genesis).
    pub previous_block_hash: Option<BlockHash>,

    /// Digest of the four fields above.
    pub hash: BlockHash,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn seal(
        height: u64,
        time: i64,
        previous_block_hash: Option<BlockHash>,
        payload: Bytes,
    ) -> Self {
        let hash = block_digest(height, time, &payload, previous_block_hash.as_ref());
        Self {
            height,
            time,
            payload,
            previous_block_hash,
            hash,
        }
    }

    /// Recompute the digest from the stored fields, ignoring the stored hash.
    pub fn compute_hash(&self) -> BlockHash {
        block_digest(
            self.height,
            self.time,
            &self.payload,
            self.previous_block_hash.as_ref(),
        )
    }

    /// Does the stored hash match the stored contents?
    pub fn verify_self(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Decode the logical payload.
    pub fn decode_payload(&self) -> Result<BlockPayload, CoreError> {
        BlockPayload::decode(&self.payload)
    }

    /// Check if this is the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}

/// A star registered by a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub owner: WalletAddress,
    pub star: Value,
}

/// The logical content of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    /// The fixed genesis marker.
    Genesis,
    /// A star owned by a wallet.
    Star(StarRecord),
}

/// On-chain payload document.
///
/// Fields are declared in sorted order and `serde_json` keeps object keys
/// sorted, so equal payloads always serialize to equal bytes.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PayloadDocument {
    data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<WalletAddress>,
}

impl BlockPayload {
    /// Create a star payload.
    pub fn star(owner: WalletAddress, star: Value) -> Self {
        Self::Star(StarRecord { owner, star })
    }

    /// The owning wallet, if this is a star.
    pub fn owner(&self) -> Option<&WalletAddress> {
        match self {
            BlockPayload::Genesis => None,
            BlockPayload::Star(record) => Some(&record.owner),
        }
    }

    /// Serialize to the stored document form.
    pub fn encode(&self) -> Result<Bytes, CoreError> {
        let document = match self {
            BlockPayload::Genesis => return Ok(Bytes::from_static(GENESIS_PAYLOAD)),
            BlockPayload::Star(record) => PayloadDocument {
                data: record.star.clone(),
                owner: Some(record.owner.clone()),
            },
        };
        serde_json::to_vec(&document)
            .map(Bytes::from)
            .map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Parse the stored document form.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let document: PayloadDocument =
            serde_json::from_slice(bytes).map_err(|e| CoreError::Decode(e.to_string()))?;

        match document.owner {
            Some(owner) => Ok(Self::star(owner, document.data)),
            None if document.data.as_str() == Some(GENESIS_MARKER) => Ok(Self::Genesis),
            None => Err(CoreError::Decode("payload has no owner".into())),
        }
    }
}

/// A block that has not been placed in a chain yet.
///
/// The chain assigns height and previous hash when it seals the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCandidate {
    pub time: i64,
    pub payload: Bytes,
}

impl BlockCandidate {
    /// The genesis candidate.
    pub fn genesis(time: i64) -> Self {
        Self {
            time,
            payload: Bytes::from_static(GENESIS_PAYLOAD),
        }
    }

    /// A star candidate.
    pub fn star(owner: WalletAddress, star: Value, time: i64) -> Result<Self, CoreError> {
        Ok(Self {
            time,
            payload: BlockPayload::star(owner, star).encode()?,
        })
    }
}

/// Serde adapter rendering payload bytes as lowercase hex.
mod hex_bytes {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map(Bytes::from).map_err(serde::de::Error::custom)
    }
}
