//! Error types for the star ledger core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors that can occur while encoding or decoding block payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decode(String),
}

/// Rejection of an ownership proof.
///
/// All variants are recoverable: the caller requests a fresh challenge,
/// signs it, and retries. No state is touched on any of these paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed challenge message: {0}")]
    MalformedMessage(String),

    #[error("challenge expired: issued {elapsed}s ago, window is {window}s")]
    ChallengeExpired { elapsed: i64, window: u64 },

    #[error("invalid signature")]
    InvalidSignature,
}

/// A structural defect found by chain validation.
///
/// Defects are reported, never raised: validation always walks the whole
/// chain and returns every defect it finds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainDefect {
    /// The stored hash does not match the digest of the stored fields.
    #[error("corrupt block at height {height}: stored hash {hash} does not match contents")]
    CorruptBlock { height: u64, hash: BlockHash },

    /// The previous-hash field does not point at the predecessor's hash.
    #[error("broken link at height {height}: block {hash} does not reference its predecessor")]
    BrokenLink { height: u64, hash: BlockHash },

    /// The block's own height field disagrees with its position.
    #[error("misplaced block at height {height}: block {hash} claims height {stored}")]
    HeightMismatch {
        height: u64,
        hash: BlockHash,
        stored: u64,
    },
}

impl ChainDefect {
    /// Height of the defective block.
    pub fn height(&self) -> u64 {
        match self {
            ChainDefect::CorruptBlock { height, .. }
            | ChainDefect::BrokenLink { height, .. }
            | ChainDefect::HeightMismatch { height, .. } => *height,
        }
    }

    /// Stored hash of the defective block.
    pub fn hash(&self) -> &BlockHash {
        match self {
            ChainDefect::CorruptBlock { hash, .. }
            | ChainDefect::BrokenLink { hash, .. }
            | ChainDefect::HeightMismatch { hash, .. } => hash,
        }
    }
}
