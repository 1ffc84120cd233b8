//! Chain: the ordered, append-only sequence of blocks.
//!
//! The chain seals and links blocks but does not guard against concurrent
//! appends; whoever owns it must serialize access.

use crate::block::{Block, BlockCandidate, BlockPayload, StarRecord};
use crate::types::{BlockHash, WalletAddress};

/// An in-memory chain. Index `i` holds the block at height `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty chain (no genesis yet).
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Rebuild a chain from already-sealed blocks.
    ///
    /// Nothing is checked here; run [`crate::validate_chain`] to find out
    /// whether the blocks actually form a valid chain.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Height of the last block, or `None` for an empty chain.
    pub fn height(&self) -> Option<u64> {
        (self.blocks.len() as u64).checked_sub(1)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the chain has no blocks (not even genesis).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in height order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The last block.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Seal a candidate on top of the current tip and push it.
    ///
    /// Height is the next position; the previous hash is the tip's hash, or
    /// absent when the chain is empty.
    pub fn append(&mut self, candidate: BlockCandidate) -> &Block {
        let height = self.blocks.len() as u64;
        let previous_block_hash = self.tip().map(|tip| tip.hash);
        let block = Block::seal(height, candidate.time, previous_block_hash, candidate.payload);
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// Get the block at a height.
    pub fn block_at(&self, height: u64) -> Option<&Block> {
        usize::try_from(height)
            .ok()
            .and_then(|index| self.blocks.get(index))
    }

    /// Find a block by its stored hash (linear scan).
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.hash == hash)
    }

    /// Collect the stars owned by `address`, in chain order.
    ///
    /// Genesis is skipped. A block whose payload cannot be decoded is
    /// reported in [`StarListing::undecodable`] instead of aborting the
    /// listing; its owner is unknown, so it is reported for every address.
    pub fn stars_owned_by(&self, address: &WalletAddress) -> StarListing {
        let mut listing = StarListing::default();

        for block in self.blocks.iter().skip(1) {
            match block.decode_payload() {
                Ok(BlockPayload::Star(record)) if &record.owner == address => {
                    listing.stars.push(record);
                }
                Ok(_) => {}
                Err(e) => listing.undecodable.push(UndecodableBlock {
                    height: block.height,
                    hash: block.hash,
                    reason: e.to_string(),
                }),
            }
        }

        listing
    }
}

/// Result of listing a wallet's stars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarListing {
    /// Stars owned by the wallet, in chain order.
    pub stars: Vec<StarRecord>,

    /// Blocks whose payload could not be decoded.
    pub undecodable: Vec<UndecodableBlock>,
}

impl StarListing {
    /// Check if every scanned payload decoded.
    pub fn is_complete(&self) -> bool {
        self.undecodable.is_empty()
    }
}

/// A block skipped by a star listing because its payload is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndecodableBlock {
    pub height: u64,
    pub hash: BlockHash,
    pub reason: String,
}
