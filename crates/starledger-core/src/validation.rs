//! Chain validation: hash self-consistency, previous-hash linkage, and
//! stored heights.

use crate::chain::Chain;
use crate::error::ChainDefect;

/// Validate every block of a chain.
///
/// For each block above genesis this checks:
/// - the stored hash matches the recomputed digest (`CorruptBlock`)
/// - the previous hash equals the predecessor's stored hash (`BrokenLink`)
/// - the stored height equals the block's position (`HeightMismatch`)
///
/// Genesis has no predecessor and is exempt from all three checks. Defects are
/// accumulated in ascending height order; an empty result means the chain
/// is valid. Heights in the report are positions in the chain.
pub fn validate_chain(chain: &Chain) -> Vec<ChainDefect> {
    let mut defects = Vec::new();

    for (position, pair) in chain.blocks().windows(2).enumerate() {
        let (predecessor, block) = (&pair[0], &pair[1]);
        let height = position as u64 + 1;

        if !block.verify_self() {
            defects.push(ChainDefect::CorruptBlock {
                height,
                hash: block.hash,
            });
        }

        if block.previous_block_hash != Some(predecessor.hash) {
            defects.push(ChainDefect::BrokenLink {
                height,
                hash: block.hash,
            });
        }

        if block.height != height {
            defects.push(ChainDefect::HeightMismatch {
                height,
                hash: block.hash,
                stored: block.height,
            });
        }
    }

    defects
}

/// Check a chain without collecting the defect list.
pub fn is_valid_chain(chain: &Chain) -> bool {
    validate_chain(chain).is_empty()
}
