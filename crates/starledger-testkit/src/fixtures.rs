//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use serde_json::{json, Value};
use starledger_core::{challenge_message, Block, BlockCandidate, Chain, Keypair, WalletAddress};

/// A wallet that can answer ownership challenges.
pub struct TestWallet {
    pub keypair: Keypair,
}

impl TestWallet {
    /// Create a new wallet with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The wallet's address.
    pub fn address(&self) -> WalletAddress {
        self.keypair.address()
    }

    /// Sign a challenge message, returning the hex signature.
    pub fn answer(&self, message: &str) -> String {
        self.keypair.sign_challenge(message)
    }

    /// Build and sign a challenge issued at `issued_at`.
    pub fn challenge_at(&self, issued_at: i64) -> (String, String) {
        let message = challenge_message(&self.address(), issued_at);
        let signature = self.answer(&message);
        (message, signature)
    }
}

impl Default for TestWallet {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple wallets with distinct deterministic keys.
pub fn multi_wallet_fixtures(count: usize) -> Vec<TestWallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            seed[31] = 0x5a;
            TestWallet::with_seed(seed)
        })
        .collect()
}

/// A small star document.
pub fn sample_star(n: usize) -> Value {
    json!({
        "dec": format!("{}° 29' 24.9", n % 90),
        "ra": format!("{}h 29m 1.0s", n % 24),
        "story": format!("star number {}", n),
    })
}

/// Build a genesis-rooted chain with one block per `(owner, star)` entry.
///
/// Times start at `start_time` for genesis and increase by one per block.
pub fn build_chain(stars: &[(WalletAddress, Value)], start_time: i64) -> Chain {
    let mut chain = Chain::new();
    chain.append(BlockCandidate::genesis(start_time));
    for (i, (owner, star)) in stars.iter().enumerate() {
        let candidate = BlockCandidate::star(owner.clone(), star.clone(), start_time + 1 + i as i64)
            .unwrap_or_else(|e| panic!("star {} does not encode: {}", i, e));
        chain.append(candidate);
    }
    chain
}

/// Copy a chain, altering the block at `height` in place.
///
/// The stored hash is left alone, so the result is a tampered chain.
pub fn tamper_block(chain: &Chain, height: u64, alter: impl FnOnce(&mut Block)) -> Chain {
    let mut blocks = chain.blocks().to_vec();
    let index = usize::try_from(height).unwrap_or(usize::MAX);
    let block = blocks
        .get_mut(index)
        .unwrap_or_else(|| panic!("no block at height {}", height));
    alter(block);
    Chain::from_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starledger_core::{validate_chain, OwnershipVerifier};

    #[test]
    fn test_wallet_answers_challenge() {
        let wallet = TestWallet::new();
        let (message, signature) = wallet.challenge_at(1_700_000_000);

        assert!(message.starts_with(wallet.address().as_str()));
        assert!(OwnershipVerifier::default()
            .verify_at(&message, &wallet.address(), &signature, 1_700_000_100)
            .is_ok());
    }

    #[test]
    fn test_build_chain_is_valid() {
        let wallets = multi_wallet_fixtures(2);
        let stars: Vec<_> = (0..4)
            .map(|i| (wallets[i % 2].address(), sample_star(i)))
            .collect();
        let chain = build_chain(&stars, 1000);

        assert_eq!(chain.height(), Some(4));
        assert_eq!(chain.block_at(4).map(|b| b.time), Some(1004));
        assert!(validate_chain(&chain).is_empty());
    }

    #[test]
    fn test_tamper_block_breaks_chain() {
        let wallet = TestWallet::new();
        let chain = build_chain(&[(wallet.address(), sample_star(0))], 1000);
        let tampered = tamper_block(&chain, 1, |block| block.time += 1);
        assert_eq!(validate_chain(&tampered).len(), 1);
    }

    #[test]
    fn test_multi_wallet() {
        let wallets = multi_wallet_fixtures(3);

        // Each wallet has unique keys
        let addresses: Vec<_> = wallets.iter().map(|w| w.address()).collect();
        assert_ne!(addresses[0], addresses[1]);
        assert_ne!(addresses[1], addresses[2]);
        assert_ne!(addresses[0], addresses[2]);
    }
}
