//! The Ledger: the star registry's public API.
//!
//! The Ledger owns one chain and sequences every write to it. Readers take
//! a shared lock and see a consistent prefix; a submission holds the
//! exclusive lock from validation through append, so two concurrent stars
//! can never be sealed on the same tip.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use starledger_core::{
    unix_now, validate_chain, Block, BlockCandidate, BlockHash, Chain, ChainDefect,
    OwnershipVerifier, StarListing, WalletAddress, DEFAULT_CHALLENGE_WINDOW_SECS,
};
use tracing::{debug, info, warn};

use crate::error::{Result, SubmitError};

/// Configuration for the Ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Seconds a signed challenge stays acceptable after it was issued.
    pub challenge_window_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
        }
    }
}

impl LedgerConfig {
    /// Set the challenge freshness window.
    pub fn with_challenge_window(mut self, secs: u64) -> Self {
        self.challenge_window_secs = secs;
        self
    }
}

/// The main Ledger struct.
///
/// Provides:
/// - Ownership challenges for wallets
/// - Star submission with signature checks
/// - Block lookup by hash and height
/// - Star listing by wallet
/// - Whole-chain validation
///
/// A `Ledger` is `Sync`; share it behind an `Arc` to use it from several
/// threads.
#[derive(Debug)]
pub struct Ledger {
    /// The chain, guarded for single-writer sequencing.
    chain: RwLock<Chain>,
    /// Challenge issuer and checker.
    verifier: OwnershipVerifier,
    /// Configuration.
    config: LedgerConfig,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    /// Create a ledger holding only a fresh genesis block.
    pub fn new(config: LedgerConfig) -> Self {
        Self::from_chain(Chain::new(), config)
    }

    /// Wrap an existing chain.
    ///
    /// If the chain is empty a genesis block is appended. A non-empty chain
    /// is taken as given, defects included; they surface on the next
    /// [`Ledger::validate`] or submission.
    pub fn from_chain(chain: Chain, config: LedgerConfig) -> Self {
        let ledger = Self {
            chain: RwLock::new(chain),
            verifier: OwnershipVerifier::new(config.challenge_window_secs),
            config,
        };
        ledger.ensure_genesis();
        ledger
    }

    fn ensure_genesis(&self) {
        let mut chain = self.write_chain();
        if !chain.is_empty() {
            return;
        }

        let block = self.append_locked(&mut chain, BlockCandidate::genesis(unix_now()));
        info!(hash = %block.hash, time = block.time, "created genesis block");
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Height of the last block. Genesis is height 0.
    pub fn height(&self) -> u64 {
        self.read_chain().height().unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ownership
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue the challenge a wallet must sign before submitting a star.
    ///
    /// Challenges are stateless: the message carries its own issue time and
    /// nothing is recorded here.
    pub fn request_message_ownership_verification(&self, address: &WalletAddress) -> String {
        self.verifier.issue_challenge(address)
    }

    /// Register a star for `address`.
    ///
    /// The proof is checked first, without touching the chain. Then, under
    /// the write lock, the whole chain is validated and the star is sealed
    /// on top of the current tip. A corrupt chain is never extended.
    pub fn submit_star(
        &self,
        address: &WalletAddress,
        message: &str,
        signature: &str,
        star: Value,
    ) -> Result<Block> {
        if let Err(e) = self.verifier.verify(message, address, signature) {
            debug!(%address, error = %e, "rejected ownership proof");
            return Err(e.into());
        }

        let mut chain = self.write_chain();

        let defects = validate_chain(&chain);
        if !defects.is_empty() {
            warn!(
                %address,
                defects = defects.len(),
                first_height = defects[0].height(),
                "chain failed validation, refusing append"
            );
            return Err(SubmitError::ChainCorrupt(defects));
        }

        let candidate = BlockCandidate::star(address.clone(), star, unix_now())?;
        let block = self.append_locked(&mut chain, candidate);
        debug!(height = block.height, hash = %block.hash, owner = %address, "appended star");
        Ok(block)
    }

    /// Seal a candidate onto the tip. Caller holds the write lock.
    fn append_locked(&self, chain: &mut Chain, candidate: BlockCandidate) -> Block {
        chain.append(candidate).clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a block by its hex hash. Unparseable input is simply not found.
    pub fn get_block_by_hash(&self, hash: &str) -> Option<Block> {
        let hash = BlockHash::from_hex(hash).ok()?;
        self.read_chain().block_by_hash(&hash).cloned()
    }

    /// Get the block at a height.
    pub fn get_block_by_height(&self, height: u64) -> Option<Block> {
        self.read_chain().block_at(height).cloned()
    }

    /// List the stars owned by a wallet, in chain order.
    ///
    /// Blocks whose payload cannot be decoded are skipped and reported in
    /// the listing rather than failing the query.
    pub fn get_stars_by_wallet_address(&self, address: &WalletAddress) -> StarListing {
        let listing = self.read_chain().stars_owned_by(address);
        for skipped in &listing.undecodable {
            warn!(
                height = skipped.height,
                hash = %skipped.hash,
                reason = %skipped.reason,
                "skipping undecodable block"
            );
        }
        listing
    }

    /// Snapshot of every block in height order.
    pub fn blocks(&self) -> Vec<Block> {
        self.read_chain().blocks().to_vec()
    }

    /// Validate the whole chain. An empty result means the chain is intact.
    pub fn validate(&self) -> Vec<ChainDefect> {
        validate_chain(&self.read_chain())
    }

    // Appends end in a single push, so a poisoned chain is still consistent.
    fn read_chain(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starledger_core::{challenge_message, Keypair, VerificationError};

    fn prove(ledger: &Ledger, keypair: &Keypair) -> (String, String) {
        let message = ledger.request_message_ownership_verification(&keypair.address());
        let signature = keypair.sign(message.as_bytes()).to_hex();
        (message, signature)
    }

    #[test]
    fn test_new_ledger_has_genesis() {
        let ledger = Ledger::default();
        assert_eq!(ledger.height(), 0);

        let genesis = ledger.get_block_by_height(0).unwrap();
        assert!(genesis.is_genesis());
        assert_eq!(genesis.previous_block_hash, None);
        assert!(ledger.validate().is_empty());
    }

    #[test]
    fn test_from_chain_does_not_duplicate_genesis() {
        let first = Ledger::default();
        let chain = Chain::from_blocks(first.blocks());
        let second = Ledger::from_chain(chain, LedgerConfig::default());

        assert_eq!(second.height(), 0);
        assert_eq!(second.blocks(), first.blocks());
    }

    #[test]
    fn test_submit_star_appends_linked_block() {
        let ledger = Ledger::default();
        let keypair = Keypair::generate();
        let (message, signature) = prove(&ledger, &keypair);

        let block = ledger
            .submit_star(&keypair.address(), &message, &signature, json!({"name": "Vega"}))
            .unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(ledger.height(), 1);
        let genesis = ledger.get_block_by_height(0).unwrap();
        assert_eq!(block.previous_block_hash, Some(genesis.hash));
        assert_eq!(ledger.get_block_by_hash(&block.hash.to_hex()), Some(block));
    }

    #[test]
    fn test_bad_signature_leaves_chain_untouched() {
        let ledger = Ledger::default();
        let keypair = Keypair::generate();
        let other = Keypair::generate();
        let (message, _) = prove(&ledger, &keypair);
        let forged = other.sign(message.as_bytes()).to_hex();

        let err = ledger
            .submit_star(&keypair.address(), &message, &forged, json!("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Verification(VerificationError::InvalidSignature)
        ));
        assert_eq!(ledger.height(), 0);
    }

    #[test]
    fn test_expired_challenge_rejected() {
        let ledger = Ledger::new(LedgerConfig::default().with_challenge_window(10));
        let keypair = Keypair::generate();
        let message = challenge_message(&keypair.address(), unix_now() - 60);
        let signature = keypair.sign(message.as_bytes()).to_hex();

        let err = ledger
            .submit_star(&keypair.address(), &message, &signature, json!("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Verification(VerificationError::ChallengeExpired { window: 10, .. })
        ));
        assert_eq!(ledger.height(), 0);
    }

    #[test]
    fn test_corrupt_chain_refuses_append() {
        let ledger = Ledger::default();
        let keypair = Keypair::generate();
        for i in 0..2 {
            let (message, signature) = prove(&ledger, &keypair);
            ledger
                .submit_star(&keypair.address(), &message, &signature, json!(i))
                .unwrap();
        }

        let mut blocks = ledger.blocks();
        blocks[1].time += 1;
        let tampered = Ledger::from_chain(Chain::from_blocks(blocks), LedgerConfig::default());

        let (message, signature) = prove(&tampered, &keypair);
        let err = tampered
            .submit_star(&keypair.address(), &message, &signature, json!("late"))
            .unwrap_err();
        assert_eq!(err.defects().len(), 1);
        assert_eq!(err.defects()[0].height(), 1);
        assert_eq!(tampered.height(), 2);
    }

    #[test]
    fn test_corrupt_chain_is_never_extended() {
        let ledger = Ledger::default();
        let keypair = Keypair::generate();
        let (message, signature) = prove(&ledger, &keypair);
        ledger
            .submit_star(&keypair.address(), &message, &signature, json!(1))
            .unwrap();

        let mut blocks = ledger.blocks();
        blocks[1].time += 1;
        let tampered = Ledger::from_chain(Chain::from_blocks(blocks), LedgerConfig::default());
        let before = tampered.blocks();

        for n in 0..3 {
            let (message, signature) = prove(&tampered, &keypair);
            let err = tampered
                .submit_star(&keypair.address(), &message, &signature, json!(n))
                .unwrap_err();
            assert!(matches!(err, SubmitError::ChainCorrupt(_)));
        }
        assert_eq!(tampered.blocks(), before);
        assert_eq!(tampered.validate().len(), 1);
    }

    #[test]
    fn test_lookup_misses() {
        let ledger = Ledger::default();
        assert!(ledger.get_block_by_height(1).is_none());
        assert!(ledger.get_block_by_hash("not hex").is_none());
        assert!(ledger.get_block_by_hash(&"00".repeat(32)).is_none());
    }

    #[test]
    fn test_config_is_kept() {
        let config = LedgerConfig::default().with_challenge_window(42);
        let ledger = Ledger::new(config);
        assert_eq!(ledger.config(), &config);
        assert_eq!(LedgerConfig::default().challenge_window_secs, 300);
    }
}
