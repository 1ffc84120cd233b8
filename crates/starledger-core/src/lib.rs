//! # Star Ledger Core
//!
//! Pure primitives for the star ledger: blocks, chains, validation, and
//! ownership proofs.
//!
//! This crate contains no I/O, no locking, no logging. It is pure
//! computation over hash-linked data structures; sequencing appends is the
//! job of the `starledger` façade.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-linked record
//! - [`BlockHash`] - Content digest of a block (Blake3)
//! - [`Chain`] - The ordered, append-only sequence of blocks
//! - [`OwnershipVerifier`] - Issues and checks signed wallet challenges
//! - [`WalletAddress`] - Hex-encoded Ed25519 public key
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod ownership;
pub mod types;
pub mod validation;

pub use block::{
    Block, BlockCandidate, BlockPayload, StarRecord, GENESIS_MARKER, GENESIS_PAYLOAD,
};
pub use canonical::{block_digest, canonical_block_bytes};
pub use chain::{Chain, StarListing, UndecodableBlock};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{ChainDefect, CoreError, VerificationError};
pub use ownership::{
    challenge_issued_at, challenge_message, unix_now, OwnershipVerifier,
    DEFAULT_CHALLENGE_WINDOW_SECS,
};
pub use types::{BlockHash, WalletAddress};
pub use validation::{is_valid_chain, validate_chain};
