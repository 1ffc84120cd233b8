//! # Star Ledger
//!
//! A single-node registry of stars, recorded on an append-only,
//! hash-linked chain. Every star is bound to a wallet that proved control
//! of its key by signing a short-lived challenge.
//!
//! ## Overview
//!
//! - **Challenges**: `"<address>:<unix seconds>:starRegistry"`, valid for
//!   five minutes by default
//! - **Submission**: a signed challenge plus the star; accepted stars are
//!   sealed into a new block on top of the tip
//! - **Queries**: blocks by hash or height, stars by wallet
//! - **Validation**: every block is checked for a matching hash and an
//!   intact link to its predecessor
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use starledger::core::Keypair;
//! use starledger::{Ledger, LedgerConfig};
//!
//! let ledger = Ledger::new(LedgerConfig::default());
//! let wallet = Keypair::generate();
//!
//! let message = ledger.request_message_ownership_verification(&wallet.address());
//! let signature = wallet.sign(message.as_bytes()).to_hex();
//!
//! let block = ledger
//!     .submit_star(&wallet.address(), &message, &signature, json!({"name": "Vega"}))
//!     .unwrap();
//! assert_eq!(block.height, 1);
//! assert_eq!(ledger.get_stars_by_wallet_address(&wallet.address()).stars.len(), 1);
//! ```
//!
//! ## Re-exports
//!
//! - `starledger::core` - Core primitives (Block, Chain, validation, crypto)

pub mod error;
pub mod ledger;

pub use starledger_core as core;

pub use error::{Result, SubmitError};
pub use ledger::{Ledger, LedgerConfig};

pub use starledger_core::{
    Block, BlockHash, Chain, ChainDefect, StarListing, StarRecord, UndecodableBlock,
    VerificationError, WalletAddress,
};
