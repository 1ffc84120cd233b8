//! # Star Ledger Testkit
//!
//! Testing utilities for the star ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Wallets that answer challenges, and chain builders
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starledger_testkit::generators::ChainParams;
//!
//! proptest! {
//!     #[test]
//!     fn fresh_chains_validate(params: ChainParams) {
//!         let chain = params.build();
//!         prop_assert!(starledger_core::validate_chain(&chain).is_empty());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starledger_testkit::fixtures::{build_chain, sample_star, TestWallet};
//!
//! let wallet = TestWallet::new();
//! let chain = build_chain(&[(wallet.address(), sample_star(1))], 1_700_000_000);
//! assert_eq!(chain.height(), Some(1));
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{build_chain, multi_wallet_fixtures, sample_star, tamper_block, TestWallet};
pub use generators::ChainParams;
