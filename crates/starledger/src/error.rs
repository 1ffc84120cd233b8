//! Error types for the Ledger.

use starledger_core::{ChainDefect, CoreError, VerificationError};
use thiserror::Error;

/// Errors that can occur when submitting a star.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The ownership proof was rejected; nothing was appended.
    #[error("ownership verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// The existing chain failed validation, so the append was refused.
    #[error("chain is corrupt ({} defects), refusing to append", .0.len())]
    ChainCorrupt(Vec<ChainDefect>),

    /// The star could not be serialized into a payload.
    #[error("payload error: {0}")]
    Payload(#[from] CoreError),
}

impl SubmitError {
    /// The chain defects behind a refusal, if any.
    pub fn defects(&self) -> &[ChainDefect] {
        match self {
            SubmitError::ChainCorrupt(defects) => defects,
            _ => &[],
        }
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, SubmitError>;
