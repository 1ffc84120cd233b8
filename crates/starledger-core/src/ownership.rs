//! Ownership proofs: time-boxed, address-bound challenge messages.
//!
//! A challenge is `"{address}:{issued_at}:starRegistry"`. Nothing is stored
//! when one is issued; the issue time travels inside the message and is
//! parsed back out on verification.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::crypto::Ed25519Signature;
use crate::error::VerificationError;
use crate::types::WalletAddress;

/// Trailing tag of every challenge message.
pub const CHALLENGE_TAG: &str = "starRegistry";

/// Default freshness window for a challenge, in seconds.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 300;

/// Build the challenge message for an address at a given time.
pub fn challenge_message(address: &WalletAddress, issued_at: i64) -> String {
    format!("{}:{}:{}", address, issued_at, CHALLENGE_TAG)
}

/// Extract the issue time embedded in a challenge message.
///
/// Only the second colon-delimited field is inspected.
pub fn challenge_issued_at(message: &str) -> Result<i64, VerificationError> {
    let field = message
        .split(':')
        .nth(1)
        .ok_or_else(|| VerificationError::MalformedMessage("missing timestamp field".into()))?;

    field.parse::<i64>().map_err(|_| {
        VerificationError::MalformedMessage(format!("timestamp {:?} is not an integer", field))
    })
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Issues and verifies ownership challenges.
///
/// Holds only the freshness window, so it is `Copy` and freely shared
/// across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipVerifier {
    window_secs: u64,
}

impl Default for OwnershipVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHALLENGE_WINDOW_SECS)
    }
}

impl OwnershipVerifier {
    /// Create a verifier with the given freshness window.
    pub fn new(window_secs: u64) -> Self {
        Self { window_secs }
    }

    /// The freshness window in seconds.
    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Issue a challenge for `address` stamped with the current time.
    pub fn issue_challenge(&self, address: &WalletAddress) -> String {
        self.issue_challenge_at(address, unix_now())
    }

    /// Issue a challenge for `address` stamped with `issued_at`.
    pub fn issue_challenge_at(&self, address: &WalletAddress, issued_at: i64) -> String {
        challenge_message(address, issued_at)
    }

    /// Verify a signed challenge against the current time.
    pub fn verify(
        &self,
        message: &str,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<(), VerificationError> {
        self.verify_at(message, address, signature, unix_now())
    }

    /// Verify a signed challenge as of `now`.
    ///
    /// Checks, in order:
    /// 1. the message carries an integer issue time (`MalformedMessage`)
    /// 2. at most `window_secs` have passed since then (`ChallengeExpired`);
    ///    an issue time in the future is accepted
    /// 3. `signature` is a valid Ed25519 signature over the message bytes
    ///    by the key `address` names (`InvalidSignature`)
    pub fn verify_at(
        &self,
        message: &str,
        address: &WalletAddress,
        signature: &str,
        now: i64,
    ) -> Result<(), VerificationError> {
        let issued_at = challenge_issued_at(message)?;

        let elapsed = now.saturating_sub(issued_at);
        if elapsed > 0 && elapsed as u64 > self.window_secs {
            return Err(VerificationError::ChallengeExpired {
                elapsed,
                window: self.window_secs,
            });
        }

        let public_key = address
            .public_key()
            .ok_or(VerificationError::InvalidSignature)?;
        let signature =
            Ed25519Signature::from_hex(signature).map_err(|_| VerificationError::InvalidSignature)?;

        public_key.verify(message.as_bytes(), &signature)
    }
}
