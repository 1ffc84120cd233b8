//! Canonical CBOR encoding of the hashed block fields.
//!
//! This module implements RFC 8949 Core Deterministic Encoding for the one
//! structure that gets hashed:
//! - Map keys are small integers, written in ascending encoded order
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (time is i64 Unix seconds)
//!
//! **CRITICAL**: changing this encoding changes every block hash, so every
//! existing chain would fail validation.

use crate::crypto::domain_digest;
use crate::types::BlockHash;

/// Domain separation prefix for block hashes.
pub const BLOCK_HASH_DOMAIN: &[u8] = b"starledger/block-hash/v1";

/// Block field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes, so numeric order is encoded order.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIME: u64 = 1;
    pub const PAYLOAD: u64 = 2;
    pub const PREVIOUS_BLOCK_HASH: u64 = 3;
}

const FIELD_COUNT: u64 = 4;

/// Encode the hashed block fields to canonical CBOR bytes.
///
/// Layout: `{0: height, 1: time, 2: payload, 3: previous_block_hash | null}`.
pub fn canonical_block_bytes(
    height: u64,
    time: i64,
    payload: &[u8],
    previous_block_hash: Option<&BlockHash>,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 64);

    encode_uint(&mut buf, 5, FIELD_COUNT);

    encode_uint(&mut buf, 0, keys::HEIGHT);
    encode_uint(&mut buf, 0, height);

    encode_uint(&mut buf, 0, keys::TIME);
    encode_int(&mut buf, time);

    encode_uint(&mut buf, 0, keys::PAYLOAD);
    encode_bytes(&mut buf, payload);

    encode_uint(&mut buf, 0, keys::PREVIOUS_BLOCK_HASH);
    match previous_block_hash {
        Some(hash) => encode_bytes(&mut buf, hash.as_bytes()),
        None => buf.push(0xf6),
    }

    buf
}

/// Compute the hash of a block from its hashed fields.
pub fn block_digest(
    height: u64,
    time: i64,
    payload: &[u8],
    previous_block_hash: Option<&BlockHash>,
) -> BlockHash {
    let bytes = canonical_block_bytes(height, time, payload, previous_block_hash);
    BlockHash(domain_digest(BLOCK_HASH_DOMAIN, &bytes))
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, !(n as u64));
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}
