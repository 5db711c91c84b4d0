//! Proof-of-work target and nonce search.
//!
//! The target is a count of leading `0` hex digits in the block hash; each
//! extra digit multiplies the expected number of attempts by 16.

use crate::crypto::Hash;
use crate::ledger::Block;

/// Upper bound accepted for an election's difficulty (64 hex digits in a SHA-256 hash).
pub const MAX_DIFFICULTY: u32 = 64;

pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    hash.leading_zero_nibbles() >= difficulty
}

/// Try nonces from 0 upward until the hash meets `difficulty`.
/// Returns `(nonce, hash, attempts)`. Unbounded; callers pick sane difficulties.
pub fn search_nonce(prefix: &[u8], difficulty: u32) -> (u64, Hash, u64) {
    let mut nonce = 0u64;
    loop {
        let h = Block::hash_with_nonce(prefix, nonce);
        if meets_difficulty(&h, difficulty) {
            return (nonce, h, nonce + 1);
        }
        nonce = nonce.wrapping_add(1);
    }
}
