//! Full-chain integrity check.

use serde::Serialize;
use crate::consensus::pow::meets_difficulty;
use crate::crypto::Hash;
use crate::ledger::block::{Block, TxStatus};

/// Outcome of a chain check. `first_invalid` is the lowest offending index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub is_valid: bool,
    pub first_invalid: Option<u64>,
    pub reason: Option<String>,
}

impl ChainReport {
    fn ok() -> Self {
        Self { is_valid: true, first_invalid: None, reason: None }
    }

    fn bad(index: u64, reason: impl Into<String>) -> Self {
        Self { is_valid: false, first_invalid: Some(index), reason: Some(reason.into()) }
    }
}

/// Recompute every block hash, check proof of work and the previous-hash links
/// from genesis onward. Stops at the first mismatch.
pub fn verify_blocks(blocks: &[Block], difficulty: u32) -> ChainReport {
    let Some(genesis) = blocks.first() else {
        return ChainReport::bad(0, "missing genesis block");
    };
    if genesis.index != 0
        || genesis.previous_hash != Hash::ZERO
        || genesis.nonce != 0
        || !genesis.transactions.is_empty()
        || genesis.hash != genesis.calculate_hash()
    {
        return ChainReport::bad(0, "genesis block altered");
    }

    for (i, pair) in blocks.windows(2).enumerate() {
        let (prev, block) = (&pair[0], &pair[1]);
        let expected_index = i as u64 + 1;
        if block.index != expected_index {
            return ChainReport::bad(expected_index, format!("index {} out of sequence", block.index));
        }
        if block.hash != block.calculate_hash() {
            return ChainReport::bad(expected_index, "stored hash does not match block contents");
        }
        if !meets_difficulty(&block.hash, difficulty) {
            return ChainReport::bad(expected_index, "hash does not meet proof-of-work target");
        }
        if block.previous_hash != prev.hash {
            return ChainReport::bad(expected_index, "previous hash does not link to predecessor");
        }
        if let Some(tx) = block
            .transactions
            .iter()
            .find(|tx| tx.status != TxStatus::Confirmed || !tx.receipt_is_consistent())
        {
            return ChainReport::bad(expected_index, format!("transaction {} altered", tx.transaction_id));
        }
    }
    ChainReport::ok()
}
