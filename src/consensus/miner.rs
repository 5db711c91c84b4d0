use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use tracing::info;
use crate::consensus::pow::search_nonce;
use crate::crypto::Hash;
use crate::ledger::{Block, Ledger, TxStatus};
use crate::txpool::VotePool;
use crate::utils::metrics::{BLOCKS_MINED, METRICS, MINING_LAST_ATTEMPTS};
use crate::utils::{ElectionError, Result};

/// Summary of a freshly appended block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinedBlock {
    pub block_index: u64,
    pub block_hash: Hash,
    pub block_nonce: u64,
    pub transaction_count: usize,
    pub attempts: u64,
}

/// Seal every currently pending vote into one block.
///
/// Callers must serialize calls per election; the pool is only locked for the
/// initial snapshot and the final seal, not during the nonce search.
pub fn mine_pending(pool: &VotePool, ledger: &Ledger) -> Result<MinedBlock> {
    let mut transactions = pool.snapshot();
    if transactions.is_empty() {
        return Err(ElectionError::EmptyPool);
    }
    for tx in &mut transactions {
        tx.status = TxStatus::Confirmed;
    }
    let count = transactions.len();

    let (tail_index, tail_hash) = ledger.tail();
    let mut block = Block::candidate(tail_index + 1, tail_hash, Utc::now().timestamp_millis(), transactions);

    let started = Instant::now();
    let (nonce, hash, attempts) = search_nonce(&block.header_prefix(), ledger.difficulty());
    block.nonce = nonce;
    block.hash = hash;

    let mined = MinedBlock {
        block_index: block.index,
        block_hash: hash,
        block_nonce: nonce,
        transaction_count: count,
        attempts,
    };
    pool.seal_front(count, || ledger.append(block))?;

    METRICS.inc_counter(BLOCKS_MINED);
    METRICS.set_gauge(MINING_LAST_ATTEMPTS, attempts as f64);
    info!(
        block = mined.block_index,
        nonce,
        attempts,
        txs = count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "mined block"
    );
    Ok(mined)
}
