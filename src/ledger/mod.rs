pub mod block;
pub mod index;
pub mod verifier;

pub use block::{receipt_hash, Block, Transaction, TxStatus};
pub use index::ReceiptIndex;
pub use verifier::{verify_blocks, ChainReport};

use parking_lot::RwLock;
use tracing::{error, info};
use crate::consensus::pow::meets_difficulty;
use crate::crypto::Hash;
use crate::utils::{ElectionError, Result};

struct Chain {
    blocks: Vec<Block>,
    receipts: ReceiptIndex,
}

/// Append-only, hash-linked sequence of blocks starting at genesis.
pub struct Ledger {
    chain: RwLock<Chain>,
    difficulty: u32,
}

impl Ledger {
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: RwLock::new(Chain { blocks: vec![Block::genesis()], receipts: ReceiptIndex::new() }),
            difficulty,
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// (index, hash) of the last block.
    pub fn tail(&self) -> (u64, Hash) {
        let chain = self.chain.read();
        let last = chain.blocks.last().unwrap_or_else(|| unreachable!("ledger always holds genesis"));
        (last.index, last.hash)
    }

    /// Append a sealed block. Anything that does not extend the current tail
    /// with a correctly hashed, sufficiently worked block is a `ChainViolation`.
    pub(crate) fn append(&self, block: Block) -> Result<()> {
        let mut chain = self.chain.write();
        let (tail_index, tail_hash) = chain
            .blocks
            .last()
            .map(|b| (b.index, b.hash))
            .unwrap_or_else(|| unreachable!("ledger always holds genesis"));

        let violation = if block.index != tail_index + 1 {
            Some(format!("block index {} does not follow tail {}", block.index, tail_index))
        } else if block.previous_hash != tail_hash {
            Some(format!("block {} previous hash does not match tail", block.index))
        } else if block.hash != block.calculate_hash() || !meets_difficulty(&block.hash, self.difficulty) {
            Some(format!("block {} is not correctly sealed", block.index))
        } else {
            None
        };
        if let Some(msg) = violation {
            error!(block = block.index, "{msg}");
            return Err(ElectionError::ChainViolation(msg));
        }

        for tx in &block.transactions {
            chain.receipts.add(tx.hash, block.index);
        }
        info!(block = block.index, hash = %block.hash, txs = block.transactions.len(), "block appended");
        chain.blocks.push(block);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chain.read().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.read().blocks.is_empty()
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.chain.read().blocks.clone()
    }

    pub fn confirmed_count(&self) -> usize {
        self.chain.read().receipts.len()
    }

    pub fn block_of_receipt(&self, receipt: &Hash) -> Option<u64> {
        self.chain.read().receipts.block_of(receipt)
    }

    /// Visit every confirmed transaction in chain order.
    pub fn for_each_confirmed(&self, f: impl FnMut(&Transaction)) {
        let chain = self.chain.read();
        chain.blocks.iter().flat_map(|b| b.transactions.iter()).for_each(f);
    }

    pub fn verify_chain(&self) -> ChainReport {
        let chain = self.chain.read();
        verify_blocks(&chain.blocks, self.difficulty)
    }

    #[cfg(test)]
    pub(crate) fn tamper(&self, f: impl FnOnce(&mut Vec<Block>)) {
        f(&mut self.chain.write().blocks)
    }
}
