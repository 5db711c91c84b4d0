//! VotePool: FIFO buffer of pending vote transactions for one election.
//!
//! Data model:
//! - `pending`: transactions in submission order, waiting for the next block
//! - `ballots`: every voter id that holds a pending *or* confirmed transaction
//!
//! Notes:
//! - One mutex covers both, so the double-vote check, the registry voted flag
//!   and the pool append happen as a single critical section.
//! - Miners only hold the lock to snapshot and to seal; the nonce search runs
//!   unlocked and new votes keep queueing behind the snapshot.

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use crate::crypto::Hash;
use crate::ledger::Transaction;
use crate::registry::Registry;
use crate::utils::{ElectionError, Result};

#[derive(Default)]
struct PoolInner {
    pending: VecDeque<Transaction>,
    ballots: HashSet<String>,
    next_seq: u64,
}

/// The VotePool main struct
#[derive(Default)]
pub struct VotePool {
    inner: Mutex<PoolInner>,
}

impl VotePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically: reject a voter who already holds a ballot, set the registry
    /// voted flag, and append the transaction built by `build(seq)`.
    /// Returns the stored transaction and the pending count after insertion.
    pub fn admit(
        &self,
        voter_id: &str,
        registry: &Registry,
        build: impl FnOnce(u64) -> Transaction,
    ) -> Result<(Transaction, usize)> {
        let mut inner = self.inner.lock();
        if inner.ballots.contains(voter_id) {
            return Err(ElectionError::AlreadyVoted(voter_id.to_string()));
        }
        registry.mark_voted(voter_id)?;

        inner.next_seq += 1;
        let tx = build(inner.next_seq);
        inner.ballots.insert(voter_id.to_string());
        inner.pending.push_back(tx.clone());
        Ok((tx, inner.pending.len()))
    }

    pub fn has_ballot(&self, voter_id: &str) -> bool {
        self.inner.lock().ballots.contains(voter_id)
    }

    /// Copy of the pending queue, oldest first.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.inner.lock().pending.iter().cloned().collect()
    }

    /// Run `append` with the pool locked and, if it succeeds, drop the oldest
    /// `count` pending transactions. Nothing is removed when `append` fails.
    pub fn seal_front(&self, count: usize, append: impl FnOnce() -> Result<()>) -> Result<()> {
        let mut inner = self.inner.lock();
        if count > inner.pending.len() {
            return Err(ElectionError::ChainViolation(format!(
                "sealing {count} votes but only {} pending",
                inner.pending.len()
            )));
        }
        append()?;
        inner.pending.drain(..count);
        Ok(())
    }

    pub fn find_pending(&self, receipt: &Hash) -> Option<Transaction> {
        self.inner.lock().pending.iter().find(|tx| &tx.hash == receipt).cloned()
    }

    /// Pool size
    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
