//! One election: its lifecycle, registry, vote pool and ledger.
//!
//! Lock order, outermost first: mining gate, lifecycle, pool, registry / ledger.
//! Every operation below acquires in that order, never the reverse.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::info;
use crate::consensus::{mine_pending, MinedBlock, MAX_DIFFICULTY};
use crate::crypto::{Hash, PrivateSecret};
use crate::election::lifecycle::ElectionState;
use crate::ledger::{Block, ChainReport, Ledger, Transaction};
use crate::registry::{Candidate, Registry, Voter};
use crate::txpool::{KeyProofCheck, VoteIngestor, VotePool, VoteReceipt};
use crate::utils::metrics::{CHAIN_VERIFICATIONS, METRICS};
use crate::utils::{ElectionError, Result};

pub type ElectionId = String;

struct Lifecycle {
    state: ElectionState,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

pub struct Election {
    id: ElectionId,
    name: String,
    difficulty: u32,
    created_at: DateTime<Utc>,
    /// creation order within the manager
    pub(crate) number: u64,
    lifecycle: RwLock<Lifecycle>,
    mining: Mutex<()>,
    registry: Registry,
    pool: VotePool,
    ledger: Ledger,
    credentials: KeyProofCheck,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectionSummary {
    pub id: ElectionId,
    pub name: String,
    pub state: ElectionState,
    pub is_active: bool,
    pub candidates: usize,
    pub voters: usize,
    pub votes: usize,
    pub difficulty: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectionStats {
    pub election_name: String,
    pub state: ElectionState,
    pub is_active: bool,
    pub voter_count: usize,
    pub candidate_count: usize,
    pub votes_cast: usize,
    pub pending_votes: usize,
    pub blockchain_blocks: usize,
    pub blockchain_valid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateTally {
    pub candidate_id: String,
    pub name: String,
    pub party: String,
    pub votes: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectionResults {
    pub election_name: String,
    pub state: ElectionState,
    pub candidates: Vec<CandidateTally>,
    pub total_votes: usize,
    pub total_voters: usize,
    pub turnout: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptState {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptStatus {
    pub transaction_hash: Hash,
    pub status: ReceiptState,
    pub block_index: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerView {
    pub blocks: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub difficulty: u32,
    pub is_valid: bool,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl Election {
    pub fn new(id: ElectionId, number: u64, name: &str, difficulty: u32) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ElectionError::InvalidInput("election name is required".into()));
        }
        if difficulty > MAX_DIFFICULTY {
            return Err(ElectionError::InvalidInput(format!("difficulty must be at most {MAX_DIFFICULTY}")));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            difficulty,
            created_at: Utc::now(),
            number,
            lifecycle: RwLock::new(Lifecycle { state: ElectionState::Created, started_at: None, ended_at: None }),
            mining: Mutex::new(()),
            registry: Registry::new(),
            pool: VotePool::new(),
            ledger: Ledger::new(difficulty),
            credentials: KeyProofCheck,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn state(&self) -> ElectionState {
        self.lifecycle.read().state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.read().started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.read().ended_at
    }

    /// Issue a key pair for a new voter. Closed once the election has ended.
    pub fn register_voter(&self, voter_id: &str, name: &str, email: &str) -> Result<PrivateSecret> {
        let lc = self.lifecycle.read();
        if lc.state == ElectionState::Ended {
            return Err(ElectionError::InvalidState("cannot register voters after the election has ended".into()));
        }
        self.registry.register_voter(voter_id, name, email)
    }

    pub fn register_candidate(&self, candidate_id: &str, name: &str, party: &str, description: &str) -> Result<()> {
        let lc = self.lifecycle.read();
        if lc.state != ElectionState::Created {
            return Err(ElectionError::InvalidState(format!(
                "candidates can only be registered before the election starts (election is {})",
                lc.state
            )));
        }
        self.registry.register_candidate(candidate_id, name, party, description)
    }

    pub fn start(&self) -> Result<()> {
        let mut lc = self.lifecycle.write();
        let next = lc.state.start()?;
        if self.registry.candidate_count() == 0 {
            return Err(ElectionError::InvalidState("cannot start an election with no candidates".into()));
        }
        lc.state = next;
        lc.started_at = Some(Utc::now());
        info!(election = %self.id, "election started");
        Ok(())
    }

    /// Seal any outstanding votes into a final block, then close the election.
    pub fn end(&self) -> Result<Option<MinedBlock>> {
        let _gate = self.mining.lock();
        let mut lc = self.lifecycle.write();
        let next = lc.state.end()?;
        let sealed = if self.pool.is_empty() {
            None
        } else {
            Some(mine_pending(&self.pool, &self.ledger)?)
        };
        lc.state = next;
        lc.ended_at = Some(Utc::now());
        info!(election = %self.id, final_block = ?sealed.as_ref().map(|m| m.block_index), "election ended");
        Ok(sealed)
    }

    pub fn cast_vote(&self, voter_id: &str, candidate_id: &str, private_key: &str) -> Result<VoteReceipt> {
        // held for the whole admission so `end` cannot close the pool under us
        let lc = self.lifecycle.read();
        lc.state.require_active("casting a vote")?;
        VoteIngestor::new(&self.registry, &self.pool, &self.credentials).submit(voter_id, candidate_id, private_key)
    }

    /// Blocking: runs the nonce search on the calling thread.
    pub fn mine(&self) -> Result<MinedBlock> {
        let _gate = self.mining.lock();
        self.lifecycle.read().state.require_active("mining")?;
        mine_pending(&self.pool, &self.ledger)
    }

    pub fn voter_status(&self, voter_id: &str) -> Result<Voter> {
        self.registry.lookup_voter(voter_id)
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.registry.candidates()
    }

    pub fn verify_chain(&self) -> ChainReport {
        METRICS.inc_counter(CHAIN_VERIFICATIONS);
        self.ledger.verify_chain()
    }

    pub fn pending_count(&self) -> usize {
        self.pool.len()
    }

    pub fn block_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.ledger.blocks()
    }

    pub fn ledger_view(&self) -> LedgerView {
        LedgerView {
            blocks: self.ledger.blocks(),
            pending_transactions: self.pool.snapshot(),
            difficulty: self.difficulty,
            is_valid: self.ledger.verify_chain().is_valid,
        }
    }

    pub fn summary(&self) -> ElectionSummary {
        let state = self.state();
        ElectionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            state,
            is_active: state == ElectionState::Active,
            candidates: self.registry.candidate_count(),
            voters: self.registry.voter_count(),
            votes: self.ledger.confirmed_count(),
            difficulty: self.difficulty,
            created_at: self.created_at,
        }
    }

    pub fn stats(&self) -> ElectionStats {
        let state = self.state();
        ElectionStats {
            election_name: self.name.clone(),
            state,
            is_active: state == ElectionState::Active,
            voter_count: self.registry.voter_count(),
            candidate_count: self.registry.candidate_count(),
            votes_cast: self.ledger.confirmed_count(),
            pending_votes: self.pool.len(),
            blockchain_blocks: self.ledger.len(),
            blockchain_valid: self.ledger.verify_chain().is_valid,
        }
    }

    /// Tally of confirmed votes, highest first.
    pub fn results(&self) -> ElectionResults {
        let candidates = self.registry.candidates();
        let mut counts = vec![0usize; candidates.len()];
        self.ledger.for_each_confirmed(|tx| {
            if let Some(i) = candidates.iter().position(|c| c.candidate_id == tx.candidate_id) {
                counts[i] += 1;
            }
        });
        let total_votes: usize = counts.iter().sum();
        let total_voters = self.registry.voter_count();

        let mut tallies: Vec<CandidateTally> = candidates
            .into_iter()
            .zip(counts)
            .map(|(c, votes)| CandidateTally {
                percentage: if total_votes > 0 { round2(votes as f64 * 100.0 / total_votes as f64) } else { 0.0 },
                candidate_id: c.candidate_id,
                name: c.name,
                party: c.party,
                votes,
            })
            .collect();
        tallies.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.candidate_id.cmp(&b.candidate_id)));

        ElectionResults {
            election_name: self.name.clone(),
            state: self.state(),
            candidates: tallies,
            total_votes,
            total_voters,
            turnout: if total_voters > 0 { round2(total_votes as f64 * 100.0 / total_voters as f64) } else { 0.0 },
        }
    }

    pub fn receipt_status(&self, receipt: &Hash) -> Result<ReceiptStatus> {
        if let Some(block_index) = self.ledger.block_of_receipt(receipt) {
            return Ok(ReceiptStatus { transaction_hash: *receipt, status: ReceiptState::Confirmed, block_index: Some(block_index) });
        }
        if self.pool.find_pending(receipt).is_some() {
            return Ok(ReceiptStatus { transaction_hash: *receipt, status: ReceiptState::Pending, block_index: None });
        }
        Err(ElectionError::NotFound(format!("transaction {receipt}")))
    }

    #[cfg(test)]
    pub(crate) fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
