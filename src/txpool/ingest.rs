//! Ingest: validates a cast ballot and admits it into the pool.
//!
//! Credential checking is pluggable via the `CredentialCheck` trait. `KeyProofCheck`
//! derives a proof over `(voter_id, candidate_id)` from the presented private
//! key and verifies it against the voter's registered public id.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use crate::crypto::{sign, verify, vote_payload, Hash, PrivateSecret, Proof};
use crate::ledger::Transaction;
use crate::registry::{Registry, Voter};
use crate::txpool::pool::VotePool;
use crate::utils::metrics::{METRICS, VOTES_ACCEPTED, VOTES_REJECTED};
use crate::utils::{ElectionError, Result};

/// What the voter gets back after a successful cast.
#[derive(Debug, Clone, Serialize)]
pub struct VoteReceipt {
    pub transaction_id: String,
    pub transaction_hash: Hash,
    pub timestamp: i64,
    pub pending_count: usize,
}

/// Trait for pluggable ballot authorization
pub trait CredentialCheck: Send + Sync + 'static {
    /// Produce the proof stored with the transaction, or `InvalidCredential`.
    fn authorize(&self, voter: &Voter, candidate_id: &str, credential: &str) -> Result<Proof>;
}

/// Bearer-key check: the presented key must sign for the registered public id.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyProofCheck;

impl CredentialCheck for KeyProofCheck {
    fn authorize(&self, voter: &Voter, candidate_id: &str, credential: &str) -> Result<Proof> {
        let secret = PrivateSecret::from_hex(credential).ok_or(ElectionError::InvalidCredential)?;
        let payload = vote_payload(&voter.voter_id, candidate_id);
        let proof = sign(&secret, &payload);
        if !verify(&voter.public_id, &payload, &proof) {
            return Err(ElectionError::InvalidCredential);
        }
        Ok(proof)
    }
}

/// VoteIngestor: validates and inserts into pool
pub struct VoteIngestor<'a, C: CredentialCheck> {
    pub registry: &'a Registry,
    pub pool: &'a VotePool,
    pub check: &'a C,
}

impl<'a, C: CredentialCheck> VoteIngestor<'a, C> {
    pub fn new(registry: &'a Registry, pool: &'a VotePool, check: &'a C) -> Self {
        Self { registry, pool, check }
    }

    /// Validate and admit one ballot. Lifecycle gating happens in the caller.
    pub fn submit(&self, voter_id: &str, candidate_id: &str, credential: &str) -> Result<VoteReceipt> {
        let res = self.try_submit(voter_id, candidate_id, credential);
        match &res {
            Ok(r) => {
                METRICS.inc_counter(VOTES_ACCEPTED);
                info!(voter = voter_id, tx = %r.transaction_id, pending = r.pending_count, "vote accepted");
            }
            Err(e) => {
                METRICS.inc_counter(VOTES_REJECTED);
                warn!(voter = voter_id, candidate = candidate_id, "vote rejected: {e}");
            }
        }
        res
    }

    fn try_submit(&self, voter_id: &str, candidate_id: &str, credential: &str) -> Result<VoteReceipt> {
        let voter = self.registry.lookup_voter(voter_id)?;
        self.registry.lookup_candidate(candidate_id)?;

        // cheap early exit; the authoritative check runs inside `admit`
        if voter.has_voted || self.pool.has_ballot(voter_id) {
            return Err(ElectionError::AlreadyVoted(voter_id.to_string()));
        }

        let proof = self.check.authorize(&voter, candidate_id, credential)?;

        let timestamp = Utc::now().timestamp_millis();
        let (tx, pending_count) = self.pool.admit(voter_id, self.registry, |seq| {
            Transaction::new_pending(format!("TX-{timestamp}-{seq}"), voter_id, candidate_id, timestamp, proof)
        })?;

        Ok(VoteReceipt {
            transaction_id: tx.transaction_id,
            transaction_hash: tx.hash,
            timestamp: tx.timestamp,
            pending_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::receipt_hash;

    fn setup() -> (Registry, VotePool, PrivateSecret) {
        let reg = Registry::new();
        reg.register_candidate("C1", "Carol", "Blue", "").unwrap();
        let secret = reg.register_voter("V1", "Alice", "a@x").unwrap();
        reg.register_voter("V2", "Bob", "b@x").unwrap();
        (reg, VotePool::new(), secret)
    }

    #[test]
    fn accepted_vote_returns_recomputable_receipt() {
        let (reg, pool, secret) = setup();
        let ing = VoteIngestor::new(&reg, &pool, &KeyProofCheck);
        let r = ing.submit("V1", "C1", &secret.to_hex()).unwrap();
        assert_eq!(r.pending_count, 1);
        assert_eq!(r.transaction_hash, receipt_hash("V1", "C1", r.timestamp));
        assert!(r.transaction_id.starts_with("TX-"));
    }

    #[test]
    fn wrong_key_rejected_without_side_effects() {
        let (reg, pool, _) = setup();
        let (_, stranger) = crate::crypto::generate_keypair();
        let ing = VoteIngestor::new(&reg, &pool, &KeyProofCheck);
        assert_eq!(ing.submit("V1", "C1", &stranger.to_hex()).unwrap_err(), ElectionError::InvalidCredential);
        assert_eq!(ing.submit("V1", "C1", "garbage").unwrap_err(), ElectionError::InvalidCredential);
        assert!(!reg.lookup_voter("V1").unwrap().has_voted);
        assert!(pool.is_empty());
    }

    #[test]
    fn another_voters_key_rejected() {
        let (reg, pool, secret) = setup();
        let ing = VoteIngestor::new(&reg, &pool, &KeyProofCheck);
        assert_eq!(ing.submit("V2", "C1", &secret.to_hex()).unwrap_err(), ElectionError::InvalidCredential);
    }

    #[test]
    fn unknown_ids_not_found() {
        let (reg, pool, secret) = setup();
        let ing = VoteIngestor::new(&reg, &pool, &KeyProofCheck);
        assert!(matches!(ing.submit("V9", "C1", &secret.to_hex()), Err(ElectionError::NotFound(_))));
        assert!(matches!(ing.submit("V1", "C9", &secret.to_hex()), Err(ElectionError::NotFound(_))));
    }

    #[test]
    fn double_vote_rejected() {
        let (reg, pool, secret) = setup();
        let ing = VoteIngestor::new(&reg, &pool, &KeyProofCheck);
        ing.submit("V1", "C1", &secret.to_hex()).unwrap();
        assert_eq!(ing.submit("V1", "C1", &secret.to_hex()).unwrap_err(), ElectionError::AlreadyVoted("V1".into()));
        assert_eq!(pool.len(), 1);
    }
}
