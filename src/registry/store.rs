//! Per-election voter and candidate store.
//!
//! Both maps sit behind `parking_lot::RwLock`s: lookups from concurrent vote
//! submissions share the read side, registrations and the voted flag take the
//! write side for the duration of a single map operation.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;
use crate::crypto::{generate_keypair, PrivateSecret};
use crate::registry::types::{Candidate, CandidateId, Voter, VoterId};
use crate::utils::{ElectionError, Result};

#[derive(Debug, Default)]
pub struct Registry {
    voters: RwLock<BTreeMap<VoterId, Voter>>,
    candidates: RwLock<BTreeMap<CandidateId, Candidate>>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ElectionError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a voter and issue a fresh key pair. The private half is
    /// returned here and nowhere else.
    pub fn register_voter(&self, voter_id: &str, name: &str, email: &str) -> Result<PrivateSecret> {
        require("voter_id", voter_id)?;
        require("name", name)?;
        require("email", email)?;

        let mut voters = self.voters.write();
        if voters.contains_key(voter_id) {
            return Err(ElectionError::AlreadyExists(format!("voter {voter_id}")));
        }
        let (public_id, secret) = generate_keypair();
        voters.insert(
            voter_id.to_string(),
            Voter {
                voter_id: voter_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                public_id,
                has_voted: false,
                registered_at: Utc::now(),
            },
        );
        info!(voter = voter_id, "voter registered");
        Ok(secret)
    }

    /// Lifecycle gating is the caller's job; see `Election::register_candidate`.
    pub fn register_candidate(&self, candidate_id: &str, name: &str, party: &str, description: &str) -> Result<()> {
        require("candidate_id", candidate_id)?;
        require("name", name)?;
        require("party", party)?;

        let mut candidates = self.candidates.write();
        if candidates.contains_key(candidate_id) {
            return Err(ElectionError::AlreadyExists(format!("candidate {candidate_id}")));
        }
        candidates.insert(
            candidate_id.to_string(),
            Candidate {
                candidate_id: candidate_id.to_string(),
                name: name.to_string(),
                party: party.to_string(),
                description: description.to_string(),
            },
        );
        info!(candidate = candidate_id, party, "candidate registered");
        Ok(())
    }

    pub fn lookup_voter(&self, voter_id: &str) -> Result<Voter> {
        self.voters
            .read()
            .get(voter_id)
            .cloned()
            .ok_or_else(|| ElectionError::NotFound(format!("voter {voter_id}")))
    }

    pub fn lookup_candidate(&self, candidate_id: &str) -> Result<Candidate> {
        self.candidates
            .read()
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| ElectionError::NotFound(format!("candidate {candidate_id}")))
    }

    /// Set the voted flag; fails if it is already set.
    pub fn mark_voted(&self, voter_id: &str) -> Result<()> {
        let mut voters = self.voters.write();
        let voter = voters
            .get_mut(voter_id)
            .ok_or_else(|| ElectionError::NotFound(format!("voter {voter_id}")))?;
        if voter.has_voted {
            return Err(ElectionError::AlreadyVoted(voter_id.to_string()));
        }
        voter.has_voted = true;
        Ok(())
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.candidates.read().values().cloned().collect()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.read().len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.read().len()
    }

    pub fn voted_count(&self) -> usize {
        self.voters.read().values().filter(|v| v.has_voted).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign, verify, vote_payload};

    #[test]
    fn register_and_lookup_voter() {
        let reg = Registry::new();
        let secret = reg.register_voter("V1", "Alice", "alice@example.org").unwrap();
        let voter = reg.lookup_voter("V1").unwrap();
        assert!(!voter.has_voted);
        assert_eq!(voter.public_id, secret.public_id());

        let msg = vote_payload("V1", "C1");
        assert!(verify(&voter.public_id, &msg, &sign(&secret, &msg)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let reg = Registry::new();
        reg.register_voter("V1", "Alice", "a@x").unwrap();
        assert!(matches!(reg.register_voter("V1", "Bob", "b@x"), Err(ElectionError::AlreadyExists(_))));
        reg.register_candidate("C1", "Carol", "Blue", "").unwrap();
        assert!(matches!(
            reg.register_candidate("C1", "Dan", "Red", ""),
            Err(ElectionError::AlreadyExists(_))
        ));
        assert_eq!(reg.voter_count(), 1);
        assert_eq!(reg.candidate_count(), 1);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let reg = Registry::new();
        assert!(matches!(reg.lookup_voter("nope"), Err(ElectionError::NotFound(_))));
        assert!(matches!(reg.lookup_candidate("nope"), Err(ElectionError::NotFound(_))));
        assert!(matches!(reg.mark_voted("nope"), Err(ElectionError::NotFound(_))));
    }

    #[test]
    fn mark_voted_is_single_shot() {
        let reg = Registry::new();
        reg.register_voter("V1", "Alice", "a@x").unwrap();
        reg.mark_voted("V1").unwrap();
        assert_eq!(reg.mark_voted("V1"), Err(ElectionError::AlreadyVoted("V1".into())));
        assert_eq!(reg.voted_count(), 1);
    }

    #[test]
    fn blank_fields_rejected() {
        let reg = Registry::new();
        assert!(matches!(reg.register_voter(" ", "A", "a@x"), Err(ElectionError::InvalidInput(_))));
        assert!(matches!(reg.register_candidate("C1", "A", "", ""), Err(ElectionError::InvalidInput(_))));
    }
}
