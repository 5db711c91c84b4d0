//! Vote transactions and the blocks that seal them.
//!
//! Block hash = SHA-256(index || previous_hash || timestamp || tx digests || nonce).
//! Every tx digest is recomputed from the transaction's fields, so mutating a
//! stored vote changes the block hash even when the stored `hash` is left alone.

use serde::{Deserialize, Serialize};
use crate::crypto::{hash, hash_parts, Hash, Proof};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
}

/// A cast vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub voter_id: String,
    pub candidate_id: String,
    /// unix millis at submission
    pub timestamp: i64,
    pub proof: Proof,
    /// receipt hash returned to the voter
    pub hash: Hash,
    pub status: TxStatus,
}

impl Transaction {
    pub fn new_pending(transaction_id: String, voter_id: &str, candidate_id: &str, timestamp: i64, proof: Proof) -> Self {
        let hash = receipt_hash(voter_id, candidate_id, timestamp);
        Self {
            transaction_id,
            voter_id: voter_id.to_string(),
            candidate_id: candidate_id.to_string(),
            timestamp,
            proof,
            hash,
            status: TxStatus::Pending,
        }
    }

    /// Digest over every field that goes into a block (status excluded).
    pub fn content_digest(&self) -> Hash {
        let ts = self.timestamp.to_be_bytes();
        let parts: [&[u8]; 8] = [
            &(self.transaction_id.len() as u32).to_be_bytes(),
            self.transaction_id.as_bytes(),
            &(self.voter_id.len() as u32).to_be_bytes(),
            self.voter_id.as_bytes(),
            &(self.candidate_id.len() as u32).to_be_bytes(),
            self.candidate_id.as_bytes(),
            &ts,
            &self.proof.0,
        ];
        hash_parts(parts)
    }

    pub fn receipt_is_consistent(&self) -> bool {
        self.hash == receipt_hash(&self.voter_id, &self.candidate_id, self.timestamp)
    }
}

/// Receipt hash: SHA-256 of the sorted-key JSON object
/// `{"candidate_id":..,"timestamp":..,"voter_id":..}`, recomputable by the voter.
pub fn receipt_hash(voter_id: &str, candidate_id: &str, timestamp: i64) -> Hash {
    let body = serde_json::json!({
        "candidate_id": candidate_id,
        "timestamp": timestamp,
        "voter_id": voter_id,
    });
    hash(body.to_string().as_bytes())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// unix millis
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: Hash,
    pub nonce: u64,
    pub hash: Hash,
}

impl Block {
    /// Index 0, no transactions, zero previous hash, nonce 0, epoch timestamp.
    pub fn genesis() -> Self {
        let mut b = Block {
            index: 0,
            timestamp: 0,
            transactions: vec![],
            previous_hash: Hash::ZERO,
            nonce: 0,
            hash: Hash::ZERO,
        };
        b.hash = b.calculate_hash();
        b
    }

    /// Unsealed block; `hash` stays zero until mined.
    pub fn candidate(index: u64, previous_hash: Hash, timestamp: i64, transactions: Vec<Transaction>) -> Self {
        Block { index, timestamp, transactions, previous_hash, nonce: 0, hash: Hash::ZERO }
    }

    /// Bytes hashed ahead of the nonce; constant for the whole nonce search.
    pub fn header_prefix(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 32 + 8 + 8 + 32 * self.transactions.len());
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.previous_hash.0);
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&(self.transactions.len() as u64).to_be_bytes());
        for tx in &self.transactions {
            out.extend_from_slice(&tx.content_digest().0);
        }
        out
    }

    pub fn hash_with_nonce(prefix: &[u8], nonce: u64) -> Hash {
        hash_parts([prefix, nonce.to_be_bytes().as_slice()])
    }

    pub fn calculate_hash(&self) -> Hash {
        Self::hash_with_nonce(&self.header_prefix(), self.nonce)
    }
}
