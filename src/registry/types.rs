use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::crypto::PublicId;

pub type VoterId = String;
pub type CandidateId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voter {
    pub voter_id: VoterId,
    pub name: String,
    pub email: String,
    /// derived from the key pair issued at registration
    pub public_id: PublicId,
    pub has_voted: bool,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub candidate_id: CandidateId,
    pub name: String,
    pub party: String,
    #[serde(default)]
    pub description: String,
}
