pub mod store;
pub mod types;

pub use store::Registry;
pub use types::{Candidate, CandidateId, Voter, VoterId};
