//! Election module
//!
//! Public surface:
//! - lifecycle: created / active / ended state machine
//! - election: one election aggregate (registry, pool, ledger, mining gate)
//! - manager: the set of elections and the current selection
//! - sample: canned demo elections

pub mod election;
pub mod lifecycle;
pub mod manager;
pub mod sample;

pub use election::{
    CandidateTally, Election, ElectionId, ElectionResults, ElectionStats, ElectionSummary, LedgerView,
    ReceiptState, ReceiptStatus,
};
pub use lifecycle::ElectionState;
pub use manager::ElectionManager;
pub use sample::{SampleElection, VoterCredential};
