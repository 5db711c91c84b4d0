//! Consensus module (single-authority proof of work)
//!
//! Public surface:
//! - pow: difficulty target and nonce search
//! - miner: drains the vote pool into a sealed block and appends it to the ledger

pub mod miner;
pub mod pow;

pub use miner::{mine_pending, MinedBlock};
pub use pow::{meets_difficulty, search_nonce, MAX_DIFFICULTY};
