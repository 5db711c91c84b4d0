//! Election backend: per-election voter and candidate registries, key-checked
//! ballots collected in a pending pool, and a proof-of-work miner sealing them
//! into a hash-chained ledger that anyone can re-verify.

pub mod consensus;
pub mod crypto;
pub mod election;
pub mod ledger;
pub mod node;
pub mod registry;
pub mod rpc;
pub mod txpool;
pub mod utils;

pub use election::{Election, ElectionManager, ElectionState};
pub use utils::{ElectionError, Result};
