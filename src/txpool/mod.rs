pub mod pool;
pub mod ingest;

pub use pool::VotePool;
pub use ingest::{CredentialCheck, KeyProofCheck, VoteIngestor, VoteReceipt};
