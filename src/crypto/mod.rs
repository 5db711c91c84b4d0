//! Crypto module: key management, signing, verification, hashing.
//!
//! - Keys: voter key pair generation, hex forms of the public id and private secret
//! - Sign: Ed25519 proofs over the canonical vote payload
//! - Hash: SHA-256 digests binding block and transaction contents

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{hash, hash_parts, Hash};
pub use keys::{generate_keypair, PrivateSecret, PublicId};
pub use sign::{sign, verify, vote_payload, Proof, Signer, Verifier};
