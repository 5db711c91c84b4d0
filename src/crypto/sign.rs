use ed25519_dalek::{Signature, Signer as DalekSigner};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::crypto::{PrivateSecret, PublicId};

/// Authorization proof over a vote payload (Ed25519 signature bytes).
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(#[serde(with = "crate::utils::serde_helpers")] pub [u8; 64]);

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({}..)", hex::encode(&self.0[..8]))
    }
}

/// Trait for signing
pub trait Signer {
    fn sign(&self, msg: &[u8]) -> Proof;
}

/// Trait for verifying
pub trait Verifier {
    fn verify(&self, msg: &[u8], proof: &Proof) -> bool;
}

impl Signer for PrivateSecret {
    fn sign(&self, msg: &[u8]) -> Proof {
        Proof(self.signing_key().sign(msg).to_bytes())
    }
}

impl Verifier for PublicId {
    fn verify(&self, msg: &[u8], proof: &Proof) -> bool {
        let Some(vk) = self.verifying_key() else {
            return false;
        };
        vk.verify_strict(msg, &Signature::from_bytes(&proof.0)).is_ok()
    }
}

pub fn sign(secret: &PrivateSecret, payload: &[u8]) -> Proof {
    Signer::sign(secret, payload)
}

pub fn verify(public: &PublicId, payload: &[u8], proof: &Proof) -> bool {
    Verifier::verify(public, payload, proof)
}

/// Canonical bytes a voter signs to authorize a ballot.
pub fn vote_payload(voter_id: &str, candidate_id: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(voter_id.len() + candidate_id.len() + 16);
    out.extend_from_slice(b"ballot:");
    out.extend_from_slice(&(voter_id.len() as u32).to_be_bytes());
    out.extend_from_slice(voter_id.as_bytes());
    out.extend_from_slice(&(candidate_id.len() as u32).to_be_bytes());
    out.extend_from_slice(candidate_id.as_bytes());
    out
}
