use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::utils::serde_helpers::decode_fixed;

/// Public identifier stored in the registry (Ed25519 verifying key bytes).
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicId(#[serde(with = "crate::utils::serde_helpers")] pub [u8; 32]);

impl PublicId {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicId({})", self.to_hex())
    }
}

/// Private secret handed to the voter once, at registration.
///
/// Never stored server-side and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateSecret([u8; 32]);

impl PrivateSecret {
    /// Parse the hex form a voter presents when casting a ballot.
    pub fn from_hex(s: &str) -> Option<Self> {
        decode_fixed::<32>(s).ok().map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }

    pub fn public_id(&self) -> PublicId {
        PublicId(self.signing_key().verifying_key().to_bytes())
    }
}

impl fmt::Debug for PrivateSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateSecret(..)")
    }
}

impl PublicId {
    pub(crate) fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).ok()
    }
}

/// Generate a new random keypair
pub fn generate_keypair() -> (PublicId, PrivateSecret) {
    let sk = SigningKey::generate(&mut OsRng);
    let public = PublicId(sk.verifying_key().to_bytes());
    (public, PrivateSecret(sk.to_bytes()))
}
