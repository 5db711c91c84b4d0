use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// 32-byte SHA-256 digest, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash(#[serde(with = "crate::utils::serde_helpers")] pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Number of leading `0` hex digits.
    pub fn leading_zero_nibbles(&self) -> u32 {
        let mut n = 0;
        for b in self.0 {
            if b == 0 {
                n += 2;
            } else {
                if b >> 4 == 0 {
                    n += 1;
                }
                break;
            }
        }
        n
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}

impl FromStr for Hash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::utils::serde_helpers::decode_fixed::<32>(s).map(Hash)
    }
}

/// SHA-256 over arbitrary bytes.
pub fn hash(bytes: &[u8]) -> Hash {
    Hash(Sha256::digest(bytes).into())
}

/// SHA-256 over a sequence of parts, without an intermediate buffer.
pub fn hash_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Hash {
    let mut h = Sha256::new();
    for p in parts {
        h.update(p);
    }
    Hash(h.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn parts_match_concatenation() {
        assert_eq!(hash_parts([b"ab".as_slice(), b"c".as_slice()]), hash(b"abc"));
    }

    #[test]
    fn leading_nibbles() {
        let mut h = Hash::ZERO;
        assert_eq!(h.leading_zero_nibbles(), 64);
        h.0[0] = 0x0f;
        assert_eq!(h.leading_zero_nibbles(), 1);
        h.0[0] = 0x10;
        assert_eq!(h.leading_zero_nibbles(), 0);
        h.0[0] = 0;
        h.0[1] = 0x01;
        assert_eq!(h.leading_zero_nibbles(), 3);
    }

    #[test]
    fn hex_round_trip() {
        let h = hash(b"vote");
        assert_eq!(h.to_hex().parse::<Hash>().unwrap(), h);
        assert!("abcd".parse::<Hash>().is_err());
    }
}
