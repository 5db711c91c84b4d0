//! Hex (de)serialization for fixed-width byte arrays, for use with `#[serde(with = ...)]`.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize bytes as hex string
pub fn serialize<S, const N: usize>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&hex::encode(bytes))
}

/// Deserialize hex string into a fixed-width array
pub fn deserialize<'de, D, const N: usize>(d: D) -> Result<[u8; N], D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    decode_fixed(&s).map_err(D::Error::custom)
}

/// Decode a hex string of exactly `N` bytes.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let bytes = hex::decode(s.trim()).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| format!("expected {N} bytes, got {}", v.len()))
}
