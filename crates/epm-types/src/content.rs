use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Multihash code for sha2-256.
pub const SHA2_256_CODE: u8 = 0x12;
/// Digest length of sha2-256 in bytes.
pub const SHA2_256_LEN: u8 = 0x20;

/// Content-addressed identifier for a stored payload.
///
/// A `ContentId` is the sha2-256 digest of the payload's canonical file-node
/// encoding. It renders as a base58btc multihash (CIDv0, the familiar
/// `Qm...` form), so identical content always produces the same string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; 32]);

impl ContentId {
    /// Create a `ContentId` from a pre-computed sha2-256 digest.
    pub const fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// The raw 32-byte digest.
    pub fn digest(&self) -> &[u8; 32] {
        &self.0
    }

    /// Multihash bytes: code, length, digest.
    pub fn multihash(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(34);
        out.push(SHA2_256_CODE);
        out.push(SHA2_256_LEN);
        out.extend_from_slice(&self.0);
        out
    }

    /// Base58btc-encoded multihash (`Qm...`).
    pub fn to_base58(&self) -> String {
        bs58::encode(self.multihash()).into_string()
    }

    /// Parse a base58btc CIDv0 string.
    pub fn from_base58(s: &str) -> Result<Self, TypeError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| TypeError::InvalidContentId {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_multihash(&bytes).map_err(|e| match e {
            TypeError::InvalidLength { expected, actual } => TypeError::InvalidContentId {
                value: s.to_string(),
                reason: format!("expected {expected} multihash bytes, got {actual}"),
            },
            other => other,
        })
    }

    /// Parse raw multihash bytes. Only sha2-256 is accepted.
    pub fn from_multihash(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != 34 {
            return Err(TypeError::InvalidLength {
                expected: 34,
                actual: bytes.len(),
            });
        }
        if bytes[0] != SHA2_256_CODE || bytes[1] != SHA2_256_LEN {
            return Err(TypeError::InvalidContentId {
                value: hex::encode(bytes),
                reason: format!("unsupported multihash prefix {:#04x}{:02x}", bytes[0], bytes[1]),
            });
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[2..]);
        Ok(Self(digest))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base58 = self.to_base58();
        write!(f, "ContentId({})", &base58[..8])
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ContentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
