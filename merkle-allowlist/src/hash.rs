//! Digest primitives shared by the builder and the verifier.
//!
//! Hash domain separation:
//! - Leaves:         `H(0x00 || identity_bytes)`
//! - Internal nodes: `H(0x01 || min(a, b) || max(a, b))`
//!
//! The pair is sorted byte-wise before hashing, so a proof carries no
//! left/right flags. The tags keep an internal node from being replayed as a
//! leaf.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use crate::{AllowlistError, Result};

/// A 32-byte digest.
pub type Hash = [u8; 32];

/// Domain tag prepended to leaf inputs.
pub const LEAF_DOMAIN_TAG: u8 = 0x00;
/// Domain tag prepended to internal node inputs.
pub const INTERNAL_DOMAIN_TAG: u8 = 0x01;

/// Hash function used for every digest of a tree.
///
/// A root built with one algorithm never verifies under another.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3, the default.
    #[default]
    Blake3,
    /// SHA-256.
    Sha256,
    /// Keccak-256 (pre-standard SHA-3 padding, as used on-chain).
    Keccak256,
}

impl HashAlgorithm {
    /// `H(0x00 || identity)`.
    pub fn leaf_hash(self, identity: &[u8]) -> Hash {
        self.digest(&[&[LEAF_DOMAIN_TAG], identity])
    }

    /// `H(0x01 || min(a, b) || max(a, b))`, commutative in its arguments.
    pub fn internal_hash(self, a: &Hash, b: &Hash) -> Hash {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.digest(&[&[INTERNAL_DOMAIN_TAG], lo, hi])
    }

    fn digest(self, parts: &[&[u8]]) -> Hash {
        match self {
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                *hasher.finalize().as_bytes()
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = sha2::Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
            HashAlgorithm::Keccak256 => {
                let mut hasher = sha3::Keccak256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
        }
    }

    /// Lowercase name, as accepted by [`FromStr`] and serde.
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Keccak256 => "keccak256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = AllowlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "keccak256" => Ok(HashAlgorithm::Keccak256),
            other => Err(AllowlistError::Config(format!(
                "unknown hash algorithm `{}` (expected blake3, sha256 or keccak256)",
                other
            ))),
        }
    }
}

/// Lowercase hex rendering of a digest.
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parse a digest from exactly 64 lowercase hex characters.
pub fn hash_from_hex(text: &str) -> Result<Hash> {
    if text.len() != 64 {
        return Err(AllowlistError::InvalidHash(format!(
            "expected 64 hex characters, got {}",
            text.len()
        )));
    }
    if text.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(AllowlistError::InvalidHash(
            "hex digests must be lowercase".into(),
        ));
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(text, &mut hash)
        .map_err(|e| AllowlistError::InvalidHash(format!("{}: {}", e, text)))?;
    Ok(hash)
}
