//! Membership proofs.
//!
//! A proof is the ordered list of sibling hashes met on the way from one
//! leaf to the root, bottom layer first. Pairs are sorted before hashing, so
//! no direction bits are needed.

use bincode::{Decode, Encode};

use crate::{
    AllowlistError, Result,
    hash::{Hash, HashAlgorithm, hash_from_hex, hash_to_hex},
};

/// Upper bound on siblings in a decoded proof. A tree indexed by `u64`
/// never needs more.
pub const MAX_PROOF_SIBLINGS: usize = 64;

/// Sibling path proving one leaf's membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct AllowlistProof {
    siblings: Vec<Hash>,
}

impl AllowlistProof {
    /// Wrap a bottom-to-top sibling list.
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self { siblings }
    }

    /// Sibling hashes, bottom layer first.
    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// Consume into the sibling list.
    pub fn into_siblings(self) -> Vec<Hash> {
        self.siblings
    }

    /// Number of siblings.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// Whether the proof has no siblings (single-leaf tree or fully carried
    /// leaf).
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Fold the siblings onto `leaf` and return the resulting root.
    pub fn compute_root(&self, algorithm: HashAlgorithm, leaf: &Hash) -> Hash {
        self.siblings
            .iter()
            .fold(*leaf, |current, sibling| algorithm.internal_hash(&current, sibling))
    }

    /// Siblings as lowercase hex strings.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.siblings.iter().map(hash_to_hex).collect()
    }

    /// Parse siblings from hex strings, in order.
    pub fn from_hex_strings<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        if hexes.len() > MAX_PROOF_SIBLINGS {
            return Err(AllowlistError::InvalidProof(format!(
                "{} siblings exceeds the maximum of {}",
                hexes.len(),
                MAX_PROOF_SIBLINGS
            )));
        }
        let siblings = hexes
            .iter()
            .map(|h| hash_from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { siblings })
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| AllowlistError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects trailing bytes and proofs longer than
    /// [`MAX_PROOF_SIBLINGS`].
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>();
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| AllowlistError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(AllowlistError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        if proof.siblings.len() > MAX_PROOF_SIBLINGS {
            return Err(AllowlistError::InvalidProof(format!(
                "{} siblings exceeds the maximum of {}",
                proof.siblings.len(),
                MAX_PROOF_SIBLINGS
            )));
        }
        Ok(proof)
    }
}
