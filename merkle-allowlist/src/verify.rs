//! Proof verification.
//!
//! Pure functions: no tree is needed, only the leaf (or the identity it came
//! from), the sibling path and a root obtained from anywhere, typically the
//! one committed on-chain. A mismatch is an ordinary `false`.

use crate::{
    hash::{Hash, HashAlgorithm},
    proof::AllowlistProof,
};

/// Recompute the root from `leaf` and `proof` and compare it to `root`.
pub fn verify_leaf(
    algorithm: HashAlgorithm,
    leaf: &Hash,
    proof: &AllowlistProof,
    root: &Hash,
) -> bool {
    proof.compute_root(algorithm, leaf) == *root
}

/// Hash `identity` into its leaf, then [`verify_leaf`].
pub fn verify_identity(
    algorithm: HashAlgorithm,
    identity: &[u8],
    proof: &AllowlistProof,
    root: &Hash,
) -> bool {
    verify_leaf(algorithm, &algorithm.leaf_hash(identity), proof, root)
}
