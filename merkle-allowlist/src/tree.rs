use allowlist_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error_no_add};

use crate::{
    AllowlistError, Result,
    hash::{Hash, HashAlgorithm},
    identity::Identity,
    proof::AllowlistProof,
    verify::verify_leaf,
};

/// An immutable Merkle tree over an ordered allowlist.
///
/// Layer 0 holds the leaf hashes in input order; each following layer pairs
/// adjacent hashes with the sorted-pair rule. A trailing unpaired hash is
/// carried up unchanged, so a tree over `n` leaves has `ceil(log2 n) + 1`
/// layers and the last layer holds only the root.
///
/// Duplicate identities are kept, each at its own index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistTree {
    algorithm: HashAlgorithm,
    layers: Vec<Vec<Hash>>,
}

impl AllowlistTree {
    /// Build a tree from raw identity bytes, in order.
    ///
    /// Fails with `EmptyAllowlist` for an empty input and `MalformedIdentity`
    /// for an empty entry. The cost counts one leaf digest per identity and
    /// one internal digest per combined pair.
    pub fn build<I>(identities: I, algorithm: HashAlgorithm) -> CostResult<Self, AllowlistError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut cost = OperationCost::default();
        let mut leaves = Vec::new();
        for (position, identity) in identities.into_iter().enumerate() {
            let identity = identity.as_ref();
            cost_return_on_error_no_add!(
                &cost,
                if identity.is_empty() {
                    Err(AllowlistError::MalformedIdentity(format!(
                        "entry {}: empty identity",
                        position
                    )))
                } else {
                    Ok(())
                }
            );
            cost += OperationCost::with_leaf_hash(identity.len());
            leaves.push(algorithm.leaf_hash(identity));
        }
        Self::from_leaves(leaves, algorithm).add_cost(cost)
    }

    /// Build a tree from already validated identities.
    pub fn from_identities(
        identities: &[Identity],
        algorithm: HashAlgorithm,
    ) -> CostResult<Self, AllowlistError> {
        Self::build(identities, algorithm)
    }

    /// Build a tree from precomputed leaf hashes.
    pub fn from_leaves(
        leaves: Vec<Hash>,
        algorithm: HashAlgorithm,
    ) -> CostResult<Self, AllowlistError> {
        let mut cost = OperationCost::default();
        if leaves.is_empty() {
            return Err(AllowlistError::EmptyAllowlist).wrap_with_cost(cost);
        }

        let mut layers = vec![leaves];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() == 1 {
                break;
            }
            let (next, calls) = next_layer(algorithm, current);
            cost += OperationCost::with_hash_node_calls(calls);
            layers.push(next);
        }

        Ok(AllowlistTree { algorithm, layers }).wrap_with_cost(cost)
    }

    /// The root hash.
    pub fn root(&self) -> Hash {
        // Construction guarantees a final layer of exactly one hash.
        self.layers[self.layers.len() - 1][0]
    }

    /// Leaf hashes in input order.
    pub fn leaves(&self) -> &[Hash] {
        &self.layers[0]
    }

    /// Leaf hash at `index`, if any.
    pub fn leaf(&self, index: usize) -> Option<&Hash> {
        self.layers[0].get(index)
    }

    /// All layers, leaves first, root last.
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Number of layers including the leaf and root layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of leaves (identities, duplicates included).
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Hash function every digest of this tree was built with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Index of the first leaf built from `identity`.
    pub fn position_of(&self, identity: &[u8]) -> Option<usize> {
        let leaf = self.algorithm.leaf_hash(identity);
        self.layers[0].iter().position(|h| *h == leaf)
    }

    /// Collect the sibling hashes that lead from leaf `index` to the root.
    ///
    /// A layer where the node at the current position was carried up
    /// unpaired contributes nothing.
    pub fn proof(&self, index: usize) -> Result<AllowlistProof> {
        let count = self.leaf_count();
        if index >= count {
            return Err(AllowlistError::InvalidIndex { index, count });
        }

        let mut siblings = Vec::with_capacity(self.layers.len() - 1);
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            if let Some(sibling) = layer.get(position ^ 1) {
                siblings.push(*sibling);
            }
            position /= 2;
        }
        Ok(AllowlistProof::new(siblings))
    }

    /// Locate `identity` and prove it, returning its leaf index and proof.
    pub fn prove_identity(&self, identity: &[u8]) -> Option<(usize, AllowlistProof)> {
        let index = self.position_of(identity)?;
        self.proof(index).ok().map(|proof| (index, proof))
    }

    /// Verify `proof` for the leaf at `index` against `root`.
    ///
    /// An index outside the tree has no leaf and yields `false`.
    pub fn verify_index(&self, index: usize, proof: &AllowlistProof, root: &Hash) -> bool {
        self.leaf(index)
            .is_some_and(|leaf| verify_leaf(self.algorithm, leaf, proof, root))
    }

    /// Whether `identity` is on this allowlist, checked through a full
    /// prove-then-verify round against this tree's root.
    pub fn contains(&self, identity: &[u8]) -> bool {
        self.prove_identity(identity)
            .is_some_and(|(index, proof)| self.verify_index(index, &proof, &self.root()))
    }
}

/// Pair up `layer` into the next one. Returns the layer and the number of
/// internal digests computed.
fn next_layer(algorithm: HashAlgorithm, layer: &[Hash]) -> (Vec<Hash>, u32) {
    let mut calls = 0;
    let next = layer
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => {
                calls += 1;
                algorithm.internal_hash(left, right)
            }
            _ => pair[0],
        })
        .collect();
    (next, calls)
}
