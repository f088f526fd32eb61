//! Allowlists keyed by mint group.
//!
//! Each group either has a tree (restricted) or was explicitly configured
//! without one (unrestricted). Trees are built once, then the registry is
//! shared read-only; a `Restricted` group holds its tree behind an `Arc` so
//! callers can keep a handle past the registry's lifetime.

use std::sync::Arc;

use allowlist_costs::OperationCost;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    AllowlistError, Result,
    hash::{Hash, hash_to_hex},
    proof::AllowlistProof,
    tree::AllowlistTree,
};

/// Admission policy of one group.
#[derive(Debug, Clone)]
pub enum GroupPolicy {
    /// No allowlist: every identity is admitted.
    Unrestricted,
    /// Only identities in the tree are admitted.
    Restricted(Arc<AllowlistTree>),
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The group has no allowlist.
    Unrestricted,
    /// The identity is on the allowlist; the proof verifies against the
    /// group's root.
    Admitted {
        /// Leaf index of the identity's first occurrence.
        index: usize,
        /// Proof to submit with the mint.
        proof: AllowlistProof,
    },
    /// The identity is not on the allowlist.
    Rejected,
}

impl Admission {
    /// Whether the mint may proceed.
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Rejected)
    }
}

/// Group label to policy, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct AllowlistRegistry {
    groups: IndexMap<String, GroupPolicy>,
    build_cost: OperationCost,
}

impl AllowlistRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a restricted group.
    pub fn insert_restricted(
        &mut self,
        label: impl Into<String>,
        tree: AllowlistTree,
    ) -> Result<()> {
        let label = label.into();
        let (leaves, algorithm, root) = (tree.leaf_count(), tree.algorithm(), tree.root());
        self.insert(label.clone(), GroupPolicy::Restricted(Arc::new(tree)))?;
        info!(
            group = %label,
            leaves,
            algorithm = %algorithm,
            root = %hash_to_hex(&root),
            "registered allowlist group"
        );
        Ok(())
    }

    /// Register a group without an allowlist.
    pub fn insert_unrestricted(&mut self, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.insert(label.clone(), GroupPolicy::Unrestricted)?;
        info!(group = %label, "registered unrestricted group");
        Ok(())
    }

    /// Register a restricted group whose root must equal `committed_root`.
    pub fn insert_committed(
        &mut self,
        label: impl Into<String>,
        tree: AllowlistTree,
        committed_root: &Hash,
    ) -> Result<()> {
        let label = label.into();
        let computed = tree.root();
        if computed != *committed_root {
            warn!(
                group = %label,
                committed = %hash_to_hex(committed_root),
                computed = %hash_to_hex(&computed),
                "allowlist root disagrees with committed root"
            );
            return Err(AllowlistError::RootMismatch {
                group: label,
                committed: hash_to_hex(committed_root),
                computed: hash_to_hex(&computed),
            });
        }
        self.insert_restricted(label, tree)
    }

    fn insert(&mut self, label: String, policy: GroupPolicy) -> Result<()> {
        if self.groups.contains_key(&label) {
            return Err(AllowlistError::DuplicateGroup(label));
        }
        self.groups.insert(label, policy);
        Ok(())
    }

    /// Add hashing work spent building this registry's trees.
    pub(crate) fn record_build_cost(&mut self, cost: OperationCost) {
        self.build_cost += cost;
    }

    /// Hashing work spent building this registry's trees.
    pub fn build_cost(&self) -> OperationCost {
        self.build_cost
    }

    /// Policy of `label`.
    pub fn group(&self, label: &str) -> Option<&GroupPolicy> {
        self.groups.get(label)
    }

    /// Tree of `label`, if the group is restricted.
    pub fn tree(&self, label: &str) -> Option<&Arc<AllowlistTree>> {
        match self.groups.get(label)? {
            GroupPolicy::Restricted(tree) => Some(tree),
            GroupPolicy::Unrestricted => None,
        }
    }

    /// Group labels in registration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// `(label, policy)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupPolicy)> {
        self.groups.iter().map(|(label, policy)| (label.as_str(), policy))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Decide whether `identity` may mint in `label`.
    ///
    /// Fails only for an unknown group; absence from the allowlist is
    /// [`Admission::Rejected`].
    pub fn check(&self, label: &str, identity: &[u8]) -> Result<Admission> {
        let policy = self
            .groups
            .get(label)
            .ok_or_else(|| AllowlistError::UnknownGroup(label.to_string()))?;
        let tree = match policy {
            GroupPolicy::Unrestricted => {
                debug!(group = %label, "group is unrestricted");
                return Ok(Admission::Unrestricted);
            }
            GroupPolicy::Restricted(tree) => tree,
        };

        let admission = match tree.prove_identity(identity) {
            Some((index, proof)) if tree.verify_index(index, &proof, &tree.root()) => {
                Admission::Admitted { index, proof }
            }
            _ => Admission::Rejected,
        };
        debug!(
            group = %label,
            identity = %String::from_utf8_lossy(identity),
            admitted = admission.is_admitted(),
            "allowlist check"
        );
        Ok(admission)
    }
}
