//! Merkle allowlist engine.
//!
//! Builds a Merkle tree over an ordered list of admitted identities (wallet
//! addresses), produces membership proofs and verifies them against a root
//! committed elsewhere, typically on-chain.
//!
//! Hashing rules, shared by every component:
//!
//! - leaf: `H(0x00 || identity_bytes)`
//! - internal node: `H(0x01 || min(a, b) || max(a, b))`, byte-wise order
//! - an unpaired trailing node is carried to the next layer unchanged
//!
//! `H` is BLAKE3 by default; SHA-256 and Keccak-256 are available through
//! [`HashAlgorithm`] to match roots produced by other toolchains.
//!
//! # Core types
//!
//! - [`AllowlistTree`]: build, root, proof generation.
//! - [`AllowlistProof`]: sibling path, serialization.
//! - [`verify_leaf`] / [`verify_identity`]: tree-free verification.
//! - [`AllowlistRegistry`]: one policy per mint group.
//! - [`AllowlistConfig`]: JSON configuration that builds a registry.

#![deny(missing_docs)]

mod config;
mod error;
pub(crate) mod hash;
mod identity;
pub(crate) mod proof;
mod registry;
pub(crate) mod tree;
mod verify;
pub mod visualize;

#[cfg(test)]
mod tests;

pub use allowlist_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use config::{AllowlistConfig, GroupConfig};
pub use error::{AllowlistError, Result};
pub use hash::{
    Hash, HashAlgorithm, INTERNAL_DOMAIN_TAG, LEAF_DOMAIN_TAG, hash_from_hex, hash_to_hex,
};
pub use identity::{ADDRESS_LEN, Identity, IdentityEncoding, parse_identities};
pub use proof::{AllowlistProof, MAX_PROOF_SIBLINGS};
pub use registry::{Admission, AllowlistRegistry, GroupPolicy};
pub use tree::AllowlistTree;
pub use verify::{verify_identity, verify_leaf};
