//! JSON allowlist configuration.
//!
//! ```json
//! {
//!   "hash": "blake3",
//!   "groups": [
//!     { "label": "og", "encoding": "base58", "identities": ["..."], "committed_root": "..." },
//!     { "label": "public" }
//!   ]
//! }
//! ```
//!
//! A group without `identities` is unrestricted. An empty `identities` list
//! is an error, never "everyone".

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AllowlistError, Result,
    hash::{HashAlgorithm, hash_from_hex},
    identity::{IdentityEncoding, parse_identities},
    registry::AllowlistRegistry,
    tree::AllowlistTree,
};

/// Top-level allowlist configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowlistConfig {
    /// Hash function for every group.
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Mint groups, in order.
    pub groups: Vec<GroupConfig>,
}

/// One mint group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Group label.
    pub label: String,
    /// Encoding the identities must follow.
    #[serde(default)]
    pub encoding: IdentityEncoding,
    /// Admitted identities; `None` makes the group unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identities: Option<Vec<String>>,
    /// Root committed elsewhere (hex); the built root must match it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed_root: Option<String>,
}

impl AllowlistConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading allowlist config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Settings of the group labelled `label`.
    pub fn group(&self, label: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|group| group.label == label)
    }

    /// Validate every group, build its tree and check committed roots.
    pub fn build_registry(&self) -> Result<AllowlistRegistry> {
        let mut registry = AllowlistRegistry::new();
        for group in &self.groups {
            if group.label.is_empty() {
                return Err(AllowlistError::Config("group label must not be empty".into()));
            }
            let Some(texts) = &group.identities else {
                if group.committed_root.is_some() {
                    return Err(AllowlistError::Config(format!(
                        "group `{}` has a committed root but no identities",
                        group.label
                    )));
                }
                registry.insert_unrestricted(group.label.clone())?;
                continue;
            };

            let identities = parse_identities(texts, group.encoding)?;
            let ctx = AllowlistTree::from_identities(&identities, self.hash);
            debug!(
                group = %group.label,
                leaf_hashes = ctx.cost.hash_leaf_calls,
                node_hashes = ctx.cost.hash_node_calls,
                "built allowlist tree"
            );
            registry.record_build_cost(ctx.cost);
            let tree = ctx.value?;

            match &group.committed_root {
                Some(hex) => {
                    let committed = hash_from_hex(hex)?;
                    registry.insert_committed(group.label.clone(), tree, &committed)?;
                }
                None => registry.insert_restricted(group.label.clone(), tree)?,
            }
        }
        Ok(registry)
    }
}
