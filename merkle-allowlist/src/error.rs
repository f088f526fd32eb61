use thiserror::Error;

/// Errors from allowlist operations.
///
/// A failed membership check is not an error: verification returns `false`
/// and registry checks return [`Admission::Rejected`](crate::Admission).
#[derive(Debug, Error)]
pub enum AllowlistError {
    /// Building a tree from zero identities.
    #[error("allowlist is empty, no root can be built")]
    EmptyAllowlist,
    /// A leaf index past the end of the tree.
    #[error("leaf index {index} is out of range (leaf count {count})")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        count: usize,
    },
    /// An identity that does not follow its encoding.
    #[error("malformed identity: {0}")]
    MalformedIdentity(String),
    /// A root or sibling that is not 64 lowercase hex characters.
    #[error("invalid hash: {0}")]
    InvalidHash(String),
    /// A proof that cannot be decoded or is too long.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// A group label registered twice.
    #[error("group `{0}` is already registered")]
    DuplicateGroup(String),
    /// A check against a group that was never registered.
    #[error("unknown group `{0}`")]
    UnknownGroup(String),
    /// The built root differs from the committed one.
    #[error("root mismatch for group `{group}`: committed {committed}, computed {computed}")]
    RootMismatch {
        /// Group label.
        group: String,
        /// Committed root, hex.
        committed: String,
        /// Root built from the identities, hex.
        computed: String,
    },
    /// A configuration that is well-formed JSON but inconsistent.
    #[error("invalid config: {0}")]
    Config(String),
    /// Reading a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A configuration file is not valid JSON for the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Alias for `core::result::Result<T, AllowlistError>`.
pub type Result<T> = core::result::Result<T, AllowlistError>;
