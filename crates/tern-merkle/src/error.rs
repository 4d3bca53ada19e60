//! Error types for proof verification.

/// Structural defects in an inclusion proof.
///
/// These are distinct from an honest hash mismatch: a structurally broken
/// proof cannot even be evaluated against the claimed tree shape, while a
/// mismatch is a well-formed proof that recomputes to the wrong root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// No proof can exist for an empty tree.
    #[error("tree is empty")]
    EmptyTree,

    /// The claimed leaf position lies outside the claimed tree.
    #[error("leaf index {leaf_index} out of range for tree size {tree_size}")]
    IndexOutOfRange {
        /// The claimed leaf position.
        leaf_index: u64,
        /// The claimed tree size.
        tree_size: u64,
    },

    /// The audit path ran out before reaching the root.
    #[error("audit path too short ({path_len} entries) for the claimed tree shape")]
    PathTooShort {
        /// Number of entries supplied.
        path_len: usize,
    },

    /// The audit path has entries left over after reaching the root.
    #[error("audit path too long ({path_len} entries, root reached after {consumed})")]
    PathTooLong {
        /// Number of entries supplied.
        path_len: usize,
        /// Entries consumed before the root was reached.
        consumed: usize,
    },
}
