//! Inclusion-proof verification: recompute a root from a leaf hash and an
//! audit path, and compare it against a trusted root.

use tern_types::LeafHash;

use crate::error::ProofError;
use crate::hasher::hash_children;

/// Result of evaluating a structurally valid proof.
///
/// `verified` is false when the recomputed root differs from the expected
/// one: a well-formed proof for the wrong tree, a corrupted sibling, or a
/// wrong leaf position. The recomputed root is kept so callers can log both
/// sides of the mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Whether the recomputed root equals the expected root.
    pub verified: bool,
    /// The root recomputed from the leaf hash and audit path.
    pub computed_root: [u8; 32],
}

/// Verify that `leaf_hash` sits at `leaf_index` in the tree of `tree_size`
/// leaves committed to by `expected_root`.
///
/// Walks the audit path level-by-level from the leaf towards the root,
/// mirroring the tree shape implied by `(leaf_index, tree_size)`:
///
/// - a node with an odd index, or one that is the rightmost node of its
///   level, takes its sibling on the left;
/// - any other node takes its sibling on the right;
/// - rightmost nodes with no real sibling at intermediate levels (the
///   non-power-of-two case) are climbed through without consuming a path
///   entry.
///
/// A path that is too short or too long for the claimed shape is a
/// structural [`ProofError`], distinct from a hash mismatch: the former
/// means the proof cannot belong to the claimed `(leaf_index, tree_size)`
/// at all, the latter that it evaluates to the wrong root.
pub fn verify_inclusion(
    leaf_hash: &LeafHash,
    leaf_index: u64,
    tree_size: u64,
    audit_path: &[[u8; 32]],
    expected_root: &[u8; 32],
) -> Result<VerificationOutcome, ProofError> {
    if tree_size == 0 {
        return Err(ProofError::EmptyTree);
    }
    if leaf_index >= tree_size {
        return Err(ProofError::IndexOutOfRange {
            leaf_index,
            tree_size,
        });
    }

    // fnode walks up from the leaf position, snode from the last leaf; when
    // both reach zero the accumulator has climbed to the root.
    let mut fnode = leaf_index;
    let mut snode = tree_size - 1;
    let mut acc = *leaf_hash.as_bytes();
    let mut consumed = 0usize;

    for sibling in audit_path {
        if snode == 0 {
            return Err(ProofError::PathTooLong {
                path_len: audit_path.len(),
                consumed,
            });
        }

        if fnode & 1 == 1 || fnode == snode {
            // Current node is a right child (or the rightmost node of its
            // level): the sibling goes on the left.
            acc = hash_children(sibling, &acc);

            // Climb through ancestors that are rightmost at their level and
            // have no sibling of their own.
            while fnode & 1 == 0 && fnode != 0 {
                fnode >>= 1;
                snode >>= 1;
            }
        } else {
            acc = hash_children(&acc, sibling);
        }

        fnode >>= 1;
        snode >>= 1;
        consumed += 1;
    }

    if snode != 0 {
        return Err(ProofError::PathTooShort {
            path_len: audit_path.len(),
        });
    }

    Ok(VerificationOutcome {
        verified: acc == *expected_root,
        computed_root: acc,
    })
}
