//! Domain-separated tree hashing (SHA-256, RFC 6962 prefixes).

use sha2::{Digest, Sha256};
use tern_types::LeafHash;

/// Prefix for leaf hashes.
const LEAF_PREFIX: u8 = 0x00;
/// Prefix for interior-node hashes.
const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf value: `SHA-256(0x00 ‖ leaf_value)`.
///
/// The prefix separates leaf hashes from interior-node hashes, so an attacker
/// cannot forge a leaf whose hash collides with an interior node of the tree.
/// Deterministic: identical input bytes always produce the same hash, which
/// is what lets a caller compute the hash before submission and query the log
/// by it later.
pub fn hash_leaf(leaf_value: &[u8]) -> LeafHash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf_value);
    LeafHash::from(<[u8; 32]>::from(hasher.finalize()))
}

/// Hash an interior node: `SHA-256(0x01 ‖ left ‖ right)`.
pub fn hash_children(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Root of the empty tree: `SHA-256()` of no input.
pub fn empty_root() -> [u8; 32] {
    Sha256::digest(b"").into()
}
