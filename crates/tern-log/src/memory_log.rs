//! In-memory reference log.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tern_merkle::{audit_path, hash_leaf, tree_root};
use tern_types::{InclusionProof, LeafHash, LogLeaf, SequencedLeaf, SignedLogRoot};
use tracing::debug;

use crate::error::LogError;
use crate::traits::{AppendOutcome, LogClient};

/// A stored leaf together with its precomputed hash.
struct StoredLeaf {
    hash: LeafHash,
    leaf: LogLeaf,
}

struct Inner {
    /// Leaves with assigned indices, in sequence order.
    sequenced: Vec<StoredLeaf>,
    /// Appended leaves the sequencer has not yet picked up.
    staged: Vec<StoredLeaf>,
}

/// In-memory log backed by a `RwLock`-guarded leaf vector.
///
/// A correct, minimal stand-in for a real log server: deduplicates by leaf
/// hash, computes real roots and audit paths over its sequenced leaves, and
/// models asynchronous sequencing by staging appended leaves until
/// [`advance`](MemoryLog::advance) runs (tests and the demo drive it
/// explicitly, standing in for the server's sequencer cadence).
///
/// Roots are unsigned (`signature` is empty): establishing trust in a root
/// is the caller's concern, and in-process there is no channel to distrust.
pub struct MemoryLog {
    inner: RwLock<Inner>,
    sequence_on_append: bool,
}

impl MemoryLog {
    /// Create a log whose sequencer must be driven manually via `advance`.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                sequenced: Vec::new(),
                staged: Vec::new(),
            }),
            sequence_on_append: false,
        }
    }

    /// Create a log that sequences every leaf the moment it is appended.
    ///
    /// Collapses the submitted→sequenced gap; useful for tests that don't
    /// care about sequencing latency.
    pub fn sequencing_instantly() -> Self {
        Self {
            sequence_on_append: true,
            ..Self::new()
        }
    }

    /// Move all staged leaves into the sequenced tree, assigning indices.
    ///
    /// Returns how many leaves were sequenced.
    pub fn advance(&self) -> usize {
        let mut inner = self.inner.write().expect("lock poisoned");
        let moved = inner.staged.len();

        let staged = std::mem::take(&mut inner.staged);
        inner.sequenced.extend(staged);

        if moved > 0 {
            debug!(
                sequenced = moved,
                tree_size = inner.sequenced.len(),
                "sequenced staged leaves"
            );
        }
        moved
    }

    /// Number of leaves currently incorporated into the tree.
    pub fn tree_size(&self) -> u64 {
        let inner = self.inner.read().expect("lock poisoned");
        inner.sequenced.len() as u64
    }

    fn contains(inner: &Inner, hash: &LeafHash) -> bool {
        inner.sequenced.iter().any(|s| s.hash == *hash)
            || inner.staged.iter().any(|s| s.hash == *hash)
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LogClient for MemoryLog {
    async fn append(&self, leaf: LogLeaf) -> Result<AppendOutcome, LogError> {
        if leaf.leaf_value.is_empty() {
            return Err(LogError::InvalidArgument("empty leaf value".into()));
        }

        let hash = hash_leaf(&leaf.leaf_value);
        let mut inner = self.inner.write().expect("lock poisoned");

        if Self::contains(&inner, &hash) {
            debug!(%hash, "append deduplicated");
            return Ok(AppendOutcome::AlreadyExists);
        }

        let stored = StoredLeaf { hash, leaf };
        if self.sequence_on_append {
            inner.sequenced.push(stored);
        } else {
            inner.staged.push(stored);
        }

        debug!(%hash, "leaf accepted");
        Ok(AppendOutcome::Accepted)
    }

    async fn fetch_by_hash(&self, hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner
            .sequenced
            .iter()
            .position(|s| s.hash == hash)
            .map(|index| SequencedLeaf {
                leaf: inner.sequenced[index].leaf.clone(),
                leaf_index: index as u64,
            }))
    }

    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError> {
        let inner = self.inner.read().expect("lock poisoned");
        let hashes: Vec<LeafHash> = inner.sequenced.iter().map(|s| s.hash).collect();

        let timestamp_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Ok(SignedLogRoot {
            root_hash: tree_root(&hashes),
            tree_size: hashes.len() as u64,
            timestamp_nanos,
            signature: Bytes::new(),
        })
    }

    async fn fetch_proof(
        &self,
        leaf_index: u64,
        tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError> {
        if tree_size == 0 || leaf_index >= tree_size {
            return Err(LogError::InvalidArgument(format!(
                "no leaf {leaf_index} in a tree of size {tree_size}"
            )));
        }

        let inner = self.inner.read().expect("lock poisoned");
        if tree_size > inner.sequenced.len() as u64 {
            // The tree hasn't grown to the requested size yet.
            return Ok(None);
        }

        let hashes: Vec<LeafHash> = inner.sequenced[..tree_size as usize]
            .iter()
            .map(|s| s.hash)
            .collect();

        let path = audit_path(&hashes, leaf_index as usize)
            .expect("index bounds checked above");

        Ok(Some(InclusionProof {
            leaf_index,
            tree_size,
            audit_path: path,
        }))
    }
}
