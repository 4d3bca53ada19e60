//! Core trait for talking to a verifiable-log service.

use tern_types::{InclusionProof, LeafHash, LogLeaf, SequencedLeaf, SignedLogRoot};

use crate::error::LogError;

/// What the log did with an appended leaf. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The leaf was queued for sequencing.
    Accepted,
    /// A leaf with the same value was already present. The log deduplicates
    /// by leaf hash, so resubmission is idempotent.
    AlreadyExists,
}

/// The four operations this system consumes from a log server.
///
/// All implementations must be `Send + Sync`: the connection is the only
/// shared resource, and concurrent put/get/wait operations use it
/// simultaneously. Every operation is idempotent; the only cross-call
/// guarantee a log provides is that `fetch_root` tree sizes never decrease.
#[async_trait::async_trait]
pub trait LogClient: Send + Sync {
    /// Submit a leaf for inclusion.
    ///
    /// Sequencing is asynchronous: a successful append says nothing about
    /// when (or at what index) the leaf becomes retrievable.
    async fn append(&self, leaf: LogLeaf) -> Result<AppendOutcome, LogError>;

    /// Look up a leaf by its hash.
    ///
    /// Returns `None` while the leaf is still being sequenced. Expected and
    /// non-fatal; callers poll.
    async fn fetch_by_hash(&self, hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError>;

    /// Fetch the log's latest signed root.
    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError>;

    /// Fetch an inclusion proof for the leaf at `leaf_index` relative to the
    /// root over the first `tree_size` leaves.
    ///
    /// Returns `None` while the requested root does not yet cover the leaf.
    /// Expected and non-fatal until the leaf is sequenced under a current
    /// root.
    async fn fetch_proof(
        &self,
        leaf_index: u64,
        tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError>;
}
