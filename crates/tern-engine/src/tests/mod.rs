//! Tests for the coordinator.

mod put_get_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tern_log::{AppendOutcome, LogClient, LogError, MemoryLog};
use tern_types::{
    Extra, InclusionProof, LeafHash, LeafRecord, LogLeaf, SequencedLeaf, SignedLogRoot,
};

use crate::coordinator::{Coordinator, EngineConfig};

/// Poll interval used throughout; tests run under virtual time, so the
/// value only shapes the schedule, not wall-clock duration.
const POLL: Duration = Duration::from_millis(100);

/// Coordinator over the given client with the test poll interval.
fn coordinator(client: Arc<dyn LogClient>) -> Coordinator {
    Coordinator::new(
        client,
        EngineConfig {
            poll_interval: POLL,
        },
    )
}

fn record(name: &str) -> LeafRecord {
    LeafRecord::new(name)
}

fn extra() -> Extra {
    Extra::new("extra")
}

/// How a [`TamperingLog`] corrupts the proofs it serves.
#[derive(Clone, Copy)]
enum Tamper {
    /// Flip one bit of the first audit-path entry (well-formed, wrong root).
    FlipByte,
    /// Drop the last audit-path entry (structurally too short).
    Truncate,
}

/// Wraps a [`MemoryLog`] and corrupts every proof it serves, counting how
/// many proofs were handed out so tests can assert fatal outcomes are not
/// retried.
struct TamperingLog {
    inner: MemoryLog,
    tamper: Tamper,
    proofs_served: AtomicU32,
}

impl TamperingLog {
    fn new(inner: MemoryLog, tamper: Tamper) -> Self {
        Self {
            inner,
            tamper,
            proofs_served: AtomicU32::new(0),
        }
    }

    fn proofs_served(&self) -> u32 {
        self.proofs_served.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LogClient for TamperingLog {
    async fn append(&self, leaf: LogLeaf) -> Result<AppendOutcome, LogError> {
        self.inner.append(leaf).await
    }

    async fn fetch_by_hash(&self, hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError> {
        self.inner.fetch_by_hash(hash).await
    }

    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError> {
        self.inner.fetch_root().await
    }

    async fn fetch_proof(
        &self,
        leaf_index: u64,
        tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError> {
        let mut proof = match self.inner.fetch_proof(leaf_index, tree_size).await? {
            Some(proof) => proof,
            None => return Ok(None),
        };

        self.proofs_served.fetch_add(1, Ordering::SeqCst);
        match self.tamper {
            Tamper::FlipByte => {
                if let Some(entry) = proof.audit_path.first_mut() {
                    entry[0] ^= 0x01;
                }
            }
            Tamper::Truncate => {
                proof.audit_path.pop();
            }
        }
        Ok(Some(proof))
    }
}

/// A log that answers `fetch_root` from a fixed script of tree sizes and
/// never sequences anything. Used to simulate a log whose tree shrinks.
struct ScriptedRootLog {
    sizes: std::sync::Mutex<Vec<u64>>,
}

impl ScriptedRootLog {
    /// Roots are served front-to-back; the last size repeats once the
    /// script is exhausted.
    fn new(sizes: &[u64]) -> Self {
        Self {
            sizes: std::sync::Mutex::new(sizes.to_vec()),
        }
    }
}

#[async_trait::async_trait]
impl LogClient for ScriptedRootLog {
    async fn append(&self, _leaf: LogLeaf) -> Result<AppendOutcome, LogError> {
        Ok(AppendOutcome::Accepted)
    }

    async fn fetch_by_hash(&self, _hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError> {
        Ok(None)
    }

    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError> {
        let mut sizes = self.sizes.lock().unwrap();
        let tree_size = if sizes.len() > 1 {
            sizes.remove(0)
        } else {
            sizes[0]
        };
        Ok(SignedLogRoot {
            root_hash: [0u8; 32],
            tree_size,
            timestamp_nanos: 0,
            signature: Bytes::new(),
        })
    }

    async fn fetch_proof(
        &self,
        _leaf_index: u64,
        _tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError> {
        Ok(None)
    }
}

/// A log whose every operation fails with the given error, counting calls.
struct BrokenLog {
    error: LogError,
    calls: AtomicU32,
}

impl BrokenLog {
    fn new(error: LogError) -> Self {
        Self {
            error,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, LogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

#[async_trait::async_trait]
impl LogClient for BrokenLog {
    async fn append(&self, _leaf: LogLeaf) -> Result<AppendOutcome, LogError> {
        self.fail()
    }

    async fn fetch_by_hash(&self, _hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError> {
        self.fail()
    }

    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError> {
        self.fail()
    }

    async fn fetch_proof(
        &self,
        _leaf_index: u64,
        _tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError> {
        self.fail()
    }
}
