//! The request coordinator.

use std::sync::Arc;
use std::time::Duration;

use tern_log::{AppendOutcome, LogClient};
use tern_merkle::verify_inclusion;
use tern_types::{Extra, LeafHash, LeafRecord, LogLeaf, RecordStatus};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::outcome::{GetOutcome, PutOutcome, WaitOutcome};

/// Coordinator tuning. Passed explicitly to [`Coordinator::new`]; there is
/// no ambient process state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long `wait` sleeps between polls of the log.
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// What one polling round of `wait` observed.
enum Observation {
    /// Inclusion proven under the given tree size.
    Proven { leaf_index: u64, tree_size: u64 },
    /// Not provable yet; carries the lifecycle status reached so far.
    NotYet(RecordStatus),
}

/// Drives records through the submit → sequence → prove lifecycle.
///
/// Holds no per-request state: every operation derives what it needs from
/// the record it is given, so put/get/wait for the same record may run
/// concurrently (an optimistic `wait` can start before its `put`'s RPC has
/// returned), and operations for different records are fully independent.
/// The shared [`LogClient`] is the only common resource and must tolerate
/// concurrent use, which its `Send + Sync` bound guarantees.
#[derive(Clone)]
pub struct Coordinator {
    client: Arc<dyn LogClient>,
    config: EngineConfig,
}

impl Coordinator {
    /// Create a coordinator over a shared log client.
    pub fn new(client: Arc<dyn LogClient>, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// Encode, hash, and submit a record for inclusion.
    ///
    /// Idempotent: a duplicate of an already-submitted record reports
    /// [`PutOutcome::AlreadyExists`], which is success: the log
    /// deduplicates by leaf hash. Transient RPC failures surface to the
    /// caller, who may simply put again.
    pub async fn put(&self, record: &LeafRecord, extra: &Extra) -> Result<PutOutcome, EngineError> {
        record.validate()?;

        let leaf = LogLeaf::encode(record, extra);
        let leaf_hash = tern_merkle::hash_leaf(&leaf.leaf_value);
        debug!(%leaf_hash, "submitting leaf");

        match self.client.append(leaf).await? {
            AppendOutcome::Accepted => {
                info!(%leaf_hash, "leaf accepted by the log");
                Ok(PutOutcome::Accepted)
            }
            AppendOutcome::AlreadyExists => {
                info!(%leaf_hash, "leaf already present in the log");
                Ok(PutOutcome::AlreadyExists)
            }
        }
    }

    /// Look a record up by its leaf hash.
    ///
    /// [`GetOutcome::Pending`] means the log has not sequenced the leaf yet.
    /// Expected shortly after a put, and safe to retry.
    pub async fn get(&self, record: &LeafRecord) -> Result<GetOutcome, EngineError> {
        record.validate()?;

        let leaf_hash = tern_merkle::hash_leaf(&record.canonical_bytes());
        match self.client.fetch_by_hash(leaf_hash).await? {
            Some(sequenced) => {
                debug!(%leaf_hash, leaf_index = sequenced.leaf_index, "leaf retrieved");
                Ok(GetOutcome::Sequenced {
                    leaf_index: sequenced.leaf_index,
                })
            }
            None => {
                debug!(%leaf_hash, "leaf not sequenced yet");
                Ok(GetOutcome::Pending)
            }
        }
    }

    /// Poll the log until the record is provably included, the deadline
    /// expires, or a fatal error occurs.
    ///
    /// Each round fetches the latest root, resolves the leaf's index if still
    /// unknown, and asks for an inclusion proof under that root. "Not yet"
    /// (an unsequenced leaf, a root that predates it, a missing proof) is
    /// ordinary latency: the coordinator sleeps one poll interval and tries
    /// again, indefinitely when no deadline is given. So are transient RPC
    /// errors. A proof that fails verification, structurally or by root
    /// mismatch, is fatal and is never retried; so is a permanent RPC error
    /// or a tree-size regression.
    ///
    /// Cancellation is cooperative: the returned future suspends only at
    /// `.await` points and spawns nothing, so dropping it (or racing it
    /// against a select arm) aborts the poll loop without leaking work.
    pub async fn wait(
        &self,
        record: &LeafRecord,
        deadline: Option<Duration>,
    ) -> Result<WaitOutcome, EngineError> {
        record.validate()?;

        let leaf_hash = tern_merkle::hash_leaf(&record.canonical_bytes());
        let expires_at = deadline.map(|d| Instant::now() + d);

        let mut leaf_index: Option<u64> = None;
        let mut highest_size: u64 = 0;
        let mut status = RecordStatus::Pending;

        loop {
            match self
                .observe(leaf_hash, &mut leaf_index, &mut highest_size)
                .await
            {
                Ok(Observation::Proven {
                    leaf_index,
                    tree_size,
                }) => {
                    info!(%leaf_hash, leaf_index, tree_size, "inclusion verified");
                    return Ok(WaitOutcome::Verified {
                        leaf_index,
                        tree_size,
                    });
                }
                Ok(Observation::NotYet(observed)) => {
                    debug!(%leaf_hash, status = %observed, "not provable yet");
                    status = observed;
                }
                Err(EngineError::Log(e)) if e.is_transient() => {
                    warn!(%leaf_hash, error = %e, "transient log error, will retry");
                }
                Err(e) => {
                    error!(
                        %leaf_hash,
                        error = %e,
                        integrity = e.is_integrity(),
                        "wait failed"
                    );
                    return Err(e);
                }
            }

            // Stop cleanly rather than oversleep past the deadline.
            if let Some(at) = expires_at {
                if Instant::now() + self.config.poll_interval >= at {
                    debug!(%leaf_hash, status = %status, "deadline reached while polling");
                    return Ok(WaitOutcome::DeadlineExpired { status });
                }
            }

            sleep(self.config.poll_interval).await;
        }
    }

    /// One polling round: root → index → proof → verification.
    async fn observe(
        &self,
        leaf_hash: LeafHash,
        leaf_index: &mut Option<u64>,
        highest_size: &mut u64,
    ) -> Result<Observation, EngineError> {
        let root = self.client.fetch_root().await?;

        // An append-only tree never shrinks. Observing it shrink within one
        // wait means the log forked or rolled back.
        if root.tree_size < *highest_size {
            return Err(EngineError::TreeSizeRegression {
                observed: *highest_size,
                reported: root.tree_size,
            });
        }
        *highest_size = root.tree_size;

        // A leaf index, once learned, is fixed for the life of the leaf.
        let index = match *leaf_index {
            Some(index) => index,
            None => match self.client.fetch_by_hash(leaf_hash).await? {
                Some(sequenced) => {
                    debug!(%leaf_hash, leaf_index = sequenced.leaf_index, "leaf sequenced");
                    *leaf_index = Some(sequenced.leaf_index);
                    sequenced.leaf_index
                }
                None => return Ok(Observation::NotYet(RecordStatus::Pending)),
            },
        };

        if index >= root.tree_size {
            // Sequenced, but the fetched root predates the leaf.
            return Ok(Observation::NotYet(RecordStatus::Sequenced));
        }

        let proof = match self.client.fetch_proof(index, root.tree_size).await? {
            Some(proof) => proof,
            None => return Ok(Observation::NotYet(RecordStatus::Sequenced)),
        };

        let outcome = verify_inclusion(
            &leaf_hash,
            index,
            root.tree_size,
            &proof.audit_path,
            &root.root_hash,
        )?;

        if !outcome.verified {
            return Err(EngineError::RootMismatch {
                computed: outcome.computed_root,
                expected: root.root_hash,
            });
        }

        Ok(Observation::Proven {
            leaf_index: index,
            tree_size: root.tree_size,
        })
    }
}
