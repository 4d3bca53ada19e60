//! A [`LogClient`] wrapper that injects latency and transient failures.
//!
//! `FlakyLog` wraps any `Arc<dyn LogClient>`, sleeps for a random duration
//! before each operation, and can be scripted to fail the next N calls with
//! a transient error. The RNG is seeded for reproducible test runs.
//!
//! # Example
//!
//! ```ignore
//! let flaky = FlakyLog::new(inner)
//!     .latency(5, 20) // 5–20 ms per call
//!     .seed(42);
//! flaky.fail_next(3); // next 3 calls return Unavailable
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tern_types::{InclusionProof, LeafHash, LogLeaf, SequencedLeaf, SignedLogRoot};

use crate::error::LogError;
use crate::traits::{AppendOutcome, LogClient};

/// A [`LogClient`] wrapper injecting random latency and scripted failures.
///
/// Useful for exercising the coordinator's retry behavior against conditions
/// an instant in-memory log never produces.
pub struct FlakyLog {
    inner: Arc<dyn LogClient>,
    latency_ms: (u64, u64),
    rng: Mutex<StdRng>,
    fail_next: AtomicU32,
}

impl FlakyLog {
    /// Wrap an existing client with zero latency and no failures.
    pub fn new(inner: Arc<dyn LogClient>) -> Self {
        Self {
            inner,
            latency_ms: (0, 0),
            rng: Mutex::new(StdRng::seed_from_u64(0)),
            fail_next: AtomicU32::new(0),
        }
    }

    /// Set the per-call latency range in milliseconds (uniform random).
    pub fn latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms, max_ms);
        self
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Make the next `n` operations fail with [`LogError::Unavailable`].
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Consume one scripted failure, if any remain.
    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Sleep for a random duration in the configured range.
    async fn delay(&self) {
        let (min, max) = self.latency_ms;

        if max == 0 {
            return;
        }

        let ms = if min == max {
            min
        } else {
            self.rng.lock().unwrap().random_range(min..=max)
        };

        if ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
        }
    }

    /// Shared preamble: scripted failure, then latency.
    async fn intercept(&self) -> Result<(), LogError> {
        if self.take_failure() {
            return Err(LogError::Unavailable("injected failure".into()));
        }
        self.delay().await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LogClient for FlakyLog {
    async fn append(&self, leaf: LogLeaf) -> Result<AppendOutcome, LogError> {
        self.intercept().await?;
        self.inner.append(leaf).await
    }

    async fn fetch_by_hash(&self, hash: LeafHash) -> Result<Option<SequencedLeaf>, LogError> {
        self.intercept().await?;
        self.inner.fetch_by_hash(hash).await
    }

    async fn fetch_root(&self) -> Result<SignedLogRoot, LogError> {
        self.intercept().await?;
        self.inner.fetch_root().await
    }

    async fn fetch_proof(
        &self,
        leaf_index: u64,
        tree_size: u64,
    ) -> Result<Option<InclusionProof>, LogError> {
        self.intercept().await?;
        self.inner.fetch_proof(leaf_index, tree_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_log::MemoryLog;
    use tern_types::{Extra, LeafRecord};

    fn leaf(name: &str) -> LogLeaf {
        LogLeaf::encode(&LeafRecord::new(name), &Extra::new("extra"))
    }

    #[tokio::test]
    async fn test_passthrough_when_not_failing() {
        let flaky = FlakyLog::new(Arc::new(MemoryLog::sequencing_instantly()));
        assert_eq!(
            flaky.append(leaf("a")).await.unwrap(),
            AppendOutcome::Accepted
        );
        let root = flaky.fetch_root().await.unwrap();
        assert_eq!(root.tree_size, 1);
    }

    #[tokio::test]
    async fn test_scripted_failures_then_recovery() {
        let flaky = FlakyLog::new(Arc::new(MemoryLog::sequencing_instantly()));
        flaky.fail_next(2);

        let first = flaky.fetch_root().await.unwrap_err();
        assert!(first.is_transient());
        let second = flaky.fetch_root().await.unwrap_err();
        assert!(second.is_transient());

        // Budget exhausted; calls pass through again.
        assert!(flaky.fetch_root().await.is_ok());
    }

    #[tokio::test]
    async fn test_failures_do_not_reach_inner_log() {
        let inner = Arc::new(MemoryLog::sequencing_instantly());
        let flaky = FlakyLog::new(inner.clone());
        flaky.fail_next(1);

        assert!(flaky.append(leaf("a")).await.is_err());
        assert_eq!(inner.tree_size(), 0, "failed call must not touch the log");
    }
}
