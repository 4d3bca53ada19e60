//! Error types for the coordinator.

use tern_log::LogError;
use tern_merkle::ProofError;
use tern_types::InvalidRecord;

/// Errors surfaced by coordinator operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The record was rejected locally and never sent to the log.
    #[error(transparent)]
    Validation(#[from] InvalidRecord),

    /// The log RPC layer failed.
    ///
    /// Transient variants are retried inside `wait`; when one escapes to the
    /// caller (from `put`/`get`, or a permanent variant anywhere) the
    /// operation as issued failed.
    #[error("log error: {0}")]
    Log(#[from] LogError),

    /// The log served a structurally malformed proof. Integrity failure.
    #[error("malformed inclusion proof: {0}")]
    Proof(#[from] ProofError),

    /// A well-formed proof recomputed to the wrong root. Integrity failure.
    #[error("inclusion proof does not match the trusted root")]
    RootMismatch {
        /// Root recomputed from the leaf hash and audit path.
        computed: [u8; 32],
        /// The trusted root the proof was checked against.
        expected: [u8; 32],
    },

    /// The log reported a smaller tree than previously observed.
    ///
    /// An append-only log can never shrink; a regression means a forked or
    /// rolled-back log. Integrity failure.
    #[error("log tree size regressed from {observed} to {reported}")]
    TreeSizeRegression {
        /// Largest tree size observed during this operation.
        observed: u64,
        /// The smaller size the log just reported.
        reported: u64,
    },
}

impl EngineError {
    /// Whether this error indicates a compromised or buggy log rather than
    /// ordinary latency or a bad request.
    ///
    /// Integrity failures are terminal and must never be retried.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::Proof(_) | Self::RootMismatch { .. } | Self::TreeSizeRegression { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_classification() {
        assert!(EngineError::Proof(ProofError::EmptyTree).is_integrity());
        assert!(
            EngineError::RootMismatch {
                computed: [0; 32],
                expected: [1; 32],
            }
            .is_integrity()
        );
        assert!(
            EngineError::TreeSizeRegression {
                observed: 5,
                reported: 3,
            }
            .is_integrity()
        );
        assert!(!EngineError::Log(LogError::TimedOut).is_integrity());
        assert!(!EngineError::Validation(InvalidRecord("empty leaf value")).is_integrity());
    }
}
