//! Caller-facing outcomes of coordinator operations.

use tern_types::{RecordStatus, Response};

/// Result of a successful `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The log queued the leaf for sequencing.
    Accepted,
    /// The log already held a leaf with the same value. Still success;
    /// submission is idempotent.
    AlreadyExists,
}

impl PutOutcome {
    /// Status string of the wire contract.
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Accepted => "ok",
            Self::AlreadyExists => "exists",
        }
    }

    /// Convert into the minimal wire response.
    pub fn into_response(self) -> Response {
        Response::new(self.status_str())
    }
}

/// Result of a successful `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetOutcome {
    /// The leaf is retrievable at its assigned position.
    Sequenced {
        /// The leaf's fixed position in the tree.
        leaf_index: u64,
    },
    /// The log has not sequenced the leaf yet. Safe to retry.
    Pending,
}

impl GetOutcome {
    /// Status string of the wire contract.
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Sequenced { .. } => "ok",
            Self::Pending => "pending",
        }
    }

    /// Convert into the minimal wire response.
    pub fn into_response(self) -> Response {
        Response::new(self.status_str())
    }
}

/// Result of a `wait` that terminated without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Inclusion was proven against a trusted root. Terminal.
    Verified {
        /// The leaf's fixed position in the tree.
        leaf_index: u64,
        /// Size of the tree the proof was verified under.
        tree_size: u64,
    },
    /// The deadline expired before inclusion could be proven. Safe to call
    /// `wait` again.
    DeadlineExpired {
        /// Where the record stood when polling stopped.
        status: RecordStatus,
    },
}

impl WaitOutcome {
    /// Status string of the wire contract.
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Verified { .. } => "ok",
            Self::DeadlineExpired { .. } => "pending",
        }
    }

    /// Convert into the minimal wire response.
    pub fn into_response(self) -> Response {
        Response::new(self.status_str())
    }
}
