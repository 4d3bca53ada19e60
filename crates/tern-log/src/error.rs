//! Error types for log-service operations.

/// Errors surfaced by a [`LogClient`](crate::LogClient) operation.
///
/// The split that matters is transient vs permanent: transient errors are
/// ordinary distributed-system weather and safe to retry; permanent errors
/// mean the request itself is wrong and retrying it verbatim cannot help.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LogError {
    /// The log service could not be reached or is overloaded. Retryable.
    #[error("log unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete in time. Retryable.
    #[error("log operation timed out")]
    TimedOut,

    /// The log rejected the request as malformed. Not retryable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The log refused the request for a non-transient reason. Not retryable.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl LogError {
    /// Whether retrying the same request later can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::TimedOut)
    }
}
