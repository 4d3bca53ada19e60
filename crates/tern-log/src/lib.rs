//! Client interface to the external log service.
//!
//! This crate defines the [`LogClient`] trait (the four operations this
//! system consumes from a verifiable-log server) along with two in-process
//! implementations:
//!
//! - [`MemoryLog`] — a correct reference log with staged sequencing, used by
//!   tests and the demo command.
//! - [`FlakyLog`] — a wrapper that injects latency and transient failures.

mod error;
mod flaky_log;
mod memory_log;
mod traits;

pub use error::LogError;
pub use flaky_log::FlakyLog;
pub use memory_log::MemoryLog;
pub use traits::{AppendOutcome, LogClient};
