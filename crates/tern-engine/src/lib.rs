//! The request coordinator: put / get / wait against a verifiable log.
//!
//! The coordinator hides the log's asynchronous sequencing behind three
//! operations:
//!
//! - **put** — encode, hash, and submit a record (idempotent),
//! - **get** — look the record up by hash, reporting its assigned index
//!   once sequenced,
//! - **wait** — poll until the record is provably included under a current
//!   root and the proof verifies, or a deadline expires.
//!
//! A record moves submitted → pending → sequenced → verified, or to the
//! terminal failed state on a permanent or integrity error. Verification
//! failures are never retried: they signal a compromised or buggy log, not
//! latency.

mod coordinator;
mod error;
mod outcome;

#[cfg(test)]
mod tests;

pub use coordinator::{Coordinator, EngineConfig};
pub use error::EngineError;
pub use outcome::{GetOutcome, PutOutcome, WaitOutcome};
