//! Tests for put and get.

use std::sync::Arc;

use tern_log::{LogError, MemoryLog};

use super::{BrokenLog, coordinator, extra, record};
use crate::error::EngineError;
use crate::outcome::{GetOutcome, PutOutcome};

#[tokio::test]
async fn test_put_accepts_new_record() {
    let log = Arc::new(MemoryLog::new());
    let coordinator = coordinator(log.clone());

    let outcome = coordinator.put(&record("a"), &extra()).await.unwrap();
    assert_eq!(outcome, PutOutcome::Accepted);
    assert_eq!(outcome.status_str(), "ok");
}

#[tokio::test]
async fn test_put_is_idempotent() {
    let log = Arc::new(MemoryLog::sequencing_instantly());
    let coordinator = coordinator(log.clone());

    let first = coordinator.put(&record("a"), &extra()).await.unwrap();
    let second = coordinator.put(&record("a"), &extra()).await.unwrap();

    assert_eq!(first, PutOutcome::Accepted);
    assert_eq!(second, PutOutcome::AlreadyExists);
    assert_eq!(second.status_str(), "exists");

    // Exactly one leaf, at exactly one index.
    assert_eq!(log.tree_size(), 1);
    let get = coordinator.get(&record("a")).await.unwrap();
    assert_eq!(get, GetOutcome::Sequenced { leaf_index: 0 });
}

#[tokio::test]
async fn test_put_rejects_empty_record_locally() {
    let log = Arc::new(MemoryLog::new());
    let coordinator = coordinator(log.clone());

    let err = coordinator.put(&record(""), &extra()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(log.tree_size(), 0, "invalid record must never reach the log");
}

#[tokio::test]
async fn test_put_surfaces_transient_error() {
    // put does not retry internally; the caller may simply put again.
    let broken = Arc::new(BrokenLog::new(LogError::Unavailable("down".into())));
    let coordinator = coordinator(broken.clone());

    let err = coordinator.put(&record("a"), &extra()).await.unwrap_err();
    assert!(matches!(err, EngineError::Log(e) if e.is_transient()));
    assert_eq!(broken.calls(), 1);
}

#[tokio::test]
async fn test_get_pending_until_sequenced() {
    let log = Arc::new(MemoryLog::new());
    let coordinator = coordinator(log.clone());

    coordinator.put(&record("a"), &extra()).await.unwrap();
    assert_eq!(
        coordinator.get(&record("a")).await.unwrap(),
        GetOutcome::Pending,
        "still pending while the sequencer hasn't run"
    );

    log.advance();
    assert_eq!(
        coordinator.get(&record("a")).await.unwrap(),
        GetOutcome::Sequenced { leaf_index: 0 }
    );
}

#[tokio::test]
async fn test_get_unknown_record_is_pending() {
    // A record nobody ever put is indistinguishable from a not-yet-sequenced
    // one; both answer pending.
    let coordinator = coordinator(Arc::new(MemoryLog::new()));
    assert_eq!(
        coordinator.get(&record("never-put")).await.unwrap(),
        GetOutcome::Pending
    );
}

#[tokio::test]
async fn test_get_surfaces_permanent_error() {
    let broken = Arc::new(BrokenLog::new(LogError::Rejected("nope".into())));
    let coordinator = coordinator(broken.clone());

    let err = coordinator.get(&record("a")).await.unwrap_err();
    assert!(matches!(err, EngineError::Log(e) if !e.is_transient()));
}

#[tokio::test]
async fn test_indices_are_stable_across_growth() {
    let log = Arc::new(MemoryLog::sequencing_instantly());
    let coordinator = coordinator(log.clone());

    coordinator.put(&record("a"), &extra()).await.unwrap();
    coordinator.put(&record("b"), &extra()).await.unwrap();
    let before = coordinator.get(&record("a")).await.unwrap();

    for name in ["c", "d", "e"] {
        coordinator.put(&record(name), &extra()).await.unwrap();
    }
    let after = coordinator.get(&record("a")).await.unwrap();

    assert_eq!(before, after, "an assigned index never changes");
}
