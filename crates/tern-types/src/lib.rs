//! Shared types for the tern verifiable-log client.
//!
//! This crate defines the data model used across the tern workspace:
//! the caller-facing record types ([`LeafRecord`], [`Extra`]), the canonical
//! log encoding ([`LogLeaf`]), the leaf identity ([`LeafHash`]), the log's
//! commitments ([`SignedLogRoot`], [`InclusionProof`]), and the request
//! lifecycle ([`RecordStatus`]).

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Leaf identity
// ---------------------------------------------------------------------------

/// Domain-separated hash of a leaf's value, used as the leaf's identity for
/// lookup and proof verification.
///
/// A `LeafHash` is computed once, before submission, and never changes:
/// identical `leaf_value` bytes always produce the same hash. The hash
/// function itself lives in `tern-merkle`; this type only carries the result.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LeafHash([u8; 32]);

impl LeafHash {
    /// Return the raw 32-byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for LeafHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for LeafHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for LeafHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LeafHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeafHash({self})")
    }
}

// ---------------------------------------------------------------------------
// Caller-facing records
// ---------------------------------------------------------------------------

/// A caller-supplied record to be included in the log. Immutable once
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// The record's payload.
    pub name: String,
}

/// Opaque side-metadata attached to a record.
///
/// Stored alongside the leaf but never hashed; changing it does not change
/// the leaf's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// The metadata payload.
    pub name: String,
}

/// A record was rejected locally before reaching the log.
#[derive(Debug, thiserror::Error)]
#[error("invalid record: {0}")]
pub struct InvalidRecord(pub &'static str);

impl LeafRecord {
    /// Create a new record.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check the record is acceptable for submission.
    ///
    /// Malformed records are rejected here and never sent to the log.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.name.is_empty() {
            return Err(InvalidRecord("empty leaf value"));
        }
        Ok(())
    }
}

impl Extra {
    /// Create new side-metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// Canonical leaf encoding
// ---------------------------------------------------------------------------

/// The canonical encoding of a [`LeafRecord`] as accepted by the log.
///
/// `leaf_value` is what gets hashed; `extra_data` is stored by the log but
/// never influences the leaf's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLeaf {
    /// Canonical record bytes. Hashed.
    pub leaf_value: Bytes,
    /// Encoded side-metadata. Stored, never hashed.
    pub extra_data: Bytes,
}

/// Canonical form of a [`LeafRecord`] (what actually gets encoded).
///
/// Kept private so the wire encoding can only be produced through
/// [`LeafRecord::canonical_bytes`], which guarantees identical logical
/// records always yield byte-identical `leaf_value`.
#[derive(Serialize)]
struct CanonicalRecord<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CanonicalExtra<'a> {
    name: &'a str,
}

impl LeafRecord {
    /// The record's canonical byte form: exactly the bytes the log hashes.
    ///
    /// Computable without the side-metadata, so a caller can derive the
    /// leaf's identity before (or without ever) building a full [`LogLeaf`].
    pub fn canonical_bytes(&self) -> Bytes {
        Bytes::from(
            postcard::to_allocvec(&CanonicalRecord { name: &self.name })
                .expect("serialization should not fail"),
        )
    }
}

impl LogLeaf {
    /// Encode a record and its side-metadata into the canonical log leaf.
    ///
    /// Deterministic: the postcard encoding of the canonical form is stable,
    /// so equality of records implies equality of `leaf_value` bytes. The
    /// encoding is not required to be decodable; stability is the contract.
    pub fn encode(record: &LeafRecord, extra: &Extra) -> Self {
        let extra_data = postcard::to_allocvec(&CanonicalExtra { name: &extra.name })
            .expect("serialization should not fail");

        Self {
            leaf_value: record.canonical_bytes(),
            extra_data: Bytes::from(extra_data),
        }
    }
}

/// A leaf the log has sequenced, together with its assigned position.
///
/// The index is assigned once by the log and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedLeaf {
    /// The stored leaf.
    pub leaf: LogLeaf,
    /// The leaf's fixed position in the tree.
    pub leaf_index: u64,
}

// ---------------------------------------------------------------------------
// Log commitments
// ---------------------------------------------------------------------------

/// A log's signed commitment to a specific tree state.
///
/// The signature and timestamp are opaque to this client core: callers must
/// establish trust in the root through a channel of their own (a previously
/// verified root, gossip, a monitor). Successive roots from the same log have
/// non-decreasing `tree_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLogRoot {
    /// Root hash of the Merkle tree over the first `tree_size` leaves.
    pub root_hash: [u8; 32],
    /// Number of leaves incorporated into this root.
    pub tree_size: u64,
    /// When the root was issued (nanoseconds since the Unix epoch).
    pub timestamp_nanos: u64,
    /// The log's signature over the root. Opaque here.
    pub signature: Bytes,
}

/// An ordered list of sibling hashes proving one leaf's inclusion under a
/// specific root.
///
/// A proof binds to the exact `(leaf_index, tree_size)` pair it was issued
/// for; checking against a newer root requires a fresh proof, because the
/// tree's shape changes as it grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Position of the proven leaf.
    pub leaf_index: u64,
    /// Tree size the proof was computed for. Must exceed `leaf_index`.
    pub tree_size: u64,
    /// Sibling hashes, ordered from the leaf level towards the root.
    pub audit_path: Vec<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// Where a submitted record currently stands.
///
/// `Verified` and `Failed` are terminal; everything else can be re-observed
/// by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Accepted by the log, sequencing not yet observed.
    Submitted,
    /// Not yet retrievable; the log is still sequencing.
    Pending,
    /// Retrievable with an assigned leaf index, proof not yet verified.
    Sequenced,
    /// Inclusion proven against a trusted root.
    Verified,
    /// Verification failed or the log rejected the request. Fatal.
    Failed,
}

impl RecordStatus {
    /// Whether this status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Failed)
    }

    /// Stable lower-case name, used in logs and status responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Pending => "pending",
            Self::Sequenced => "sequenced",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal wire response: a bare status string.
///
/// Richer payloads are a future extension, not part of this core's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// One of `"ok"`, `"exists"`, `"pending"`, `"error"`.
    pub status: String,
}

impl Response {
    /// Build a response from a status string.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
