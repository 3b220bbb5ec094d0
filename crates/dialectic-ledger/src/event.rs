//! Ledger event records

use std::fmt;

use serde::{Deserialize, Serialize};

use dialectic_domain::hash::sha256_hex;

/// Unique identifier for a ledger event, based on UUIDv7.
///
/// UUIDv7 gives chronological sortability and coordination-free
/// generation. The id is a local handle only: it is not covered by the
/// chain hash, which binds exactly (kind, payload, timestamp, prev_hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(uuid::Uuid);

impl EventId {
    /// Generate a new UUIDv7-based EventId.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every mutation the engine can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A claim was asserted
    ClaimAsserted,

    /// A claim was asserted with an implicit affirming observation
    ObservationRecorded,

    /// A constraint was declared
    ConstraintDeclared,

    /// A claim's trust score was explicitly adjusted
    TrustAdjusted,

    /// The consistency pipeline detected an unsat core
    ContradictionDetected,

    /// A claim was quarantined by the contradiction pipeline
    ClaimQuarantined,

    /// A contested claim was forked into sibling branches
    BranchForked,

    /// A branch won its merge
    BranchMerged,

    /// A claim was irreversibly confirmed by a merge
    ClaimConfirmed,

    /// A claim was irreversibly refuted by a merge
    ClaimRefuted,

    /// A consistency check completed without finding a contradiction
    ConsistencyVerified,
}

impl EventKind {
    /// Get the kind name as it appears in exported records.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ClaimAsserted => "claim_asserted",
            EventKind::ObservationRecorded => "observation_recorded",
            EventKind::ConstraintDeclared => "constraint_declared",
            EventKind::TrustAdjusted => "trust_adjusted",
            EventKind::ContradictionDetected => "contradiction_detected",
            EventKind::ClaimQuarantined => "claim_quarantined",
            EventKind::BranchForked => "branch_forked",
            EventKind::BranchMerged => "branch_merged",
            EventKind::ClaimConfirmed => "claim_confirmed",
            EventKind::ClaimRefuted => "claim_refuted",
            EventKind::ConsistencyVerified => "consistency_verified",
        }
    }
}

/// One hash-linked history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Local event identifier (not covered by the chain hash)
    pub id: EventId,

    /// What happened
    #[serde(rename = "event_type")]
    pub kind: EventKind,

    /// Structured event payload
    pub payload: serde_json::Value,

    /// When the event was appended (seconds since Unix epoch)
    pub timestamp: u64,

    /// Lowercase-hex SHA-256 over (kind, canonical payload, timestamp,
    /// previous hash)
    pub hash: String,

    /// Hash of the predecessor event, or the genesis sentinel
    pub prev_hash: String,
}

impl LedgerEvent {
    /// Compute the chain hash for an event's constituents.
    ///
    /// The payload enters the digest in its canonical JSON encoding
    /// (object keys sorted, no insignificant whitespace), which is what
    /// `serde_json` produces for its default map representation.
    pub fn compute_hash(
        kind: EventKind,
        payload: &serde_json::Value,
        timestamp: u64,
        prev_hash: &str,
    ) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_string(payload)?;
        let preimage = format!("{}\n{}\n{}\n{}", kind.as_str(), canonical, timestamp, prev_hash);
        Ok(sha256_hex(preimage.as_bytes()))
    }

    /// Recompute this event's hash from its stored constituents.
    pub fn recompute_hash(&self) -> Result<String, serde_json::Error> {
        Self::compute_hash(self.kind, &self.payload, self.timestamp, &self.prev_hash)
    }
}
