//! Claim module - the fundamental unit of Dialectic's belief state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::sha256_hex;
use crate::provenance::ProvenanceEntry;
use crate::trust::TrustScore;

/// Unique identifier for a claim.
///
/// Claim ids are caller-supplied strings (for example `"kvm_detected"`);
/// uniqueness is enforced locally by the engine rather than globally
/// generated. The newtype keeps claim ids from being confused with branch
/// ids or free-form content at compile time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Wrap a caller-supplied identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use dialectic_domain::ClaimId;
    ///
    /// let id = ClaimId::new("bare_metal");
    /// assert_eq!(id.as_str(), "bare_metal");
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lifecycle status of a claim.
///
/// Status only ever advances along
/// `Active → Quarantined → {Confirmed, Refuted, Counterfactual}`;
/// the three right-hand states are terminal. The contradiction pipeline is
/// the only writer of `Quarantined`, and a branch merge is the only writer
/// of `Confirmed` / `Refuted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Participating in consistency checks
    Active,

    /// Implicated in a contradiction; excluded from future search
    Quarantined,

    /// Resolved true by a branch merge (terminal)
    Confirmed,

    /// Resolved false by a branch merge (terminal)
    Refuted,

    /// Invalidated as a losing hypothesis (terminal)
    Counterfactual,
}

impl ClaimStatus {
    /// Get the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Active => "active",
            ClaimStatus::Quarantined => "quarantined",
            ClaimStatus::Confirmed => "confirmed",
            ClaimStatus::Refuted => "refuted",
            ClaimStatus::Counterfactual => "counterfactual",
        }
    }

    /// Whether this status admits no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Confirmed | ClaimStatus::Refuted | ClaimStatus::Counterfactual
        )
    }

    /// Whether a claim in this status participates in constraint encoding.
    ///
    /// Only active and confirmed claims take part in solving; quarantine
    /// removes a claim from future search without erasing its history.
    pub fn participates_in_solving(&self) -> bool {
        matches!(self, ClaimStatus::Active | ClaimStatus::Confirmed)
    }

    /// Whether the lifecycle permits advancing from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dialectic_domain::ClaimStatus;
    ///
    /// assert!(ClaimStatus::Active.can_advance_to(ClaimStatus::Quarantined));
    /// assert!(ClaimStatus::Quarantined.can_advance_to(ClaimStatus::Refuted));
    /// assert!(!ClaimStatus::Refuted.can_advance_to(ClaimStatus::Active));
    /// ```
    pub fn can_advance_to(&self, next: ClaimStatus) -> bool {
        match (self, next) {
            (ClaimStatus::Active, ClaimStatus::Quarantined) => true,
            (ClaimStatus::Quarantined, ClaimStatus::Confirmed)
            | (ClaimStatus::Quarantined, ClaimStatus::Refuted)
            | (ClaimStatus::Quarantined, ClaimStatus::Counterfactual) => true,
            _ => false,
        }
    }
}

/// A claim - an asserted proposition with provenance and a trust weight.
///
/// Claims are created on ingestion and never deleted. The trust score is
/// mutated only by explicit adjustment, and the status only by the
/// contradiction pipeline or a branch merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier (caller-supplied)
    pub id: ClaimId,

    /// Proposition text
    pub content: String,

    /// Where the claim came from (e.g. "probe:cpuid", "operator")
    pub source: String,

    /// Trust weight in [0, 1]
    pub trust: TrustScore,

    /// Lifecycle status
    pub status: ClaimStatus,

    /// History of how this claim was produced and touched
    pub provenance: Vec<ProvenanceEntry>,

    /// Lowercase-hex SHA-256 digest of the content text
    pub content_hash: String,

    /// What observation would falsify this claim, if known
    pub falsifier: Option<String>,

    /// Supporting evidence references
    pub evidence: Vec<String>,

    /// When this claim was asserted (seconds since Unix epoch)
    pub created_at: u64,
}

impl Claim {
    /// Create a new active claim.
    ///
    /// The content hash is computed here so that every constructed claim
    /// carries it; callers never supply it.
    pub fn new(
        id: ClaimId,
        content: impl Into<String>,
        source: impl Into<String>,
        trust: TrustScore,
        falsifier: Option<String>,
        evidence: Vec<String>,
        created_at: u64,
    ) -> Self {
        let content = content.into();
        let content_hash = sha256_hex(content.as_bytes());
        Self {
            id,
            content,
            source: source.into(),
            trust,
            status: ClaimStatus::Active,
            provenance: Vec::new(),
            content_hash,
            falsifier,
            evidence,
            created_at,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = ClaimStatus> {
        prop_oneof![
            Just(ClaimStatus::Active),
            Just(ClaimStatus::Quarantined),
            Just(ClaimStatus::Confirmed),
            Just(ClaimStatus::Refuted),
            Just(ClaimStatus::Counterfactual),
        ]
    }

    proptest! {
        /// Property: no transition ever leaves a terminal status
        #[test]
        fn test_terminal_states_are_absorbing(from in any_status(), to in any_status()) {
            if from.is_terminal() {
                prop_assert!(!from.can_advance_to(to));
            }
        }

        /// Property: every legal transition moves strictly forward
        /// (its target is never a state the lifecycle already passed)
        #[test]
        fn test_no_backward_transition(from in any_status(), to in any_status()) {
            if from.can_advance_to(to) {
                prop_assert!(to != ClaimStatus::Active);
                prop_assert!(from != to);
            }
        }
    }
}
