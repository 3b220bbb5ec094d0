//! Branch module - forked hypothetical continuations over contested claims

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ClaimId;

/// Unique identifier for a branch.
///
/// Branch ids are derived from the contested claim id and the assumed
/// truth value (`<claim>_TRUE` / `<claim>_FALSE`), so a fork's two
/// siblings are addressable without a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    /// Derive the branch id for a claim under an assumed truth value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dialectic_domain::{BranchId, ClaimId};
    ///
    /// let id = BranchId::for_assumption(&ClaimId::new("bare_metal"), true);
    /// assert_eq!(id.as_str(), "bare_metal_TRUE");
    /// ```
    pub fn for_assumption(claim: &ClaimId, assumed: bool) -> Self {
        let suffix = if assumed { "TRUE" } else { "FALSE" };
        Self(format!("{}_{}", claim.as_str(), suffix))
    }

    /// Wrap a caller-supplied branch id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    /// Hypothesis still open
    Active,

    /// Won the merge; its assumption became the claim's resolution
    Merged,

    /// Lost the merge; kept for history, never reactivated
    Counterfactual,
}

impl BranchStatus {
    /// Get the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchStatus::Active => "active",
            BranchStatus::Merged => "merged",
            BranchStatus::Counterfactual => "counterfactual",
        }
    }
}

/// A forked hypothesis over a contested claim.
///
/// Each fork produces two sibling branches, one per assumed truth value,
/// both recording the ledger head hash at fork time so the hypothesis is
/// anchored to a verifiable point in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique identifier
    pub id: BranchId,

    /// The contested claim this branch hypothesizes about
    pub claim: ClaimId,

    /// The truth value this branch assumes for the claim
    pub assumed: bool,

    /// Ledger head hash at fork time
    pub parent_hash: String,

    /// Why the fork was created
    pub reason: String,

    /// Lifecycle status
    pub status: BranchStatus,

    /// When this branch was forked (seconds since Unix epoch)
    pub created_at: u64,
}

impl Branch {
    /// Create a new active branch.
    pub fn new(
        claim: ClaimId,
        assumed: bool,
        parent_hash: impl Into<String>,
        reason: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: BranchId::for_assumption(&claim, assumed),
            claim,
            assumed,
            parent_hash: parent_hash.into(),
            reason: reason.into(),
            status: BranchStatus::Active,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_ids() {
        let claim = ClaimId::new("kvm_detected");
        assert_eq!(
            BranchId::for_assumption(&claim, true).as_str(),
            "kvm_detected_TRUE"
        );
        assert_eq!(
            BranchId::for_assumption(&claim, false).as_str(),
            "kvm_detected_FALSE"
        );
    }

    #[test]
    fn test_new_branch_starts_active() {
        let b = Branch::new(ClaimId::new("x"), true, "deadbeef", "contested", 10);
        assert_eq!(b.status, BranchStatus::Active);
        assert_eq!(b.id.as_str(), "x_TRUE");
        assert!(b.assumed);
    }
}
