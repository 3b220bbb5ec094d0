//! Contradiction outcomes - unsat cores and discriminating tests

use serde::{Deserialize, Serialize};

use crate::ClaimId;

/// A structured descriptor of the experiment that would discriminate a
/// detected conflict.
///
/// This is pure data: the engine describes what observation would settle
/// the contradiction, and an external collaborator decides whether and how
/// to run it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscriminatingTest {
    /// Core has fewer than two members: verify the claim directly.
    DirectVerification {
        /// The claim to verify
        claim: ClaimId,
        /// The claim's own falsifier, when one was recorded
        falsifier: Option<String>,
    },

    /// Core has two or more members: test the strongest pair against the
    /// weakest member.
    CompetingHypotheses {
        /// Highest-trust member of the core
        hypothesis_a: ClaimId,
        /// Second-highest-trust member
        hypothesis_b: ClaimId,
        /// Lowest-trust member - most likely wrong, most informative to test
        stress_target: ClaimId,
        /// Human-readable description of the discriminating observation
        procedure: String,
    },
}

/// A minimal jointly-unsatisfiable subset of the claim set.
///
/// Minimality is local: removing any single member makes the remainder
/// satisfiable, but a smaller core may exist elsewhere in the clause set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsatCore {
    /// Implicated claim ids, in deterministic (sorted) order
    pub claims: Vec<ClaimId>,

    /// Trust-variance-weighted disagreement among the members
    pub divergence: f64,

    /// The synthesized experiment that would resolve the conflict
    pub test: DiscriminatingTest,
}

impl UnsatCore {
    /// Whether a claim is implicated in this core.
    pub fn implicates(&self, id: &ClaimId) -> bool {
        self.claims.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicates() {
        let core = UnsatCore {
            claims: vec![ClaimId::new("a"), ClaimId::new("b")],
            divergence: 0.1,
            test: DiscriminatingTest::DirectVerification {
                claim: ClaimId::new("a"),
                falsifier: None,
            },
        };
        assert!(core.implicates(&ClaimId::new("a")));
        assert!(!core.implicates(&ClaimId::new("c")));
    }
}
