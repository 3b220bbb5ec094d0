//! Constraint module - typed logical relations among claims

use serde::{Deserialize, Serialize};

use crate::ClaimId;

/// The kind of logical relation a constraint declares.
///
/// Each kind compiles to boolean clauses in the solver layer:
/// mutual exclusion to pairwise negative clauses, implication to a single
/// binary clause, observations and requires-all to unit clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// At most one of the member claims may hold
    MutualExclusion,

    /// The first member implies the second
    Implication,

    /// The single member was directly observed to hold (or not)
    Observation {
        /// Whether the observation affirms or denies the claim
        holds: bool,
    },

    /// Every member claim must hold
    RequiresAll,
}

impl ConstraintKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::MutualExclusion => "mutual_exclusion",
            ConstraintKind::Implication => "implication",
            ConstraintKind::Observation { .. } => "observation",
            ConstraintKind::RequiresAll => "requires_all",
        }
    }
}

/// A typed relation over an ordered list of claim ids.
///
/// Constraints are immutable once created. A constraint participates in
/// solving only while every referenced claim is active or confirmed; the
/// encoder silently skips it otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Relation kind
    pub kind: ConstraintKind,

    /// Ordered member claim ids (order matters for implication)
    pub claims: Vec<ClaimId>,

    /// Why this relation was declared
    pub rationale: String,

    /// When this constraint was declared (seconds since Unix epoch)
    pub created_at: u64,
}

impl Constraint {
    /// Create a new constraint, validating member arity for the kind.
    ///
    /// Mutual exclusion needs at least two members, implication exactly
    /// two, an observation exactly one, and requires-all at least one.
    ///
    /// # Examples
    ///
    /// ```
    /// use dialectic_domain::{Constraint, ConstraintKind, ClaimId};
    ///
    /// let c = Constraint::new(
    ///     ConstraintKind::Implication,
    ///     vec![ClaimId::new("a"), ClaimId::new("b")],
    ///     "a entails b",
    ///     0,
    /// ).unwrap();
    /// assert_eq!(c.claims.len(), 2);
    /// ```
    pub fn new(
        kind: ConstraintKind,
        claims: Vec<ClaimId>,
        rationale: impl Into<String>,
        created_at: u64,
    ) -> Result<Self, String> {
        let arity_ok = match kind {
            ConstraintKind::MutualExclusion => claims.len() >= 2,
            ConstraintKind::Implication => claims.len() == 2,
            ConstraintKind::Observation { .. } => claims.len() == 1,
            ConstraintKind::RequiresAll => !claims.is_empty(),
        };
        if !arity_ok {
            return Err(format!(
                "{} constraint cannot be declared over {} claim(s)",
                kind.as_str(),
                claims.len()
            ));
        }

        Ok(Self {
            kind,
            claims,
            rationale: rationale.into(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ClaimId> {
        names.iter().map(|n| ClaimId::new(*n)).collect()
    }

    #[test]
    fn test_arity_validation() {
        assert!(Constraint::new(ConstraintKind::MutualExclusion, ids(&["a"]), "", 0).is_err());
        assert!(Constraint::new(ConstraintKind::MutualExclusion, ids(&["a", "b"]), "", 0).is_ok());

        assert!(Constraint::new(ConstraintKind::Implication, ids(&["a", "b", "c"]), "", 0).is_err());
        assert!(Constraint::new(ConstraintKind::Implication, ids(&["a", "b"]), "", 0).is_ok());

        assert!(
            Constraint::new(ConstraintKind::Observation { holds: true }, ids(&["a", "b"]), "", 0)
                .is_err()
        );
        assert!(
            Constraint::new(ConstraintKind::Observation { holds: false }, ids(&["a"]), "", 0)
                .is_ok()
        );

        assert!(Constraint::new(ConstraintKind::RequiresAll, ids(&[]), "", 0).is_err());
        assert!(Constraint::new(ConstraintKind::RequiresAll, ids(&["a"]), "", 0).is_ok());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ConstraintKind::MutualExclusion.as_str(), "mutual_exclusion");
        assert_eq!(ConstraintKind::Observation { holds: true }.as_str(), "observation");
    }
}
