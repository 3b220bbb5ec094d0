//! Constraint-to-clause compilation

use dialectic_domain::{ClaimId, Constraint, ConstraintKind};

use crate::vars::VarMap;

/// A disjunction of signed literals, tagged with the index of the
/// constraint it was compiled from.
///
/// Positive literals assert the mapped claim, negative literals deny it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Signed literals; every `|literal|` is a mapped variable
    pub literals: Vec<i32>,

    /// Index of the originating constraint in the encoder's input slice
    pub constraint: usize,
}

/// The result of compiling a constraint set.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// Compiled clauses, in constraint order
    pub clauses: Vec<Clause>,

    /// Number of variables the clause set may reference
    pub var_count: usize,
}

/// Compile constraints into clauses over the claims that currently
/// participate in solving.
///
/// `participates` answers whether a claim id is active or confirmed; any
/// constraint referencing a claim that does not participate (unknown or
/// quarantined/refuted) is silently skipped - that is how quarantine
/// removes a claim from future search without erasing history.
///
/// Encoding is stateless per call: the clause set is recomputed in full so
/// that it is always correct against the current claim set. Only the
/// variable mapping persists across calls.
///
/// Encoding rules:
/// - mutual exclusion over (a, b, ...) -> `{!a, !b}` for every pair
/// - implication (a, b) -> `{!a, b}`
/// - observation of a, holds -> `{a}`; does not hold -> `{!a}`
/// - requires-all over (a, b, ...) -> one unit clause per member
pub fn encode(
    constraints: &[Constraint],
    participates: impl Fn(&ClaimId) -> bool,
    vars: &mut VarMap,
) -> Encoding {
    let mut clauses = Vec::new();

    for (index, constraint) in constraints.iter().enumerate() {
        if !constraint.claims.iter().all(&participates) {
            continue;
        }

        match constraint.kind {
            ConstraintKind::MutualExclusion => {
                for (i, a) in constraint.claims.iter().enumerate() {
                    for b in &constraint.claims[i + 1..] {
                        let va = vars.var_for(a);
                        let vb = vars.var_for(b);
                        clauses.push(Clause {
                            literals: vec![-va, -vb],
                            constraint: index,
                        });
                    }
                }
            }
            ConstraintKind::Implication => {
                let va = vars.var_for(&constraint.claims[0]);
                let vb = vars.var_for(&constraint.claims[1]);
                clauses.push(Clause {
                    literals: vec![-va, vb],
                    constraint: index,
                });
            }
            ConstraintKind::Observation { holds } => {
                let v = vars.var_for(&constraint.claims[0]);
                let literal = if holds { v } else { -v };
                clauses.push(Clause {
                    literals: vec![literal],
                    constraint: index,
                });
            }
            ConstraintKind::RequiresAll => {
                for claim in &constraint.claims {
                    let v = vars.var_for(claim);
                    clauses.push(Clause {
                        literals: vec![v],
                        constraint: index,
                    });
                }
            }
        }
    }

    Encoding {
        clauses,
        var_count: vars.var_count(),
    }
}
