//! Greedy unsat-core minimization

use crate::dpll::solve;
use crate::encode::Clause;

/// Shrink an unsatisfiable clause set to a locally minimal subset.
///
/// Single left-to-right pass: each clause is tentatively dropped and the
/// remainder re-solved; the drop sticks if the remainder is still
/// unsatisfiable. The result is UNSAT and removing any one remaining
/// clause makes it SAT - local minimality, O(n) solver invocations.
///
/// This trades core size for speed: a globally smallest core may exist
/// elsewhere in the clause set, and a different clause-insertion order can
/// yield a different (equally minimal) core. Downstream tooling comparing
/// cores across runs must treat them as order-sensitive.
///
/// The caller is expected to pass an unsatisfiable clause set; on a
/// satisfiable input every drop is rejected and the full index range comes
/// back unchanged.
///
/// # Examples
///
/// ```
/// use dialectic_solver::{minimize, Clause};
///
/// // a, !a, b - the third clause is irrelevant to the conflict
/// let clauses = vec![
///     Clause { literals: vec![1], constraint: 0 },
///     Clause { literals: vec![-1], constraint: 1 },
///     Clause { literals: vec![2], constraint: 2 },
/// ];
/// assert_eq!(minimize(&clauses, 2), vec![0, 1]);
/// ```
pub fn minimize(clauses: &[Clause], var_count: usize) -> Vec<usize> {
    let mut kept: Vec<usize> = (0..clauses.len()).collect();

    for candidate in 0..clauses.len() {
        let trial: Vec<Clause> = kept
            .iter()
            .filter(|&&index| index != candidate)
            .map(|&index| clauses[index].clone())
            .collect();

        if !solve(&trial, var_count).is_sat() {
            kept.retain(|&index| index != candidate);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(literal_sets: &[&[i32]]) -> Vec<Clause> {
        literal_sets
            .iter()
            .enumerate()
            .map(|(constraint, literals)| Clause {
                literals: literals.to_vec(),
                constraint,
            })
            .collect()
    }

    #[test]
    fn test_irrelevant_clauses_are_dropped() {
        let cs = clauses(&[&[2], &[1], &[-1], &[2, 3]]);
        assert_eq!(minimize(&cs, 3), vec![1, 2]);
    }

    #[test]
    fn test_core_is_locally_minimal() {
        let cs = clauses(&[&[1], &[2], &[-1, -2], &[3]]);
        let core = minimize(&cs, 3);
        assert_eq!(core, vec![0, 1, 2]);

        // Removing any single kept clause makes the remainder satisfiable
        for dropped in &core {
            let remainder: Vec<Clause> = core
                .iter()
                .filter(|&index| index != dropped)
                .map(|&index| cs[index].clone())
                .collect();
            assert!(
                solve(&remainder, 3).is_sat(),
                "core not minimal: still UNSAT without clause {}",
                dropped
            );
        }
    }

    #[test]
    fn test_satisfiable_input_comes_back_unchanged() {
        let cs = clauses(&[&[1], &[-1, 2]]);
        assert_eq!(minimize(&cs, 2), vec![0, 1]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const VARS: i32 = 3;

    fn any_formula() -> impl Strategy<Value = Vec<Clause>> {
        prop::collection::vec(
            prop::collection::vec(
                (1..=VARS).prop_flat_map(|v| prop_oneof![Just(v), Just(-v)]),
                1..=2,
            ),
            1..10,
        )
        .prop_map(|sets| {
            sets.into_iter()
                .enumerate()
                .map(|(constraint, literals)| Clause {
                    literals,
                    constraint,
                })
                .collect()
        })
    }

    proptest! {
        /// Property: on UNSAT input the minimized core is UNSAT and
        /// loses satisfiability when any single member is removed
        #[test]
        fn test_minimality_invariant(cs in any_formula()) {
            if solve(&cs, VARS as usize).is_sat() {
                return Ok(());
            }

            let core = minimize(&cs, VARS as usize);
            let core_clauses: Vec<Clause> =
                core.iter().map(|&i| cs[i].clone()).collect();
            prop_assert!(!solve(&core_clauses, VARS as usize).is_sat());

            for dropped in 0..core_clauses.len() {
                let remainder: Vec<Clause> = core_clauses
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != dropped)
                    .map(|(_, c)| c.clone())
                    .collect();
                prop_assert!(solve(&remainder, VARS as usize).is_sat());
            }
        }
    }
}
