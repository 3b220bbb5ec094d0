//! Recursive DPLL satisfiability procedure

use crate::encode::Clause;

/// Outcome of a solve call.
///
/// Unsatisfiability is a normal return value, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// The clause set is satisfiable; the witness maps each variable
    /// (index `var - 1`) to its value, `None` for variables the search
    /// never needed to constrain.
    Satisfiable(Vec<Option<bool>>),

    /// The clause set is jointly unsatisfiable; the implicated indices
    /// cover the full clause range, deterministically, so that core
    /// extraction never depends on which recursion branch failed last.
    Unsatisfiable(Vec<usize>),
}

impl Solution {
    /// Whether this outcome is satisfiable.
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Satisfiable(_))
    }
}

/// Decide satisfiability of a clause set over `var_count` variables.
///
/// Recursive DPLL: unit-propagate to a fixpoint (a clause driven empty
/// triggers immediate backtrack), then branch both ways on the first
/// unassigned variable appearing in the first clause that still has one.
/// Variable selection is fixed by clause order; there is no heuristic, so
/// identical inputs always walk the identical search tree.
///
/// Termination is guaranteed by the strictly shrinking unassigned-variable
/// set. An empty clause set is trivially satisfiable.
///
/// # Examples
///
/// ```
/// use dialectic_solver::{solve, Clause, Solution};
///
/// // a, a -> b
/// let clauses = vec![
///     Clause { literals: vec![1], constraint: 0 },
///     Clause { literals: vec![-1, 2], constraint: 1 },
/// ];
/// match solve(&clauses, 2) {
///     Solution::Satisfiable(witness) => {
///         assert_eq!(witness, vec![Some(true), Some(true)]);
///     }
///     Solution::Unsatisfiable(_) => unreachable!(),
/// }
/// ```
pub fn solve(clauses: &[Clause], var_count: usize) -> Solution {
    if clauses.is_empty() {
        return Solution::Satisfiable(vec![None; var_count]);
    }

    match search(clauses, vec![None; var_count]) {
        Some(witness) => Solution::Satisfiable(witness),
        None => Solution::Unsatisfiable((0..clauses.len()).collect()),
    }
}

/// Value of a literal under a partial assignment.
fn literal_value(literal: i32, assignment: &[Option<bool>]) -> Option<bool> {
    let var = literal.unsigned_abs() as usize - 1;
    assignment[var].map(|value| if literal > 0 { value } else { !value })
}

enum ClauseState {
    Satisfied,
    Conflict,
    Unit(i32),
    Open,
}

fn clause_state(clause: &Clause, assignment: &[Option<bool>]) -> ClauseState {
    let mut unassigned = None;
    let mut unassigned_count = 0usize;

    for &literal in &clause.literals {
        match literal_value(literal, assignment) {
            Some(true) => return ClauseState::Satisfied,
            Some(false) => {}
            None => {
                unassigned_count += 1;
                if unassigned.is_none() {
                    unassigned = Some(literal);
                }
            }
        }
    }

    match (unassigned_count, unassigned) {
        (0, _) => ClauseState::Conflict,
        (1, Some(literal)) => ClauseState::Unit(literal),
        _ => ClauseState::Open,
    }
}

fn search(clauses: &[Clause], mut assignment: Vec<Option<bool>>) -> Option<Vec<Option<bool>>> {
    // Phase one: unit propagation to fixpoint
    loop {
        let mut changed = false;
        for clause in clauses {
            match clause_state(clause, &assignment) {
                ClauseState::Conflict => return None,
                ClauseState::Unit(literal) => {
                    let var = literal.unsigned_abs() as usize - 1;
                    assignment[var] = Some(literal > 0);
                    changed = true;
                }
                ClauseState::Satisfied | ClauseState::Open => {}
            }
        }
        if !changed {
            break;
        }
    }

    // Phase two: branch on the first unassigned variable of the first
    // clause that still has one
    let branch_var = clauses.iter().find_map(|clause| {
        clause
            .literals
            .iter()
            .find(|&&literal| literal_value(literal, &assignment).is_none())
            .map(|literal| literal.unsigned_abs() as usize - 1)
    });

    let var = match branch_var {
        // Every literal in every clause is assigned and no clause is in
        // conflict, so the assignment is a model
        None => return Some(assignment),
        Some(var) => var,
    };

    for value in [true, false] {
        let mut trial = assignment.clone();
        trial[var] = Some(value);
        if let Some(witness) = search(clauses, trial) {
            return Some(witness);
        }
    }

    None
}
