//! Dialectic Solver Layer
//!
//! Compiles declared constraints over the active claim set into boolean
//! clauses, decides satisfiability with a recursive DPLL procedure, and
//! shrinks failing clause sets to locally minimal unsat cores.
//!
//! # Design
//!
//! The solver is deliberately small: unit propagation plus two-way
//! case-split recursion, with variable selection fixed by clause order.
//! There is no clause learning, no restarts, and no activity heuristic -
//! determinism and reproducibility matter more here than raw solving
//! speed, because cores feed directly into quarantine decisions that are
//! replayed from the ledger.
//!
//! Pathological constraint sets (many independent mutual exclusions) can
//! trigger exponential search. That is an accepted limitation; callers
//! with adversarially large constraint sets must pre-filter.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dpll;
pub mod encode;
pub mod minimize;
pub mod vars;

pub use dpll::{solve, Solution};
pub use encode::{encode, Clause, Encoding};
pub use minimize::minimize;
pub use vars::VarMap;
