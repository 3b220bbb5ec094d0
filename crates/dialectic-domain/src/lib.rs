//! Dialectic Domain Layer
//!
//! This crate contains the core domain model for Dialectic, a
//! contradiction-detection and truth-maintenance engine. It defines the
//! fundamental entities, value objects, and trait interfaces that the
//! solver, ledger, and engine layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Claim**: an asserted proposition with provenance and a trust weight
//! - **Trust Score**: a clamped [0, 1] weight attached to every claim
//! - **Constraint**: a typed logical relation among claims, compiled into
//!   boolean clauses by the solver layer
//! - **Branch**: a forked hypothetical continuation over a contested claim
//! - **Unsat Core**: a minimal jointly-unsatisfiable claim subset, with a
//!   synthesized discriminating test attached
//!
//! ## Architecture
//!
//! This crate is the bottom of the dependency stack:
//! - Entity and lifecycle logic only, no I/O
//! - Closed enumerations for every status and relation kind, so invalid
//!   states are unrepresentable
//! - Trait definitions for the ledger's append target

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod branch;
pub mod claim;
pub mod constraint;
pub mod contradiction;
pub mod hash;
pub mod provenance;
pub mod traits;
pub mod trust;

// Re-exports for convenience
pub use branch::{Branch, BranchId, BranchStatus};
pub use claim::{Claim, ClaimId, ClaimStatus};
pub use constraint::{Constraint, ConstraintKind};
pub use contradiction::{DiscriminatingTest, UnsatCore};
pub use provenance::{ProvenanceEntry, ProvenanceKind};
pub use trust::TrustScore;
