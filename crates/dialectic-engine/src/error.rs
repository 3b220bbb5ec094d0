//! Engine error types

use dialectic_domain::{BranchId, ClaimId};
use dialectic_ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// A rejected operation leaves engine state fully unchanged: every
/// validation here happens before the first mutation of the claim store,
/// constraint list, branch map, or ledger.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A claim with this id already exists
    #[error("Duplicate claim id: {0}")]
    DuplicateClaim(ClaimId),

    /// No claim with this id exists
    #[error("Unknown claim id: {0}")]
    UnknownClaim(ClaimId),

    /// The constraint's member list does not fit its kind
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    /// Forking requires a claim the pipeline has flagged as contested
    #[error("Claim {0} is not contested; only quarantined claims can be forked")]
    ClaimNotContested(ClaimId),

    /// The claim already has a fork
    #[error("Claim {0} already has an open fork")]
    ForkExists(ClaimId),

    /// No branch with this id exists
    #[error("Unknown branch id: {0}")]
    UnknownBranch(BranchId),

    /// The fork this branch belongs to was already resolved
    #[error("Branch {0} belongs to an already-resolved fork")]
    BranchAlreadyResolved(BranchId),

    /// Appending to the history ledger failed
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
