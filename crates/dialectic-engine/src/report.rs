//! Aggregate engine status reporting

use serde::Serialize;

/// Aggregate counts over the engine's state, for operators and the CLI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    /// Total claims ever asserted
    pub total_claims: usize,

    /// Claims currently participating in consistency checks
    pub active_claims: usize,

    /// Claims quarantined by the contradiction pipeline
    pub quarantined_claims: usize,

    /// Claims irreversibly confirmed
    pub confirmed_claims: usize,

    /// Claims irreversibly refuted
    pub refuted_claims: usize,

    /// Claims invalidated as losing hypotheses
    pub counterfactual_claims: usize,

    /// Declared constraints (including implicit observation constraints)
    pub constraints: usize,

    /// Branches across all forks
    pub branches: usize,

    /// Branches still awaiting a merge
    pub active_branches: usize,

    /// Events appended to the history ledger
    pub ledger_events: usize,

    /// Whether the last pipeline run detected a contradiction
    pub contradiction: bool,
}

impl StatusReport {
    /// Human-readable one-block summary.
    pub fn summary(&self) -> String {
        format!(
            "claims: {} ({} active, {} quarantined, {} confirmed, {} refuted, {} counterfactual)\n\
             constraints: {}\n\
             branches: {} ({} active)\n\
             ledger events: {}\n\
             contradiction: {}",
            self.total_claims,
            self.active_claims,
            self.quarantined_claims,
            self.confirmed_claims,
            self.refuted_claims,
            self.counterfactual_claims,
            self.constraints,
            self.branches,
            self.active_branches,
            self.ledger_events,
            if self.contradiction { "detected" } else { "none" },
        )
    }
}
