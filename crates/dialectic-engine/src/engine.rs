//! The owned engine instance and its consistency pipeline

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use dialectic_domain::{
    Branch, BranchId, BranchStatus, Claim, ClaimId, ClaimStatus, Constraint, ConstraintKind,
    ProvenanceEntry, ProvenanceKind, TrustScore, UnsatCore,
};
use dialectic_ledger::{EventKind, Ledger, LedgerError};
use dialectic_solver::{encode, minimize, solve, Solution, VarMap};

use crate::error::EngineError;
use crate::report::StatusReport;
use crate::synthesize::{divergence, synthesize_test};

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// The contradiction-detection and truth-maintenance engine.
///
/// Owns the claim store, constraint list, branch map, claim-to-variable
/// mapping, and history ledger. Every mutating operation re-encodes the
/// constraint set over the participating claims, solves it, and on
/// unsatisfiability quarantines the minimal implicated claim set - all
/// before the operation returns.
///
/// The standing verdict of the last detection is retained while any of
/// its implicated claims is still quarantined awaiting resolution, so
/// [`Engine::check_consistency`] reports the open contradiction even
/// after quarantine has removed its members from the search.
pub struct Engine {
    claims: BTreeMap<ClaimId, Claim>,
    constraints: Vec<Constraint>,
    branches: BTreeMap<BranchId, Branch>,
    vars: VarMap,
    ledger: Ledger,
    verdict: Option<UnsatCore>,
}

impl Engine {
    /// Create an engine with an in-memory ledger.
    pub fn new() -> Self {
        Self::with_ledger(Ledger::new())
    }

    /// Create an engine over an existing ledger (typically one carrying
    /// a write-through sink).
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            claims: BTreeMap::new(),
            constraints: Vec::new(),
            branches: BTreeMap::new(),
            vars: VarMap::new(),
            ledger,
            verdict: None,
        }
    }

    // ---- claim store ----

    /// Assert a new claim, rejecting duplicate ids.
    ///
    /// The claim enters the store active and presumed true; the full
    /// consistency pipeline runs before this method returns.
    pub fn assert_claim(
        &mut self,
        id: &str,
        content: &str,
        source: &str,
        trust: f64,
        falsifier: Option<String>,
        evidence: Vec<String>,
    ) -> Result<&Claim, EngineError> {
        let id = ClaimId::new(id);
        if self.claims.contains_key(&id) {
            return Err(EngineError::DuplicateClaim(id));
        }

        self.ingest_claim(
            id.clone(),
            content,
            source,
            trust,
            falsifier,
            evidence,
            EventKind::ClaimAsserted,
            ProvenanceKind::Assertion,
        )?;
        self.recheck()?;

        tracing::debug!(claim = %id, "claim asserted");
        Ok(&self.claims[&id])
    }

    /// Assert a claim backed by a direct observation.
    ///
    /// This is [`Engine::assert_claim`] plus an implicit observation
    /// constraint forcing the claim true.
    pub fn record_observation(
        &mut self,
        id: &str,
        content: &str,
        source: &str,
        trust: f64,
        falsifier: Option<String>,
        evidence: Vec<String>,
    ) -> Result<&Claim, EngineError> {
        let id = ClaimId::new(id);
        if self.claims.contains_key(&id) {
            return Err(EngineError::DuplicateClaim(id));
        }

        self.ingest_claim(
            id.clone(),
            content,
            source,
            trust,
            falsifier,
            evidence,
            EventKind::ObservationRecorded,
            ProvenanceKind::Observation,
        )?;
        self.constraints.push(Constraint {
            kind: ConstraintKind::Observation { holds: true },
            claims: vec![id.clone()],
            rationale: "directly observed".to_string(),
            created_at: current_timestamp(),
        });
        self.recheck()?;

        tracing::debug!(claim = %id, "observation recorded");
        Ok(&self.claims[&id])
    }

    /// Explicitly adjust a claim's trust score, clamped into [0, 1].
    pub fn adjust_trust(
        &mut self,
        id: &str,
        delta: f64,
        reason: &str,
    ) -> Result<TrustScore, EngineError> {
        let id = ClaimId::new(id);
        let now = current_timestamp();

        let claim = self
            .claims
            .get_mut(&id)
            .ok_or_else(|| EngineError::UnknownClaim(id.clone()))?;
        let previous = claim.trust;
        let updated = previous.adjusted(delta);

        self.ledger.append(
            EventKind::TrustAdjusted,
            json!({
                "claim": id.as_str(),
                "delta": delta,
                "previous": previous.value(),
                "updated": updated.value(),
                "reason": reason,
            }),
        )?;

        claim.trust = updated;
        claim.provenance.push(
            ProvenanceEntry::new("operator", ProvenanceKind::TrustAdjustment, now)
                .with_rationale(reason),
        );
        self.recheck()?;

        tracing::debug!(claim = %id, previous = previous.value(), updated = updated.value(), "trust adjusted");
        Ok(updated)
    }

    // ---- constraints ----

    /// Declare a typed relation over claims.
    ///
    /// Referencing an unknown or currently inactive claim is not an
    /// error: such a constraint is silently excluded from encoding until
    /// all of its members participate again.
    pub fn declare_constraint(
        &mut self,
        kind: ConstraintKind,
        claims: Vec<ClaimId>,
        rationale: &str,
    ) -> Result<&Constraint, EngineError> {
        let constraint = Constraint::new(kind, claims, rationale, current_timestamp())
            .map_err(EngineError::InvalidConstraint)?;

        let mut payload = json!({
            "kind": constraint.kind.as_str(),
            "claims": constraint.claims.iter().map(ClaimId::as_str).collect::<Vec<_>>(),
            "rationale": constraint.rationale,
        });
        if let ConstraintKind::Observation { holds } = constraint.kind {
            payload["holds"] = json!(holds);
        }
        self.ledger.append(EventKind::ConstraintDeclared, payload)?;

        self.constraints.push(constraint);
        self.recheck()?;

        let index = self.constraints.len() - 1;
        Ok(&self.constraints[index])
    }

    /// Declare that two claims cannot both hold.
    pub fn declare_mutual_exclusion(
        &mut self,
        a: &str,
        b: &str,
        rationale: &str,
    ) -> Result<&Constraint, EngineError> {
        self.declare_constraint(
            ConstraintKind::MutualExclusion,
            vec![ClaimId::new(a), ClaimId::new(b)],
            rationale,
        )
    }

    /// Declare that the first claim entails the second.
    pub fn declare_implication(
        &mut self,
        antecedent: &str,
        consequent: &str,
        rationale: &str,
    ) -> Result<&Constraint, EngineError> {
        self.declare_constraint(
            ConstraintKind::Implication,
            vec![ClaimId::new(antecedent), ClaimId::new(consequent)],
            rationale,
        )
    }

    /// Declare a direct observation about an existing claim.
    pub fn declare_observation(
        &mut self,
        claim: &str,
        holds: bool,
        rationale: &str,
    ) -> Result<&Constraint, EngineError> {
        self.declare_constraint(
            ConstraintKind::Observation { holds },
            vec![ClaimId::new(claim)],
            rationale,
        )
    }

    // ---- consistency ----

    /// The standing consistency verdict: the detected unsat core, or
    /// `None` when the claim set is jointly satisfiable.
    ///
    /// Every mutation already ran the solve/minimize/synthesize pipeline
    /// before returning, so this is a read: repeated calls with no
    /// intervening mutation return the identical result.
    pub fn check_consistency(&self) -> Option<&UnsatCore> {
        self.verdict.as_ref()
    }

    // ---- branching ----

    /// Fork a contested (quarantined) claim into paired hypothetical
    /// branches assuming it true and false respectively.
    pub fn fork(&mut self, claim_id: &str, reason: &str) -> Result<(BranchId, BranchId), EngineError> {
        let id = ClaimId::new(claim_id);
        let claim = self
            .claims
            .get(&id)
            .ok_or_else(|| EngineError::UnknownClaim(id.clone()))?;
        if claim.status != ClaimStatus::Quarantined {
            return Err(EngineError::ClaimNotContested(id));
        }

        let true_id = BranchId::for_assumption(&id, true);
        let false_id = BranchId::for_assumption(&id, false);
        if self.branches.contains_key(&true_id) || self.branches.contains_key(&false_id) {
            return Err(EngineError::ForkExists(id));
        }

        let parent_hash = self.ledger.head_hash().to_string();
        let now = current_timestamp();
        self.ledger.append(
            EventKind::BranchForked,
            json!({
                "claim": id.as_str(),
                "branches": [true_id.as_str(), false_id.as_str()],
                "parent_hash": parent_hash,
                "reason": reason,
            }),
        )?;

        self.branches.insert(
            true_id.clone(),
            Branch::new(id.clone(), true, parent_hash.clone(), reason, now),
        );
        self.branches.insert(
            false_id.clone(),
            Branch::new(id.clone(), false, parent_hash, reason, now),
        );

        tracing::info!(claim = %id, "forked contested claim into sibling branches");
        Ok((true_id, false_id))
    }

    /// Resolve a fork: the winner branch's assumption becomes the
    /// claim's irreversible resolution.
    ///
    /// Marks the winner merged and its sibling counterfactual, and sets
    /// the claim confirmed (TRUE won) or refuted (FALSE won). A merge on
    /// an already-resolved fork is rejected with no state change.
    pub fn merge(
        &mut self,
        winner_branch_id: &str,
        evidence: &str,
        reason: &str,
    ) -> Result<ClaimStatus, EngineError> {
        let winner_id = BranchId::new(winner_branch_id);

        let (claim_id, assumed) = {
            let branch = self
                .branches
                .get(&winner_id)
                .ok_or_else(|| EngineError::UnknownBranch(winner_id.clone()))?;
            if branch.status != BranchStatus::Active {
                return Err(EngineError::BranchAlreadyResolved(winner_id.clone()));
            }
            (branch.claim.clone(), branch.assumed)
        };
        let sibling_id = BranchId::for_assumption(&claim_id, !assumed);

        let resolution = if assumed {
            ClaimStatus::Confirmed
        } else {
            ClaimStatus::Refuted
        };
        {
            let claim = self
                .claims
                .get(&claim_id)
                .ok_or_else(|| EngineError::UnknownClaim(claim_id.clone()))?;
            if !claim.status.can_advance_to(resolution) {
                return Err(EngineError::BranchAlreadyResolved(winner_id.clone()));
            }
        }

        self.ledger.append(
            EventKind::BranchMerged,
            json!({
                "branch": winner_id.as_str(),
                "claim": claim_id.as_str(),
                "assumed": assumed,
                "evidence": evidence,
                "reason": reason,
            }),
        )?;
        let resolution_event = if assumed {
            EventKind::ClaimConfirmed
        } else {
            EventKind::ClaimRefuted
        };
        self.ledger.append(
            resolution_event,
            json!({
                "claim": claim_id.as_str(),
                "branch": winner_id.as_str(),
            }),
        )?;

        let now = current_timestamp();
        if let Some(branch) = self.branches.get_mut(&winner_id) {
            branch.status = BranchStatus::Merged;
        }
        if let Some(sibling) = self.branches.get_mut(&sibling_id) {
            sibling.status = BranchStatus::Counterfactual;
        }
        if let Some(claim) = self.claims.get_mut(&claim_id) {
            claim.status = resolution;
            claim.evidence.push(evidence.to_string());
            claim.provenance.push(
                ProvenanceEntry::new("merge", ProvenanceKind::Resolution, now)
                    .with_rationale(reason),
            );
        }

        tracing::info!(claim = %claim_id, status = resolution.as_str(), "fork resolved");
        self.recheck()?;
        Ok(resolution)
    }

    // ---- reporting and access ----

    /// Aggregate counts over the engine's state.
    pub fn status_report(&self) -> StatusReport {
        let mut report = StatusReport {
            total_claims: self.claims.len(),
            constraints: self.constraints.len(),
            branches: self.branches.len(),
            active_branches: self
                .branches
                .values()
                .filter(|b| b.status == BranchStatus::Active)
                .count(),
            ledger_events: self.ledger.len(),
            contradiction: self.verdict.is_some(),
            ..Default::default()
        };
        for claim in self.claims.values() {
            match claim.status {
                ClaimStatus::Active => report.active_claims += 1,
                ClaimStatus::Quarantined => report.quarantined_claims += 1,
                ClaimStatus::Confirmed => report.confirmed_claims += 1,
                ClaimStatus::Refuted => report.refuted_claims += 1,
                ClaimStatus::Counterfactual => report.counterfactual_claims += 1,
            }
        }
        report
    }

    /// Look up a claim.
    pub fn claim(&self, id: &str) -> Option<&Claim> {
        self.claims.get(&ClaimId::new(id))
    }

    /// All claims in id order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.values()
    }

    /// Look up a branch.
    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.get(&BranchId::new(id))
    }

    /// All branches in id order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Declared constraints, in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The history ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Export the full history as line-delimited JSON records.
    pub fn export_ledger(&self) -> Result<String, EngineError> {
        Ok(self.ledger.export_ndjson()?)
    }

    // ---- pipeline internals ----

    #[allow(clippy::too_many_arguments)]
    fn ingest_claim(
        &mut self,
        id: ClaimId,
        content: &str,
        source: &str,
        trust: f64,
        falsifier: Option<String>,
        evidence: Vec<String>,
        event: EventKind,
        prov_kind: ProvenanceKind,
    ) -> Result<(), EngineError> {
        let now = current_timestamp();
        let mut claim = Claim::new(
            id.clone(),
            content,
            source,
            TrustScore::new(trust),
            falsifier,
            evidence,
            now,
        );
        claim
            .provenance
            .push(ProvenanceEntry::new(source, prov_kind, now));

        self.ledger.append(
            event,
            json!({
                "claim": id.as_str(),
                "content_hash": claim.content_hash,
                "source": claim.source,
                "trust": claim.trust.value(),
            }),
        )?;
        self.claims.insert(id, claim);
        Ok(())
    }

    /// Whether a claim currently takes part in constraint encoding.
    fn participates(&self, id: &ClaimId) -> bool {
        self.claims
            .get(id)
            .map(|c| c.status.participates_in_solving())
            .unwrap_or(false)
    }

    /// The declared constraints plus one ephemeral affirming observation
    /// per participating claim that no participating observation
    /// constraint already pins.
    ///
    /// An asserted claim is a held belief, so it is presumed true during
    /// solving unless a direct observation overrides the presumption.
    /// Rebuilt from scratch on every check.
    fn augmented_constraints(&self) -> Vec<Constraint> {
        let mut augmented = self.constraints.clone();

        let observed: BTreeSet<&ClaimId> = self
            .constraints
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Observation { .. }))
            .filter(|c| c.claims.iter().all(|id| self.participates(id)))
            .flat_map(|c| c.claims.iter())
            .collect();

        for (id, claim) in &self.claims {
            if claim.status.participates_in_solving() && !observed.contains(id) {
                augmented.push(Constraint {
                    kind: ConstraintKind::Observation { holds: true },
                    claims: vec![id.clone()],
                    rationale: "standing assertion".to_string(),
                    created_at: claim.created_at,
                });
            }
        }

        augmented
    }

    /// Run the full consistency pipeline: encode, solve, and on
    /// unsatisfiability minimize, synthesize, and quarantine.
    fn recheck(&mut self) -> Result<(), EngineError> {
        let augmented = self.augmented_constraints();

        let claims = &self.claims;
        let participates = |id: &ClaimId| {
            claims
                .get(id)
                .map(|c| c.status.participates_in_solving())
                .unwrap_or(false)
        };
        let encoding = encode(&augmented, participates, &mut self.vars);
        tracing::debug!(
            clauses = encoding.clauses.len(),
            variables = encoding.var_count,
            "consistency check"
        );

        match solve(&encoding.clauses, encoding.var_count) {
            Solution::Satisfiable(_) => {
                // A standing contradiction stays open while any of its
                // members is still quarantined awaiting resolution
                let still_contested = self.verdict.as_ref().is_some_and(|core| {
                    core.claims.iter().any(|id| {
                        self.claims
                            .get(id)
                            .is_some_and(|c| c.status == ClaimStatus::Quarantined)
                    })
                });
                if !still_contested {
                    self.verdict = None;
                }
                self.ledger.append(
                    EventKind::ConsistencyVerified,
                    json!({
                        "clauses": encoding.clauses.len(),
                        "variables": encoding.var_count,
                    }),
                )?;
            }
            Solution::Unsatisfiable(_) => {
                // Deterministic core derivation: shrink the full clause
                // range rather than trusting the failing recursion branch
                let core_indices = minimize(&encoding.clauses, encoding.var_count);

                let mut implicated: BTreeSet<ClaimId> = BTreeSet::new();
                for &clause_index in &core_indices {
                    let constraint = &augmented[encoding.clauses[clause_index].constraint];
                    implicated.extend(constraint.claims.iter().cloned());
                }
                let ids: Vec<ClaimId> = implicated.into_iter().collect();

                let members: Vec<&Claim> =
                    ids.iter().filter_map(|id| self.claims.get(id)).collect();
                if members.is_empty() {
                    tracing::warn!("unsat core implicated no stored claims");
                    return Ok(());
                }
                let score = divergence(&members);
                let test = synthesize_test(&members);
                let core = UnsatCore {
                    claims: ids,
                    divergence: score,
                    test,
                };

                if self.verdict.as_ref() != Some(&core) {
                    tracing::info!(claims = ?core.claims, divergence = score, "contradiction detected");
                    self.ledger.append(
                        EventKind::ContradictionDetected,
                        json!({
                            "claims": core.claims.iter().map(ClaimId::as_str).collect::<Vec<_>>(),
                            "divergence": core.divergence,
                            "test": serde_json::to_value(&core.test)
                                .map_err(LedgerError::Serialize)?,
                        }),
                    )?;
                }

                for id in core.claims.clone() {
                    let mut quarantined = false;
                    if let Some(claim) = self.claims.get_mut(&id) {
                        if claim.status.can_advance_to(ClaimStatus::Quarantined) {
                            claim.status = ClaimStatus::Quarantined;
                            claim.provenance.push(
                                ProvenanceEntry::new(
                                    "pipeline",
                                    ProvenanceKind::Quarantine,
                                    current_timestamp(),
                                )
                                .with_rationale("implicated in unsat core"),
                            );
                            quarantined = true;
                        }
                    }
                    if quarantined {
                        self.ledger
                            .append(EventKind::ClaimQuarantined, json!({ "claim": id.as_str() }))?;
                    }
                }

                self.verdict = Some(core);
            }
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
