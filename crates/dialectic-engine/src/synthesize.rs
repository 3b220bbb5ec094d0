//! Discriminating-test synthesis over unsat-core members

use std::cmp::Ordering;

use dialectic_domain::{Claim, DiscriminatingTest};

/// Synthesize the experiment descriptor for a core's member claims.
///
/// Fewer than two members: verify the claim directly. Otherwise the
/// members are ranked by descending trust; the top two become the
/// competing hypotheses and the lowest-trust member the stress target -
/// most likely wrong, most informative to test first.
///
/// The caller guarantees a non-empty member list (an unsat core always
/// implicates at least one claim).
pub(crate) fn synthesize_test(members: &[&Claim]) -> DiscriminatingTest {
    if members.len() < 2 {
        let claim = members[0];
        return DiscriminatingTest::DirectVerification {
            claim: claim.id.clone(),
            falsifier: claim.falsifier.clone(),
        };
    }

    let ranked = ranked_by_trust(members);
    let strongest = ranked[0];
    let runner_up = ranked[1];
    let weakest = ranked[ranked.len() - 1];

    DiscriminatingTest::CompetingHypotheses {
        hypothesis_a: strongest.id.clone(),
        hypothesis_b: runner_up.id.clone(),
        stress_target: weakest.id.clone(),
        procedure: format!(
            "Find an observation that distinguishes '{}' from '{}'; \
             stress-test '{}' first{}",
            strongest.content,
            runner_up.content,
            weakest.id,
            weakest
                .falsifier
                .as_deref()
                .map(|f| format!(" (falsifier: {})", f))
                .unwrap_or_default(),
        ),
    }
}

/// Trust-variance-weighted disagreement among core members.
///
/// Defined as the population standard deviation of the member trust
/// scores scaled by their spread: zero when members agree in trust,
/// largest when high-trust and low-trust claims collide.
pub(crate) fn divergence(members: &[&Claim]) -> f64 {
    if members.len() < 2 {
        return 0.0;
    }

    let trusts: Vec<f64> = members.iter().map(|c| c.trust.value()).collect();
    let n = trusts.len() as f64;
    let mean = trusts.iter().sum::<f64>() / n;
    let variance = trusts.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

    let max = trusts.iter().cloned().fold(f64::MIN, f64::max);
    let min = trusts.iter().cloned().fold(f64::MAX, f64::min);

    variance.sqrt() * (max - min)
}

/// Members sorted by descending trust, ties broken by claim id so the
/// ranking is deterministic.
fn ranked_by_trust<'a>(members: &[&'a Claim]) -> Vec<&'a Claim> {
    let mut ranked = members.to_vec();
    ranked.sort_by(|a, b| {
        b.trust
            .value()
            .partial_cmp(&a.trust.value())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_domain::{ClaimId, TrustScore};

    fn claim(id: &str, trust: f64) -> Claim {
        Claim::new(
            ClaimId::new(id),
            format!("content of {}", id),
            "test",
            TrustScore::new(trust),
            Some(format!("falsifier of {}", id)),
            vec![],
            0,
        )
    }

    #[test]
    fn test_single_member_gets_direct_verification() {
        let c = claim("solo", 0.5);
        match synthesize_test(&[&c]) {
            DiscriminatingTest::DirectVerification { claim, falsifier } => {
                assert_eq!(claim, ClaimId::new("solo"));
                assert_eq!(falsifier.as_deref(), Some("falsifier of solo"));
            }
            other => panic!("expected direct verification, got {:?}", other),
        }
    }

    #[test]
    fn test_ranking_selects_top_two_and_weakest() {
        let a = claim("kvm_detected", 0.95);
        let b = claim("firecracker", 0.85);
        let c = claim("bare_metal", 0.7);
        match synthesize_test(&[&c, &a, &b]) {
            DiscriminatingTest::CompetingHypotheses {
                hypothesis_a,
                hypothesis_b,
                stress_target,
                procedure,
            } => {
                assert_eq!(hypothesis_a, ClaimId::new("kvm_detected"));
                assert_eq!(hypothesis_b, ClaimId::new("firecracker"));
                assert_eq!(stress_target, ClaimId::new("bare_metal"));
                assert!(procedure.contains("bare_metal"));
            }
            other => panic!("expected competing hypotheses, got {:?}", other),
        }
    }

    #[test]
    fn test_trust_ties_rank_deterministically() {
        let a = claim("alpha", 0.8);
        let b = claim("beta", 0.8);
        let first = synthesize_test(&[&a, &b]);
        let second = synthesize_test(&[&b, &a]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_divergence_zero_on_agreement() {
        let a = claim("a", 0.8);
        let b = claim("b", 0.8);
        assert_eq!(divergence(&[&a, &b]), 0.0);
        assert_eq!(divergence(&[&a]), 0.0);
    }

    #[test]
    fn test_divergence_grows_with_disagreement() {
        let a = claim("a", 0.9);
        let b = claim("b", 0.8);
        let c = claim("c", 0.1);
        let mild = divergence(&[&a, &b]);
        let sharp = divergence(&[&a, &c]);
        assert!(sharp > mild);
        assert!(sharp > 0.0);
    }
}
