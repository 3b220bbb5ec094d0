//! Integration tests for dialectic-engine
//!
//! These tests drive the full contradiction pipeline end to end: claim
//! ingestion, constraint declaration, detection, quarantine, fork/merge
//! resolution, and history ledger integrity.

use std::fs;
use std::io::BufWriter;

use dialectic_domain::{BranchStatus, ClaimId, ClaimStatus, DiscriminatingTest};
use dialectic_engine::{Engine, EngineError};
use dialectic_ledger::Ledger;

/// Scenario A from the design notes: an asserted bare-metal claim
/// against a hypervisor observation and a firecracker claim.
fn hypervisor_conflict() -> Engine {
    let mut engine = Engine::new();
    engine
        .assert_claim(
            "bare_metal",
            "host is bare metal",
            "probe:dmesg",
            0.7,
            Some("hypervisor leaf present in cpuid".to_string()),
            vec![],
        )
        .unwrap();
    engine
        .record_observation(
            "kvm_detected",
            "KVM hypervisor detected",
            "probe:cpuid",
            0.95,
            None,
            vec![],
        )
        .unwrap();
    engine
        .assert_claim(
            "firecracker",
            "running inside a firecracker microvm",
            "probe:devices",
            0.85,
            None,
            vec![],
        )
        .unwrap();
    engine
        .declare_mutual_exclusion("bare_metal", "firecracker", "a microvm is not bare metal")
        .unwrap();
    engine
        .declare_mutual_exclusion("kvm_detected", "bare_metal", "kvm means virtualized")
        .unwrap();
    engine
}

#[test]
fn test_scenario_a_detects_core_over_bare_metal() {
    let engine = hypervisor_conflict();

    let core = engine.check_consistency().expect("contradiction expected");
    assert!(core.implicates(&ClaimId::new("bare_metal")));
    assert!(
        core.implicates(&ClaimId::new("kvm_detected"))
            || core.implicates(&ClaimId::new("firecracker"))
    );
    assert!(core.divergence > 0.0);

    // Implicated claims are quarantined; the observed claim survives
    for id in &core.claims {
        assert_eq!(
            engine.claim(id.as_str()).unwrap().status,
            ClaimStatus::Quarantined
        );
    }
    assert_eq!(
        engine.claim("kvm_detected").unwrap().status,
        ClaimStatus::Active
    );
}

#[test]
fn test_scenario_a_core_carries_a_discriminating_test() {
    let engine = hypervisor_conflict();
    let core = engine.check_consistency().unwrap();

    match &core.test {
        DiscriminatingTest::CompetingHypotheses {
            hypothesis_a,
            stress_target,
            ..
        } => {
            // The stress target is the lowest-trust member
            assert_eq!(stress_target, &ClaimId::new("bare_metal"));
            assert_ne!(hypothesis_a, stress_target);
        }
        DiscriminatingTest::DirectVerification { claim, .. } => {
            panic!("expected competing hypotheses, got direct verification of {}", claim);
        }
    }
}

#[test]
fn test_scenario_b_false_observations_satisfy_implication() {
    let mut engine = Engine::new();
    engine
        .assert_claim("a", "antecedent", "test", 0.6, None, vec![])
        .unwrap();
    engine
        .assert_claim("b", "consequent", "test", 0.6, None, vec![])
        .unwrap();
    engine.declare_implication("a", "b", "a entails b").unwrap();
    engine.declare_observation("a", false, "probe negative").unwrap();
    engine.declare_observation("b", false, "probe negative").unwrap();

    assert!(engine.check_consistency().is_none());
    assert_eq!(engine.claim("a").unwrap().status, ClaimStatus::Active);
    assert_eq!(engine.claim("b").unwrap().status, ClaimStatus::Active);
}

#[test]
fn test_scenario_c_broken_implication_yields_exact_core() {
    let mut engine = Engine::new();
    engine
        .assert_claim("a", "antecedent", "test", 0.8, None, vec![])
        .unwrap();
    engine
        .assert_claim("b", "consequent", "test", 0.4, None, vec![])
        .unwrap();
    engine.declare_implication("a", "b", "a entails b").unwrap();
    engine.declare_observation("a", true, "probe positive").unwrap();
    engine.declare_observation("b", false, "probe negative").unwrap();

    let core = engine.check_consistency().expect("contradiction expected");
    assert_eq!(core.claims, vec![ClaimId::new("a"), ClaimId::new("b")]);
}

#[test]
fn test_conflicting_observations_yield_direct_verification() {
    let mut engine = Engine::new();
    engine
        .assert_claim("flaky", "sensor reads high", "probe:sensor", 0.5, Some("re-read the sensor".to_string()), vec![])
        .unwrap();
    engine.declare_observation("flaky", true, "first read").unwrap();
    engine.declare_observation("flaky", false, "second read").unwrap();

    let core = engine.check_consistency().expect("contradiction expected");
    assert_eq!(core.claims, vec![ClaimId::new("flaky")]);
    match &core.test {
        DiscriminatingTest::DirectVerification { claim, falsifier } => {
            assert_eq!(claim, &ClaimId::new("flaky"));
            assert_eq!(falsifier.as_deref(), Some("re-read the sensor"));
        }
        other => panic!("expected direct verification, got {:?}", other),
    }
}

#[test]
fn test_core_minimality_on_detection_state() {
    // Re-run scenario C with either core member absent: the remainder
    // must be satisfiable, which is what minimality promises
    for missing in ["a", "b"] {
        let mut engine = Engine::new();
        for id in ["a", "b"] {
            if id == missing {
                continue;
            }
            engine
                .assert_claim(id, "claim", "test", 0.5, None, vec![])
                .unwrap();
        }
        engine.declare_implication("a", "b", "a entails b").unwrap();
        if missing != "a" {
            engine.declare_observation("a", true, "probe positive").unwrap();
        }
        if missing != "b" {
            engine.declare_observation("b", false, "probe negative").unwrap();
        }
        assert!(
            engine.check_consistency().is_none(),
            "dropping {} should leave the set satisfiable",
            missing
        );
    }
}

#[test]
fn test_check_consistency_is_idempotent() {
    let engine = hypervisor_conflict();

    let first = engine.check_consistency().cloned();
    let second = engine.check_consistency().cloned();
    let third = engine.check_consistency().cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_scenario_d_merge_false_branch_refutes_claim() {
    let mut engine = hypervisor_conflict();

    let (true_id, false_id) = engine.fork("bare_metal", "contested by hypervisor core").unwrap();
    assert_eq!(true_id.as_str(), "bare_metal_TRUE");
    assert_eq!(false_id.as_str(), "bare_metal_FALSE");
    assert_eq!(
        engine.branch("bare_metal_TRUE").unwrap().status,
        BranchStatus::Active
    );

    let resolution = engine
        .merge("bare_metal_FALSE", "cpuid hypervisor leaf confirmed", "observation wins")
        .unwrap();
    assert_eq!(resolution, ClaimStatus::Refuted);
    assert_eq!(
        engine.claim("bare_metal").unwrap().status,
        ClaimStatus::Refuted
    );

    // Exactly one sibling is counterfactual and none remain active
    assert_eq!(
        engine.branch("bare_metal_FALSE").unwrap().status,
        BranchStatus::Merged
    );
    assert_eq!(
        engine.branch("bare_metal_TRUE").unwrap().status,
        BranchStatus::Counterfactual
    );

    // A second merge on either branch is rejected outright
    assert!(matches!(
        engine.merge("bare_metal_FALSE", "again", "redundant"),
        Err(EngineError::BranchAlreadyResolved(_))
    ));
    assert!(matches!(
        engine.merge("bare_metal_TRUE", "flip", "too late"),
        Err(EngineError::BranchAlreadyResolved(_))
    ));
}

#[test]
fn test_merge_true_branch_confirms_claim() {
    let mut engine = hypervisor_conflict();
    engine.fork("firecracker", "contested").unwrap();

    let resolution = engine
        .merge("firecracker_TRUE", "/dev/vmgenid present", "device probe wins")
        .unwrap();
    assert_eq!(resolution, ClaimStatus::Confirmed);
    assert_eq!(
        engine.claim("firecracker").unwrap().status,
        ClaimStatus::Confirmed
    );
}

#[test]
fn test_fork_requires_a_contested_claim() {
    let mut engine = Engine::new();
    engine
        .assert_claim("calm", "nothing disputes this", "test", 0.5, None, vec![])
        .unwrap();

    assert!(matches!(
        engine.fork("calm", "no contest exists"),
        Err(EngineError::ClaimNotContested(_))
    ));
    assert!(matches!(
        engine.fork("ghost", "no such claim"),
        Err(EngineError::UnknownClaim(_))
    ));
}

#[test]
fn test_double_fork_is_rejected() {
    let mut engine = hypervisor_conflict();
    engine.fork("bare_metal", "contested").unwrap();
    assert!(matches!(
        engine.fork("bare_metal", "contested again"),
        Err(EngineError::ForkExists(_))
    ));
}

#[test]
fn test_status_is_monotonic_through_resolution() {
    let mut engine = hypervisor_conflict();

    // active -> quarantined happened during detection
    assert_eq!(
        engine.claim("bare_metal").unwrap().status,
        ClaimStatus::Quarantined
    );

    engine.fork("bare_metal", "contested").unwrap();
    engine.merge("bare_metal_FALSE", "evidence", "reason").unwrap();

    // quarantined -> refuted is terminal; no operation can move it back
    assert_eq!(
        engine.claim("bare_metal").unwrap().status,
        ClaimStatus::Refuted
    );
    assert!(matches!(
        engine.fork("bare_metal", "resurrect"),
        Err(EngineError::ClaimNotContested(_))
    ));
}

#[test]
fn test_verdict_clears_once_every_member_is_resolved() {
    let mut engine = Engine::new();
    engine
        .assert_claim("a", "antecedent", "test", 0.8, None, vec![])
        .unwrap();
    engine
        .assert_claim("b", "consequent", "test", 0.4, None, vec![])
        .unwrap();
    engine.declare_implication("a", "b", "a entails b").unwrap();
    engine.declare_observation("a", true, "probe positive").unwrap();
    engine.declare_observation("b", false, "probe negative").unwrap();
    assert!(engine.check_consistency().is_some());

    engine.fork("a", "contested").unwrap();
    engine.merge("a_TRUE", "re-probed", "observation stands").unwrap();
    // One member still quarantined: the contradiction stays open
    assert!(engine.check_consistency().is_some());

    engine.fork("b", "contested").unwrap();
    engine.merge("b_FALSE", "re-probed", "observation stands").unwrap();
    assert!(engine.check_consistency().is_none());
}

#[test]
fn test_ledger_chain_holds_across_the_whole_pipeline() {
    let mut engine = hypervisor_conflict();
    engine.fork("bare_metal", "contested").unwrap();
    engine.merge("bare_metal_FALSE", "evidence", "reason").unwrap();
    engine.adjust_trust("kvm_detected", 0.02, "re-probed").unwrap();

    let ledger = engine.ledger();
    assert!(ledger.verify().is_ok());
    for window in ledger.events().windows(2) {
        assert_eq!(window[1].prev_hash, window[0].hash);
    }

    let exported = engine.export_ledger().unwrap();
    let imported = Ledger::import_ndjson(&exported).unwrap();
    assert_eq!(imported.events(), ledger.events());
}

#[test]
fn test_engine_writes_through_a_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.ndjson");

    let file = fs::File::create(&path).unwrap();
    let mut engine = Engine::with_ledger(Ledger::with_sink(Box::new(BufWriter::new(file))));
    engine
        .assert_claim("a", "claim", "test", 0.5, None, vec![])
        .unwrap();
    engine
        .assert_claim("b", "claim", "test", 0.5, None, vec![])
        .unwrap();
    engine.declare_mutual_exclusion("a", "b", "exclusive").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), engine.ledger().len());

    let imported = Ledger::import_ndjson(&contents).unwrap();
    assert!(imported.verify().is_ok());
}

#[test]
fn test_status_report_counts() {
    let mut engine = hypervisor_conflict();
    engine.fork("bare_metal", "contested").unwrap();

    let report = engine.status_report();
    assert_eq!(report.total_claims, 3);
    assert_eq!(report.active_claims, 1);
    assert_eq!(report.quarantined_claims, 2);
    assert_eq!(report.constraints, 3); // kvm observation + two exclusions
    assert_eq!(report.branches, 2);
    assert_eq!(report.active_branches, 2);
    assert!(report.contradiction);
    assert!(report.ledger_events > 0);

    engine.merge("bare_metal_FALSE", "evidence", "reason").unwrap();
    let report = engine.status_report();
    assert_eq!(report.refuted_claims, 1);
    assert_eq!(report.active_branches, 0);
}
