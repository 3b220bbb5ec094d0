//! Dialectic Engine
//!
//! The contradiction-detection and truth-maintenance core. One owned
//! [`Engine`] instance holds the claim store, constraint list, branch map,
//! variable mapping, and history ledger; every public operation is a
//! method on that instance, with no ambient global state.
//!
//! Every mutating call runs the full consistency pipeline before it
//! returns: re-encode the constraints over the participating claims,
//! solve, and on unsatisfiability minimize the failing clause set, rank
//! the implicated claims, synthesize a discriminating test, and
//! quarantine the members. Mutation and consistency check are one atomic
//! step; a rejected operation leaves engine state fully unchanged.
//!
//! The engine is single-threaded and synchronous with no suspension
//! points. If embedded in a concurrent host, protect the whole engine by
//! one external mutual-exclusion boundary; no internal locking is
//! provided.
//!
//! # Examples
//!
//! ```
//! use dialectic_engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine.assert_claim("bare_metal", "host is bare metal", "probe:dmesg", 0.7, None, vec![]).unwrap();
//! engine.record_observation("kvm_detected", "KVM hypervisor present", "probe:cpuid", 0.95, None, vec![]).unwrap();
//! engine.declare_mutual_exclusion("bare_metal", "kvm_detected", "a VM is not bare metal").unwrap();
//!
//! // The asserted claim conflicts with the observation
//! assert!(engine.check_consistency().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod engine;
mod error;
mod report;
mod synthesize;

pub use engine::Engine;
pub use error::EngineError;
pub use report::StatusReport;
