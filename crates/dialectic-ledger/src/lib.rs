//! Dialectic History Ledger
//!
//! Append-only, hash-linked record of every engine mutation.
//!
//! Each event's hash covers its kind, canonical payload encoding,
//! timestamp, and the previous event's hash, chained from a genesis
//! sentinel. Replaying the chain from the first event must reproduce
//! every stored hash; a mismatch at position `i` proves tampering at or
//! before `i`. No event is ever rewritten or deleted.
//!
//! The ledger's append target is the engine's only external resource: a
//! file or stream behind the [`dialectic_domain::traits::LedgerSink`]
//! trait, written and flushed synchronously per event.
//!
//! # Examples
//!
//! ```
//! use dialectic_ledger::{EventKind, Ledger};
//! use serde_json::json;
//!
//! let mut ledger = Ledger::new();
//! ledger.append(EventKind::ClaimAsserted, json!({"claim": "kvm_detected"})).unwrap();
//! assert!(ledger.verify().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod ledger;

pub use error::LedgerError;
pub use event::{EventId, EventKind, LedgerEvent};
pub use ledger::Ledger;
