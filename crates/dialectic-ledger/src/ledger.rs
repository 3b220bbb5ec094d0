//! The append-only hash-chained ledger

use std::time::{SystemTime, UNIX_EPOCH};

use dialectic_domain::hash::GENESIS_HASH;
use dialectic_domain::traits::LedgerSink;

use crate::error::LedgerError;
use crate::event::{EventId, EventKind, LedgerEvent};

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Append-only, hash-linked history of engine mutations.
///
/// Events live in memory; when a sink is attached, every appended event
/// is additionally written and flushed to it as one NDJSON record before
/// `append` returns. The chain is strictly prefix-dependent: editing any
/// earlier event invalidates every later hash.
pub struct Ledger {
    events: Vec<LedgerEvent>,
    sink: Option<Box<dyn LedgerSink>>,
}

impl Ledger {
    /// Create an empty in-memory ledger.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            sink: None,
        }
    }

    /// Create an empty ledger that writes through to `sink`.
    pub fn with_sink(sink: Box<dyn LedgerSink>) -> Self {
        Self {
            events: Vec::new(),
            sink: Some(sink),
        }
    }

    /// Number of events appended so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the ledger has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hash of the newest event, or the genesis sentinel when empty.
    pub fn head_hash(&self) -> &str {
        self.events
            .last()
            .map(|event| event.hash.as_str())
            .unwrap_or(GENESIS_HASH)
    }

    /// Append a new event, chaining it to the current head.
    ///
    /// The hash covers (kind, canonical payload, timestamp, previous
    /// hash). When a sink is attached the record is written and flushed
    /// before this method returns, so a crash can lose at most the event
    /// being appended.
    pub fn append(
        &mut self,
        kind: EventKind,
        payload: serde_json::Value,
    ) -> Result<&LedgerEvent, LedgerError> {
        let timestamp = current_timestamp();
        let prev_hash = self.head_hash().to_string();
        let hash = LedgerEvent::compute_hash(kind, &payload, timestamp, &prev_hash)?;

        let event = LedgerEvent {
            id: EventId::new(),
            kind,
            payload,
            timestamp,
            hash,
            prev_hash,
        };

        if let Some(sink) = self.sink.as_mut() {
            let record = serde_json::to_string(&event)?;
            sink.write_record(&record)?;
            sink.flush()?;
        }

        self.events.push(event);
        Ok(self.events.last().expect("event was just pushed"))
    }

    /// Replay the chain from the first event, verifying that every stored
    /// hash reproduces and that each event links to its predecessor.
    ///
    /// A `ChainMismatch { position }` proves tampering at or before
    /// `position`.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let mut expected_prev = GENESIS_HASH.to_string();

        for (position, event) in self.events.iter().enumerate() {
            if event.prev_hash != expected_prev {
                return Err(LedgerError::ChainMismatch { position });
            }
            let recomputed = event.recompute_hash()?;
            if recomputed != event.hash {
                return Err(LedgerError::ChainMismatch { position });
            }
            expected_prev = event.hash.clone();
        }

        Ok(())
    }

    /// Export the full chain as line-delimited JSON records.
    pub fn export_ndjson(&self) -> Result<String, LedgerError> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Import a chain from line-delimited JSON records, verifying it.
    ///
    /// The returned ledger has no sink attached; callers re-attach one if
    /// they intend to keep appending.
    pub fn import_ndjson(input: &str) -> Result<Self, LedgerError> {
        let mut events = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event: LedgerEvent =
                serde_json::from_str(line).map_err(|e| LedgerError::MalformedRecord {
                    line: index + 1,
                    reason: e.to_string(),
                })?;
            events.push(event);
        }

        let ledger = Self {
            events,
            sink: None,
        };
        ledger.verify()?;
        Ok(ledger)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_ledger_head_is_genesis() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.head_hash(), GENESIS_HASH);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn test_adjacent_events_link() {
        let mut ledger = Ledger::new();
        ledger
            .append(EventKind::ClaimAsserted, json!({"claim": "a"}))
            .unwrap();
        ledger
            .append(EventKind::ClaimAsserted, json!({"claim": "b"}))
            .unwrap();
        ledger
            .append(EventKind::ConstraintDeclared, json!({"kind": "implication"}))
            .unwrap();

        let events = ledger.events();
        assert_eq!(events[0].prev_hash, GENESIS_HASH);
        for window in events.windows(2) {
            assert_eq!(window[1].prev_hash, window[0].hash);
        }
        assert_eq!(ledger.head_hash(), events[2].hash);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn test_tampered_payload_is_detected() {
        let mut ledger = Ledger::new();
        for name in ["a", "b", "c"] {
            ledger
                .append(EventKind::ClaimAsserted, json!({"claim": name}))
                .unwrap();
        }

        ledger.events[1].payload = json!({"claim": "forged"});

        match ledger.verify() {
            Err(LedgerError::ChainMismatch { position }) => assert_eq!(position, 1),
            other => panic!("expected mismatch at 1, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_link_is_detected() {
        let mut ledger = Ledger::new();
        for name in ["a", "b", "c"] {
            ledger
                .append(EventKind::ClaimAsserted, json!({"claim": name}))
                .unwrap();
        }

        // Re-pointing an event at a forged predecessor breaks the chain
        ledger.events[2].prev_hash = "f".repeat(64);

        assert!(matches!(
            ledger.verify(),
            Err(LedgerError::ChainMismatch { position: 2 })
        ));
    }

    #[test]
    fn test_ndjson_round_trip() {
        let mut ledger = Ledger::new();
        ledger
            .append(EventKind::ClaimAsserted, json!({"claim": "a", "trust": 0.7}))
            .unwrap();
        ledger
            .append(EventKind::ContradictionDetected, json!({"claims": ["a", "b"]}))
            .unwrap();

        let exported = ledger.export_ndjson().unwrap();
        assert_eq!(exported.lines().count(), 2);

        let imported = Ledger::import_ndjson(&exported).unwrap();
        assert_eq!(imported.events(), ledger.events());
        assert!(imported.verify().is_ok());
    }

    #[test]
    fn test_import_rejects_garbage() {
        let result = Ledger::import_ndjson("not json\n");
        assert!(matches!(
            result,
            Err(LedgerError::MalformedRecord { line: 1, .. })
        ));
    }
}
