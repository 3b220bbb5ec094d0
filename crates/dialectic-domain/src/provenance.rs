//! Provenance tracking for claims

use serde::{Deserialize, Serialize};

/// What kind of touch a provenance entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceKind {
    /// Initial assertion of the claim
    Assertion,

    /// Assertion backed by a direct observation
    Observation,

    /// Explicit trust adjustment
    TrustAdjustment,

    /// Quarantine by the contradiction pipeline
    Quarantine,

    /// Resolution by a branch merge
    Resolution,
}

impl ProvenanceKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceKind::Assertion => "assertion",
            ProvenanceKind::Observation => "observation",
            ProvenanceKind::TrustAdjustment => "trust_adjustment",
            ProvenanceKind::Quarantine => "quarantine",
            ProvenanceKind::Resolution => "resolution",
        }
    }
}

/// A single provenance entry tracking who touched a claim and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Source identifier (e.g. "probe:cpuid", "operator", "pipeline")
    pub source: String,

    /// What kind of touch this was
    pub kind: ProvenanceKind,

    /// Timestamp when this entry was recorded (seconds since Unix epoch)
    pub timestamp: u64,

    /// Optional rationale or reasoning
    pub rationale: Option<String>,
}

impl ProvenanceEntry {
    /// Create a new provenance entry.
    pub fn new(source: impl Into<String>, kind: ProvenanceKind, timestamp: u64) -> Self {
        Self {
            source: source.into(),
            kind,
            timestamp,
            rationale: None,
        }
    }

    /// Attach a rationale.
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}
