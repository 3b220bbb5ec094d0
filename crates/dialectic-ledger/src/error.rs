//! Ledger error types

use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Writing to the append target failed
    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),

    /// Payload or record (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Replay verification found a hash that does not reproduce
    #[error("Hash chain mismatch at event {position}: tampering at or before this position")]
    ChainMismatch {
        /// Zero-based index of the first event whose hash fails to verify
        position: usize,
    },

    /// An imported record could not be parsed
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// One-based line number in the imported stream
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}
