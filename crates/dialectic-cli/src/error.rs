//! CLI error types

use thiserror::Error;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O error reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine rejected an operation
    #[error("{0}")]
    Engine(#[from] dialectic_engine::EngineError),

    /// Ledger file could not be read or failed verification
    #[error("{0}")]
    Ledger(#[from] dialectic_ledger::LedgerError),

    /// User input could not be parsed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config file could not be serialized
    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Output serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
