//! Dialectic CLI - command-line collaborator for the contradiction engine.
//!
//! The engine itself is a library with no command surface; this crate
//! drives it. One-shot commands inspect saved ledger files, and the REPL
//! holds a live engine for an interactive session, saving its history as
//! line-delimited JSON on request.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, CliFormat, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
