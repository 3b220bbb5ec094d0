//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dialectic CLI - drive the contradiction-detection engine.
#[derive(Debug, Parser)]
#[command(name = "dialectic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify the hash chain of a saved ledger file
    Verify(VerifyArgs),

    /// Show the events of a saved ledger file
    Show(ShowArgs),

    /// Enter interactive REPL mode
    Repl(ReplArgs),
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Ledger file (line-delimited JSON)
    pub file: PathBuf,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Ledger file (line-delimited JSON)
    pub file: PathBuf,

    /// Maximum number of events to show (newest last)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the repl command.
#[derive(Debug, Default, Parser)]
pub struct ReplArgs {
    /// Write every engine event through to this ledger file
    #[arg(short, long)]
    pub ledger: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
