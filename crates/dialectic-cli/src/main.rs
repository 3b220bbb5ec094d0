//! Dialectic CLI - command-line interface for the contradiction engine.

use clap::Parser;
use dialectic_cli::{commands, repl};
use dialectic_cli::{Cli, Command, Config, Formatter};
use tracing::Level;

fn main() {
    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::WARN)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        None => {
            repl::run_repl(Default::default(), &config, &formatter)?;
        }
        Some(Command::Repl(args)) => {
            repl::run_repl(args, &config, &formatter)?;
        }
        Some(Command::Verify(args)) => {
            commands::execute_verify(args, &formatter)?;
        }
        Some(Command::Show(args)) => {
            commands::execute_show(args, &formatter)?;
        }
    }

    Ok(())
}
