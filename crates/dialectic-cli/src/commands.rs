//! One-shot command execution against saved ledger files.

use std::fs;

use dialectic_ledger::Ledger;

use crate::cli::{ShowArgs, VerifyArgs};
use crate::error::Result;
use crate::output::Formatter;

/// Verify the hash chain of a saved ledger file.
pub fn execute_verify(args: VerifyArgs, formatter: &Formatter) -> Result<()> {
    let contents = fs::read_to_string(&args.file)?;
    let ledger = Ledger::import_ndjson(&contents)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Chain verified: {} events, head {}",
            ledger.len(),
            ledger.head_hash()
        ))
    );
    Ok(())
}

/// Show the events of a saved ledger file (verifies it first).
pub fn execute_show(args: ShowArgs, formatter: &Formatter) -> Result<()> {
    let contents = fs::read_to_string(&args.file)?;
    let ledger = Ledger::import_ndjson(&contents)?;

    let events = ledger.events();
    let shown = match args.limit {
        Some(limit) if limit < events.len() => &events[events.len() - limit..],
        _ => events,
    };
    println!("{}", formatter.format_events(shown)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use dialectic_engine::Engine;

    fn saved_ledger(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let mut engine = Engine::new();
        engine
            .assert_claim("a", "claim a", "test", 0.6, None, vec![])
            .unwrap();
        engine
            .assert_claim("b", "claim b", "test", 0.6, None, vec![])
            .unwrap();
        engine.declare_mutual_exclusion("a", "b", "exclusive").unwrap();

        let path = dir.path().join("history.ndjson");
        fs::write(&path, engine.export_ledger().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_verify_accepts_intact_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let file = saved_ledger(&dir);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        assert!(execute_verify(VerifyArgs { file }, &formatter).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let file = saved_ledger(&dir);

        let contents = fs::read_to_string(&file).unwrap();
        let tampered = contents.replace("\"claim\":\"a\"", "\"claim\":\"z\"");
        assert_ne!(contents, tampered, "tamper edit must hit a record");
        fs::write(&file, tampered).unwrap();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_verify(VerifyArgs { file }, &formatter);
        assert!(matches!(result, Err(CliError::Ledger(_))));
    }

    #[test]
    fn test_show_runs_over_a_saved_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let file = saved_ledger(&dir);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = ShowArgs {
            file,
            limit: Some(2),
        };
        assert!(execute_show(args, &formatter).is_ok());
    }
}
