//! Interactive REPL (Read-Eval-Print Loop) mode.

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use dialectic_engine::Engine;
use dialectic_ledger::Ledger;

use crate::cli::ReplArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Run the interactive REPL.
///
/// The session holds one live engine. With `--ledger <file>`, every
/// engine event is written through to that file as it is appended;
/// otherwise the history stays in memory until `save <file>`.
pub fn run_repl(args: ReplArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Dialectic REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut engine = match &args.ledger {
        Some(path) => {
            let file = fs::File::create(path)?;
            Engine::with_ledger(Ledger::with_sink(Box::new(BufWriter::new(file))))
        }
        None => Engine::new(),
    };

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("dialectic> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, &mut engine, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
enum ReplCommand {
    Exit,
    Help,
    Assert {
        id: String,
        trust: Option<f64>,
        content: String,
    },
    Observe {
        id: String,
        trust: Option<f64>,
        content: String,
    },
    Exclusive {
        a: String,
        b: String,
        rationale: String,
    },
    Implies {
        a: String,
        b: String,
        rationale: String,
    },
    Observed {
        id: String,
        holds: bool,
        rationale: String,
    },
    Trust {
        id: String,
        delta: f64,
        reason: String,
    },
    Check,
    Claims,
    Branches,
    Fork {
        id: String,
        reason: String,
    },
    Merge {
        branch: String,
        evidence: String,
    },
    Status,
    Ledger {
        limit: Option<usize>,
    },
    Save {
        path: PathBuf,
    },
    Verify,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "assert" => parse_claim_command(&parts[1..], false),
        "observe" => parse_claim_command(&parts[1..], true),
        "exclusive" => parse_pair_command(&parts[1..], true),
        "implies" => parse_pair_command(&parts[1..], false),
        "observed" => parse_observed_command(&parts[1..]),
        "trust" => parse_trust_command(&parts[1..]),
        "check" => Ok(ReplCommand::Check),
        "claims" => Ok(ReplCommand::Claims),
        "branches" => Ok(ReplCommand::Branches),
        "fork" => parse_fork_command(&parts[1..]),
        "merge" => parse_merge_command(&parts[1..]),
        "status" => Ok(ReplCommand::Status),
        "ledger" => Ok(ReplCommand::Ledger {
            limit: parts.get(1).and_then(|s| s.parse().ok()),
        }),
        "save" => {
            let path = parts
                .get(1)
                .ok_or_else(|| CliError::InvalidInput("Usage: save <file>".to_string()))?;
            Ok(ReplCommand::Save {
                path: PathBuf::from(path),
            })
        }
        "verify" => Ok(ReplCommand::Verify),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// Execute a REPL command.
fn execute_repl_command(
    cmd: ReplCommand,
    engine: &mut Engine,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Assert { id, trust, content } => {
            let trust = trust.unwrap_or(config.settings.default_trust);
            engine.assert_claim(&id, &content, "repl", trust, None, vec![])?;
            println!("{}", formatter.success(&format!("asserted '{}'", id)));
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Observe { id, trust, content } => {
            let trust = trust.unwrap_or(config.settings.default_trust);
            engine.record_observation(&id, &content, "repl", trust, None, vec![])?;
            println!("{}", formatter.success(&format!("observed '{}'", id)));
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Exclusive { a, b, rationale } => {
            engine.declare_mutual_exclusion(&a, &b, &rationale)?;
            println!("{}", formatter.success(&format!("'{}' excludes '{}'", a, b)));
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Implies { a, b, rationale } => {
            engine.declare_implication(&a, &b, &rationale)?;
            println!("{}", formatter.success(&format!("'{}' implies '{}'", a, b)));
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Observed {
            id,
            holds,
            rationale,
        } => {
            engine.declare_observation(&id, holds, &rationale)?;
            println!(
                "{}",
                formatter.success(&format!("observed '{}' = {}", id, holds))
            );
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Trust { id, delta, reason } => {
            let updated = engine.adjust_trust(&id, delta, &reason)?;
            println!(
                "{}",
                formatter.success(&format!("trust of '{}' now {:.2}", id, updated.value()))
            );
        }
        ReplCommand::Check => {
            println!("{}", formatter.format_verdict(engine.check_consistency())?);
        }
        ReplCommand::Claims => {
            let claims: Vec<_> = engine.claims().collect();
            println!("{}", formatter.format_claims(&claims)?);
        }
        ReplCommand::Branches => {
            let branches: Vec<_> = engine.branches().collect();
            println!("{}", formatter.format_branches(&branches)?);
        }
        ReplCommand::Fork { id, reason } => {
            let (true_id, false_id) = engine.fork(&id, &reason)?;
            println!(
                "{}",
                formatter.success(&format!("forked into '{}' and '{}'", true_id, false_id))
            );
        }
        ReplCommand::Merge { branch, evidence } => {
            let resolution = engine.merge(&branch, &evidence, "merged from repl")?;
            println!(
                "{}",
                formatter.success(&format!("merged '{}': claim {}", branch, resolution.as_str()))
            );
        }
        ReplCommand::Status => {
            println!("{}", formatter.format_report(&engine.status_report())?);
        }
        ReplCommand::Ledger { limit } => {
            let events = engine.ledger().events();
            let shown = match limit {
                Some(limit) if limit < events.len() => &events[events.len() - limit..],
                _ => events,
            };
            println!("{}", formatter.format_events(shown)?);
        }
        ReplCommand::Save { path } => {
            fs::write(&path, engine.export_ledger()?)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "saved {} events to {}",
                    engine.ledger().len(),
                    path.display()
                ))
            );
        }
        ReplCommand::Verify => match engine.ledger().verify() {
            Ok(()) => println!(
                "{}",
                formatter.success(&format!("chain verified ({} events)", engine.ledger().len()))
            ),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        ReplCommand::Exit | ReplCommand::Help => unreachable!(),
    }

    Ok(())
}

// Simple command parsers for REPL (minimal argument parsing)

fn parse_claim_command(args: &[&str], observation: bool) -> Result<ReplCommand> {
    if args.len() < 2 {
        let verb = if observation { "observe" } else { "assert" };
        return Err(CliError::InvalidInput(format!(
            "Usage: {} <id> [trust] <content...>",
            verb
        )));
    }

    let id = args[0].to_string();
    // Second token is a trust score when it parses as one
    let (trust, content_start) = match args[1].parse::<f64>() {
        Ok(value) => (Some(value), 2),
        Err(_) => (None, 1),
    };
    let content = args[content_start..].join(" ");
    if content.is_empty() {
        return Err(CliError::InvalidInput("Claim content is required".to_string()));
    }

    if observation {
        Ok(ReplCommand::Observe { id, trust, content })
    } else {
        Ok(ReplCommand::Assert { id, trust, content })
    }
}

fn parse_pair_command(args: &[&str], exclusive: bool) -> Result<ReplCommand> {
    if args.len() < 2 {
        let verb = if exclusive { "exclusive" } else { "implies" };
        return Err(CliError::InvalidInput(format!(
            "Usage: {} <claim_a> <claim_b> [rationale...]",
            verb
        )));
    }

    let a = args[0].to_string();
    let b = args[1].to_string();
    let rationale = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        "declared from repl".to_string()
    };

    if exclusive {
        Ok(ReplCommand::Exclusive { a, b, rationale })
    } else {
        Ok(ReplCommand::Implies { a, b, rationale })
    }
}

fn parse_observed_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: observed <id> <true|false> [rationale...]".to_string(),
        ));
    }

    let holds = match args[1] {
        "true" | "t" | "yes" => true,
        "false" | "f" | "no" => false,
        other => {
            return Err(CliError::InvalidInput(format!(
                "Expected true or false, got '{}'",
                other
            )))
        }
    };
    let rationale = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        "declared from repl".to_string()
    };

    Ok(ReplCommand::Observed {
        id: args[0].to_string(),
        holds,
        rationale,
    })
}

fn parse_trust_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: trust <id> <delta> [reason...]".to_string(),
        ));
    }

    let delta: f64 = args[1]
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("Invalid delta: {}", args[1])))?;
    let reason = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        "adjusted from repl".to_string()
    };

    Ok(ReplCommand::Trust {
        id: args[0].to_string(),
        delta,
        reason,
    })
}

fn parse_fork_command(args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Err(CliError::InvalidInput(
            "Usage: fork <claim_id> [reason...]".to_string(),
        ));
    }

    let reason = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "forked from repl".to_string()
    };
    Ok(ReplCommand::Fork {
        id: args[0].to_string(),
        reason,
    })
}

fn parse_merge_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: merge <branch_id> <evidence...>".to_string(),
        ));
    }

    Ok(ReplCommand::Merge {
        branch: args[0].to_string(),
        evidence: args[1..].join(" "),
    })
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dialectic_dir = home.join(".dialectic");
    std::fs::create_dir_all(&dialectic_dir)?;
    Ok(dialectic_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  assert <id> [trust] <content...>    - Assert a claim");
    println!("  observe <id> [trust] <content...>   - Assert a directly observed claim");
    println!("  exclusive <a> <b> [rationale]       - Declare claims mutually exclusive");
    println!("  implies <a> <b> [rationale]         - Declare that a entails b");
    println!("  observed <id> <true|false>          - Declare an observation about a claim");
    println!("  trust <id> <delta> [reason]         - Adjust a claim's trust score");
    println!("  check                               - Show the consistency verdict");
    println!("  claims                              - List claims");
    println!("  branches                            - List branches");
    println!("  fork <id> [reason]                  - Fork a contested claim");
    println!("  merge <branch_id> <evidence...>     - Resolve a fork");
    println!("  status                              - Aggregate counts");
    println!("  ledger [limit]                      - Show history events");
    println!("  save <file>                         - Save the ledger as NDJSON");
    println!("  verify                              - Verify the in-memory chain");
    println!("  help, ?                             - Show this help");
    println!("  exit, quit, q                       - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assert_with_trust() {
        match parse_repl_command("assert bare_metal 0.7 host is bare metal").unwrap() {
            ReplCommand::Assert { id, trust, content } => {
                assert_eq!(id, "bare_metal");
                assert_eq!(trust, Some(0.7));
                assert_eq!(content, "host is bare metal");
            }
            _ => panic!("Expected Assert"),
        }
    }

    #[test]
    fn test_parse_assert_without_trust() {
        match parse_repl_command("assert kvm KVM hypervisor present").unwrap() {
            ReplCommand::Assert { id, trust, content } => {
                assert_eq!(id, "kvm");
                assert_eq!(trust, None);
                assert_eq!(content, "KVM hypervisor present");
            }
            _ => panic!("Expected Assert"),
        }
    }

    #[test]
    fn test_parse_observed_polarity() {
        match parse_repl_command("observed kvm false probe negative").unwrap() {
            ReplCommand::Observed { id, holds, .. } => {
                assert_eq!(id, "kvm");
                assert!(!holds);
            }
            _ => panic!("Expected Observed"),
        }
        assert!(parse_repl_command("observed kvm maybe").is_err());
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(parse_repl_command("frobnicate").is_err());
    }
}
