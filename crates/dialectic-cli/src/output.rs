//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

use dialectic_domain::{Branch, Claim, DiscriminatingTest, UnsatCore};
use dialectic_engine::StatusReport;
use dialectic_ledger::LedgerEvent;

use crate::config::OutputFormat;
use crate::error::Result;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format claims output.
    pub fn format_claims(&self, claims: &[&Claim]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = claims
                    .iter()
                    .map(|c| serde_json::to_value(c))
                    .collect::<std::result::Result<_, _>>()?;
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(claims
                .iter()
                .map(|c| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if claims.is_empty() {
                    return Ok(self.colorize("No claims.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Status", "Trust", "Source", "Content"]);
                for claim in claims {
                    builder.push_record([
                        claim.id.to_string(),
                        claim.status.as_str().to_string(),
                        format!("{:.2}", claim.trust.value()),
                        claim.source.clone(),
                        claim.content.clone(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format branches output.
    pub fn format_branches(&self, branches: &[&Branch]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = branches
                    .iter()
                    .map(|b| serde_json::to_value(b))
                    .collect::<std::result::Result<_, _>>()?;
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(branches
                .iter()
                .map(|b| b.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if branches.is_empty() {
                    return Ok(self.colorize("No branches.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Claim", "Assumed", "Status", "Parent hash"]);
                for branch in branches {
                    builder.push_record([
                        branch.id.to_string(),
                        branch.claim.to_string(),
                        branch.assumed.to_string(),
                        branch.status.as_str().to_string(),
                        truncate(&branch.parent_hash, 12),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a consistency verdict.
    pub fn format_verdict(&self, core: Option<&UnsatCore>) -> Result<String> {
        let Some(core) = core else {
            return Ok(self.success("Consistent: no contradiction detected"));
        };

        if matches!(self.format, OutputFormat::Json) {
            return Ok(serde_json::to_string_pretty(core)?);
        }

        let mut out = String::new();
        out.push_str(&self.error("Contradiction detected"));
        out.push('\n');
        out.push_str(&format!(
            "  implicated: {}\n  divergence: {:.4}\n",
            core.claims
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            core.divergence,
        ));
        match &core.test {
            DiscriminatingTest::DirectVerification { claim, falsifier } => {
                out.push_str(&format!("  next step: verify '{}' directly", claim));
                if let Some(falsifier) = falsifier {
                    out.push_str(&format!(" (falsifier: {})", falsifier));
                }
                out.push('\n');
            }
            DiscriminatingTest::CompetingHypotheses {
                hypothesis_a,
                hypothesis_b,
                stress_target,
                procedure,
            } => {
                out.push_str(&format!(
                    "  hypotheses: {} vs {}\n  stress target: {}\n  procedure: {}\n",
                    hypothesis_a, hypothesis_b, stress_target, procedure
                ));
            }
        }
        Ok(out)
    }

    /// Format a status report.
    pub fn format_report(&self, report: &StatusReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            _ => Ok(report.summary()),
        }
    }

    /// Format ledger events.
    pub fn format_events(&self, events: &[LedgerEvent]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(events)?),
            OutputFormat::Quiet => Ok(events
                .iter()
                .map(|e| e.hash.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if events.is_empty() {
                    return Ok(self.colorize("Empty ledger.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Event", "Timestamp", "Hash", "Prev"]);
                for (index, event) in events.iter().enumerate() {
                    builder.push_record([
                        index.to_string(),
                        event.kind.as_str().to_string(),
                        event.timestamp.to_string(),
                        truncate(&event.hash, 12),
                        truncate(&event.prev_hash, 12),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn truncate(text: &str, len: usize) -> String {
    if text.len() <= len {
        text.to_string()
    } else {
        format!("{}…", &text[..len])
    }
}
