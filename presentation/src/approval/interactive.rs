//! Interactive approval gate for the terminal.
//!
//! After every stage the user sees a summary of its output and picks what
//! happens next:
//!
//! ```text
//! ────────────────────────────────────────────────────────────
//!   Approval gate: Planning Council
//! ────────────────────────────────────────────────────────────
//! <stage summary>
//!
//! Commands:
//!   /approve [notes]  - Continue; notes are passed to later stages
//!   /redo             - Run this stage again
//!   /revise           - Go back and redo the previous stage
//!   /restart          - Clear everything and start from the data audit
//!   /show             - Print the stage's full output
//!   /abort            - Stop and export what exists
//!
//! council>
//! ```
//!
//! # Commands
//!
//! | Command | Aliases | Description |
//! |---------|---------|-------------|
//! | `/approve [notes]` | `approve`, `a`, `y` | Continue to the next stage |
//! | `/redo` | `redo`, `r` | Rerun the current stage |
//! | `/revise` | `revise`, `back`, `b` | Rerun the previous stage |
//! | `/restart` | `restart` | Reset the run, credentials kept |
//! | `/show` | `show`, `s` | Print the full output |
//! | `/abort` | `abort`, `quit`, `q` | Stop the run |

use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use colored::Colorize;
use council_application::ports::approval::{ApprovalDecision, ApprovalError, ApprovalPort};
use council_domain::{PipelineState, Stage};
use std::io::{self, Write};

/// A parsed gate command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCommand {
    Decide(ApprovalDecision),
    Show,
    Empty,
    Unknown(String),
}

/// Parse one line typed at the gate
pub fn parse_command(input: &str) -> GateCommand {
    let input = input.trim();
    if input.is_empty() {
        return GateCommand::Empty;
    }

    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };
    let notes = (!rest.is_empty()).then(|| rest.to_string());

    match word.to_lowercase().trim_start_matches('/') {
        "approve" | "a" | "y" | "yes" => GateCommand::Decide(ApprovalDecision::Approve(notes)),
        "redo" | "r" => GateCommand::Decide(ApprovalDecision::Redo),
        "revise" | "back" | "b" => GateCommand::Decide(ApprovalDecision::Revise),
        "restart" => GateCommand::Decide(ApprovalDecision::Restart),
        "abort" | "quit" | "q" => GateCommand::Decide(ApprovalDecision::Abort),
        "show" | "s" => GateCommand::Show,
        _ => GateCommand::Unknown(input.to_string()),
    }
}

/// Approval gate that reads decisions from stdin
pub struct InteractiveApproval;

impl InteractiveApproval {
    pub fn new() -> Self {
        Self
    }

    fn display_gate(&self, stage: Stage, state: &PipelineState) {
        let rule = "─".repeat(60);
        println!();
        println!("{}", rule.yellow().bold());
        println!(
            "{}",
            format!("  Approval gate: {}", stage.display_name())
                .yellow()
                .bold()
        );
        println!("{}", rule.yellow().bold());

        if let Some(output) = state.output(stage) {
            println!("{}", ConsoleFormatter::stage_summary(output, state.total_cost()));
        }

        println!("{}", "Commands:".cyan().bold());
        println!(
            "  {}  - Continue; notes are passed to later stages",
            "/approve [notes]".green()
        );
        println!("  {}             - Run this stage again", "/redo".yellow());
        if stage.prev().is_some() {
            println!(
                "  {}           - Go back and redo the previous stage",
                "/revise".yellow()
            );
        }
        println!(
            "  {}          - Clear everything and start from the data audit",
            "/restart".yellow()
        );
        println!("  {}             - Print the stage's full output", "/show".cyan());
        println!("  {}            - Stop and export what exists", "/abort".red());
        println!();
    }
}

/// Read user command
fn read_command() -> Result<String, ApprovalError> {
    print!("{} ", "council>".magenta().bold());
    io::stdout()
        .flush()
        .map_err(|e| ApprovalError::Io(format!("Failed to flush stdout: {}", e)))?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| ApprovalError::Io(format!("Failed to read input: {}", e)))?;
    if read == 0 {
        return Err(ApprovalError::Cancelled);
    }

    Ok(input.trim().to_string())
}

impl Default for InteractiveApproval {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalPort for InteractiveApproval {
    async fn decide(
        &self,
        stage: Stage,
        state: &PipelineState,
    ) -> Result<ApprovalDecision, ApprovalError> {
        self.display_gate(stage, state);

        loop {
            // stdin blocks; keep it off the runtime's worker threads
            let input = tokio::task::spawn_blocking(read_command)
                .await
                .map_err(|e| ApprovalError::Io(e.to_string()))??;

            match parse_command(&input) {
                GateCommand::Decide(decision) => {
                    println!();
                    match &decision {
                        ApprovalDecision::Approve(Some(notes)) => println!(
                            "{} {} (notes: {})",
                            "✓".green(),
                            "Approved".green(),
                            notes.dimmed()
                        ),
                        ApprovalDecision::Approve(None) => {
                            println!("{} {}", "✓".green(), "Approved".green())
                        }
                        ApprovalDecision::Abort => println!("{} {}", "✗".red(), "Aborting".red()),
                        other => println!("{} {}", "↺".yellow(), other.as_str().yellow()),
                    }
                    return Ok(decision);
                }
                GateCommand::Show => match state.output(stage) {
                    Some(output) => println!("{}", ConsoleFormatter::stage_detail(output)),
                    None => println!("Nothing to show for {}", stage.display_name()),
                },
                GateCommand::Empty => continue,
                GateCommand::Unknown(input) => {
                    println!();
                    println!("{} Unknown command: {}", "⚠️".yellow(), input.red());
                    println!("Available commands: /approve, /redo, /revise, /restart, /show, /abort");
                    println!();
                }
            }
        }
    }
}
