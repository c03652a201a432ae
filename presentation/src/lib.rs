//! Presentation layer for stats-council
//!
//! This crate contains the CLI definition, progress reporters, console
//! output, the interactive approval gate and the artifact writer.

pub mod approval;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use approval::interactive::{GateCommand, InteractiveApproval, parse_command};
pub use cli::commands::{Cli, ModeArg};
pub use output::artifacts::{ArtifactError, ArtifactWriter};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
