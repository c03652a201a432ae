//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::AnalysisMode;
use std::path::PathBuf;

/// How much supervision the run gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Stop at an approval gate after every stage
    Full,
    /// Approve every stage automatically
    Quick,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => AnalysisMode::FullPipeline,
            ModeArg::Quick => AnalysisMode::QuickAnalysis,
        }
    }
}

/// CLI arguments for stats-council
#[derive(Parser, Debug)]
#[command(name = "stats-council")]
#[command(author, version, about = "Stats Council - a council of LLMs plans, runs and writes up a statistical analysis")]
#[command(long_about = r#"
Stats Council runs a dataset through six stages, each answered by one or more
LLMs and each followed by an approval gate:

1. Data Audit:               data quality review
2. Planning Council:         three proposals and a synthesized plan
3. Assumption Verification:  checks the plan's statistical assumptions
4. Code Generation:          writes, verifies and runs the analysis script
5. Adversarial Review:       two independent critiques
6. Results Writing:          methods, results, legends and limitations

At each gate you can approve (with optional instructions), redo the stage,
revise the previous stage, restart from the audit, or abort.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/stats-council/config.toml   Global config

Credentials come from OPENROUTER_API_KEY (required) and OPENAI_API_KEY.

Example:
  stats-council --data cohort.csv -q "Does BMI predict complications?" \
      --outcome complication --exposure bmi --journal JBJS
  stats-council --data cohort.csv --outcome complication --exposure bmi --mode quick
"#)]
pub struct Cli {
    /// Dataset to analyse (CSV)
    #[arg(short, long, value_name = "PATH", required_unless_present = "show_config")]
    pub data: Option<PathBuf>,

    /// Research question
    #[arg(short = 'q', long, value_name = "TEXT", default_value = "")]
    pub question: String,

    /// Outcome variable (column name)
    #[arg(long, value_name = "COLUMN", default_value = "")]
    pub outcome: String,

    /// Exposure or predictor variable (column name)
    #[arg(long, value_name = "COLUMN", default_value = "")]
    pub exposure: String,

    /// Covariates, comma-separated
    #[arg(long, value_name = "COLUMNS", default_value = "")]
    pub covariates: String,

    /// Hypotheses, free text
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub hypotheses: String,

    /// Study design (e.g. "Retrospective Cohort", "RCT")
    #[arg(long, value_name = "DESIGN")]
    pub design: Option<String>,

    /// Target journal (Generic, JBJS, CORR, JAMIA, JOA, Spine, AJSM)
    #[arg(short, long, value_name = "JOURNAL")]
    pub journal: Option<String>,

    /// Analysis mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Shorthand for --mode quick
    #[arg(long, conflicts_with = "mode")]
    pub auto_approve: bool,

    /// Directory for the manuscript, script, figures and audit trail
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write daily-rotated logs into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Suppress progress indicators
    #[arg(long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Mode requested on the command line, if any
    pub fn requested_mode(&self) -> Option<AnalysisMode> {
        if self.auto_approve {
            Some(AnalysisMode::QuickAnalysis)
        } else {
            self.mode.map(Into::into)
        }
    }
}
