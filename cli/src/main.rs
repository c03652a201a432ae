//! CLI entrypoint for Stats Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    ApprovalPort, ConversationLogger, CompletionClient, NoConversationLogger, NoProgress,
    ProgressNotifier, RunPipelineError, RunPipelineInput, RunPipelineOutput, RunPipelineUseCase,
    StageOrchestrator,
};
use council_domain::{AnalysisMode, Credentials, ResearchContext, StudyDesign};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalPythonExecutor, OpenRouterGateway,
    PandocRenderer, load_dataset,
};
use council_presentation::{
    ArtifactWriter, Cli, ConsoleFormatter, InteractiveApproval, ProgressReporter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const COMPLETION_KEY_VAR: &str = "OPENROUTER_API_KEY";
const SANDBOX_KEY_VAR: &str = "OPENAI_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Kept alive until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting Stats Council");

    if cli.show_config {
        println!("Configuration sources (highest priority first):");
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let file_config = ConfigLoader::load(cli.config.as_deref())?;
    let config = file_config.to_council_config()?;

    if cli.no_color || !file_config.output.color {
        colored::control::set_override(false);
    }

    let credentials = Credentials::new(env_key(COMPLETION_KEY_VAR), env_key(SANDBOX_KEY_VAR));
    let Some(api_key) = credentials.completion_api_key().map(str::to_string) else {
        bail!("{} is not set; it is required for completion calls", COMPLETION_KEY_VAR);
    };

    let Some(data_path) = cli.data.as_deref() else {
        bail!("--data is required");
    };
    let dataset = load_dataset(data_path)?;
    let context = research_context(&cli, &file_config);
    let mode = match cli.requested_mode() {
        Some(mode) => mode,
        None => file_config.output.mode.parse::<AnalysisMode>()?,
    };
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| file_config.output.directory.clone());

    // === Dependency Injection ===
    let gateway = Arc::new(OpenRouterGateway::new(api_key, file_config.gateway.settings()));
    let logger: Arc<dyn ConversationLogger> = if file_config.output.conversation_log {
        match JsonlConversationLogger::in_dir(&output_dir) {
            Some(logger) => {
                info!("Conversation transcript: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        }
    } else {
        Arc::new(NoConversationLogger)
    };

    let client = CompletionClient::new(gateway).with_logger(logger.clone());
    let executor = Arc::new(LocalPythonExecutor::new(file_config.sandbox.settings()?));
    let renderer = Arc::new(PandocRenderer::new(file_config.output.pandoc.clone()));
    let orchestrator = StageOrchestrator::new(client, executor, renderer, config);
    let approval: Arc<dyn ApprovalPort> = Arc::new(InteractiveApproval::new());
    let use_case = RunPipelineUseCase::new(orchestrator, approval).with_logger(logger);

    if !cli.quiet {
        println!();
        println!(
            "{}",
            ConsoleFormatter::run_banner(&context, &dataset.profile(), mode)
        );
    }

    let input = RunPipelineInput::new(dataset, context, credentials).with_mode(mode);
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let output = match use_case
        .execute_with_progress(input, progress.as_ref())
        .await
    {
        Ok(output) => output,
        Err(RunPipelineError::Aborted(partial)) => {
            info!("Run aborted at {}", partial.state.current());
            *partial
        }
        Err(e) => return Err(e.into()),
    };

    let written = export(&output, &output_dir)?;
    println!("{}", ConsoleFormatter::final_summary(&output.state, &written));
    Ok(())
}

fn export(output: &RunPipelineOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    ArtifactWriter::new(dir)
        .write_all(&output.state, &output.trail)
        .with_context(|| format!("Failed to export artifacts to {}", dir.display()))
}

/// Merge command-line study details over the configured defaults
fn research_context(cli: &Cli, file_config: &FileConfig) -> ResearchContext {
    let design_label = cli
        .design
        .as_deref()
        .unwrap_or(&file_config.output.study_design);
    let design = match design_label.parse::<StudyDesign>() {
        Ok(design) => design,
        Err(e) => {
            warn!("{}; using {}", e, StudyDesign::default());
            StudyDesign::default()
        }
    };
    let journal = cli
        .journal
        .clone()
        .unwrap_or_else(|| file_config.output.journal.clone());

    ResearchContext::new(cli.question.clone(), cli.outcome.clone(), cli.exposure.clone())
        .with_covariates(cli.covariates.clone())
        .with_hypotheses(cli.hypotheses.clone())
        .with_design(design)
        .with_journal(journal)
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Initialize logging based on verbosity level, optionally teeing into a
/// daily-rotated file
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "stats-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}
