//! Progress reporting for pipeline runs

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{ModelKey, Stage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one bar per stage and a spinner for the sandbox
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    sandbox_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            sandbox_spinner: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// "Stage 2/6: Planning Council"
    pub fn stage_label(stage: Stage) -> String {
        format!(
            "Stage {}/{}: {}",
            stage.index() + 1,
            Stage::WORK.len(),
            stage.display_name()
        )
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_calls: usize) {
        let pb = self.multi.add(ProgressBar::new(total_calls as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_label(stage));
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_call_complete(&self, _stage: Stage, model: ModelKey, success: bool) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), model.display_name())
            } else {
                format!("{} {}", "x".red(), model.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage, stage_cost: f64, total_cost: f64) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!(
                "{} complete (${:.4}, total ${:.4})",
                stage.display_name().green(),
                stage_cost,
                total_cost
            ));
        }
    }

    fn on_sandbox_start(&self) {
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("Sandbox");
        spinner.set_message("running analysis script...");
        spinner.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.sandbox_spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn on_sandbox_complete(&self, succeeded: bool) {
        if let Ok(mut slot) = self.sandbox_spinner.lock()
            && let Some(spinner) = slot.take()
        {
            if succeeded {
                spinner.finish_with_message(format!("{}", "script finished".green()));
            } else {
                spinner.finish_with_message(format!("{}", "script failed".red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_calls: usize) {
        println!(
            "{} {} ({} calls)",
            "->".cyan(),
            ProgressReporter::stage_label(stage).bold(),
            total_calls
        );
    }

    fn on_call_complete(&self, _stage: Stage, model: ModelKey, success: bool) {
        if success {
            println!("  {} {}", "v".green(), model.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), model.display_name());
        }
    }

    fn on_stage_complete(&self, _stage: Stage, stage_cost: f64, total_cost: f64) {
        println!("  cost ${:.4} (total ${:.4})", stage_cost, total_cost);
        println!();
    }

    fn on_sandbox_start(&self) {
        println!("  {} running analysis script", "..".cyan());
    }

    fn on_sandbox_complete(&self, succeeded: bool) {
        if succeeded {
            println!("  {} script finished", "v".green());
        } else {
            println!("  {} script failed", "x".red());
        }
    }
}
