//! Stage 6: Manuscript Writing

use super::{StageOrchestrator, StudyInputs};
use crate::ports::llm_gateway::CompletionGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::core::string::head_chars;
use council_domain::{
    Conversation, DataTable, ExecutionOutput, ManuscriptSections, PromptTemplate, Stage,
    WritingInputs, WritingResult,
};
use std::collections::BTreeMap;
use tracing::info;

impl<G: CompletionGateway + 'static> StageOrchestrator<G> {
    /// Stage 6: four section calls to the writing model, then rendering.
    ///
    /// Sections are written concurrently; each lands in its own slot no
    /// matter which finishes first.
    pub async fn writing(
        &self,
        inputs: &StudyInputs,
        analysis_plan: &str,
        execution: &ExecutionOutput,
        review: &str,
        progress: &dyn ProgressNotifier,
    ) -> WritingResult {
        info!("Stage 6: Manuscript Writing");
        let journal = inputs.context.journal_format();
        let table_summaries = summarize_tables(&execution.tables, self.config.table_summary_limit);
        let design = inputs.context.study_design;

        let writing_inputs = WritingInputs {
            analysis_plan,
            execution_results: &execution.text,
            table_summaries: &table_summaries,
            num_figures: execution.figures.len(),
            review,
            study_design: design.as_str(),
            reporting_guideline: design.reporting_guideline(),
            journal,
            sample_size: inputs.dataset.row_count(),
        };

        let prompts = [
            PromptTemplate::methods_user(&writing_inputs),
            PromptTemplate::results_user(&writing_inputs),
            PromptTemplate::legends_user(&writing_inputs),
            PromptTemplate::limitations_user(&writing_inputs),
        ];
        let calls = prompts
            .into_iter()
            .map(|user| {
                (
                    self.config.writing_model,
                    Conversation::system_user(PromptTemplate::writing_system(), user),
                )
            })
            .collect();

        let results = self
            .fan_out(
                Stage::Writing,
                calls,
                self.config.writing_temperature,
                self.config.writing_call,
                progress,
            )
            .await;
        let cost = results.iter().map(|r| r.cost()).sum();

        let mut texts = results.iter().map(|r| r.text());
        let sections = ManuscriptSections {
            methods: texts.next().unwrap_or_default(),
            results: texts.next().unwrap_or_default(),
            legends: texts.next().unwrap_or_default(),
            limitations: texts.next().unwrap_or_default(),
        };

        let document = self
            .renderer
            .render(&sections, &execution.tables, journal)
            .await;
        if document.is_fallback() {
            info!("Manuscript rendered as plain text");
        }

        WritingResult {
            sections,
            document,
            cost,
        }
    }
}

/// Pretty JSON of `{table name: rendered table}`, each rendering capped
fn summarize_tables(tables: &BTreeMap<String, DataTable>, limit: usize) -> String {
    let rendered: BTreeMap<&str, String> = tables
        .iter()
        .map(|(name, table)| {
            let text = table.to_text();
            (name.as_str(), head_chars(&text, limit).to_string())
        })
        .collect();
    serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| "{}".to_string())
}
