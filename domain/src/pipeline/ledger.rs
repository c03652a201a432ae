use super::stage::Stage;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running spend across the pipeline, in USD
///
/// Only ever grows. A redo adds to the stage's existing entry because the
/// money was already spent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostLedger {
    total: f64,
    by_stage: BTreeMap<Stage, f64>,
}

impl CostLedger {
    /// Record spend against a stage. Negative or NaN amounts are ignored.
    pub fn add(&mut self, stage: Stage, amount: f64) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        self.total += amount;
        *self.by_stage.entry(stage).or_insert(0.0) += amount;
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn stage(&self, stage: Stage) -> f64 {
        self.by_stage.get(&stage).copied().unwrap_or(0.0)
    }

    pub fn breakdown(&self) -> &BTreeMap<Stage, f64> {
        &self.by_stage
    }
}
