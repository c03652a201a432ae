//! Column-level dataset profiling for prompt context

use super::table::DataTable;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Cell values treated as missing
const NULL_MARKERS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "NULL", "null", "None"];

const TOP_VALUES: usize = 3;

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every present value is an integer and nothing is missing
    Integer,
    /// Every present value parses as a number
    Float,
    Categorical,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnKind::Categorical)
    }

    /// Dtype label shown in the data summary
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Categorical => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two values
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub unique: usize,
    pub null_pct: f64,
    pub numeric: Option<NumericSummary>,
    /// Most frequent values for categorical columns, at most three
    pub top_values: Vec<(String, usize)>,
}

impl ColumnProfile {
    fn from_values<'a>(name: &str, values: impl Iterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.collect();
        let total = values.len();
        let present: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !is_null(v))
            .collect();
        let nulls = total - present.len();
        let null_pct = if total == 0 {
            0.0
        } else {
            nulls as f64 / total as f64 * 100.0
        };

        let parsed: Option<Vec<f64>> = if present.is_empty() {
            None
        } else {
            present.iter().map(|v| v.trim().parse::<f64>().ok()).collect()
        };

        match parsed {
            Some(numbers) => {
                let integral = nulls == 0 && present.iter().all(|v| v.trim().parse::<i64>().is_ok());
                let unique = numbers.iter().map(|n| n.to_bits()).collect::<BTreeSet<_>>().len();
                Self {
                    name: name.to_string(),
                    kind: if integral {
                        ColumnKind::Integer
                    } else {
                        ColumnKind::Float
                    },
                    unique,
                    null_pct,
                    numeric: Some(summarize(&numbers)),
                    top_values: Vec::new(),
                }
            }
            None => Self {
                name: name.to_string(),
                kind: ColumnKind::Categorical,
                unique: present.iter().collect::<BTreeSet<_>>().len(),
                null_pct,
                numeric: None,
                top_values: top_values(&present),
            },
        }
    }

    /// One summary line, e.g. `  - age (int64): 40 unique, 0.0% null, mean=...`
    pub fn summary_line(&self) -> String {
        let stats = match &self.numeric {
            Some(n) => format!(
                "mean={:.2}, std={:.2}, range=[{}, {}]",
                n.mean,
                n.std,
                self.render_number(n.min),
                self.render_number(n.max)
            ),
            None => {
                let pairs = self
                    .top_values
                    .iter()
                    .map(|(v, c)| format!("'{v}': {c}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("top values: {{{pairs}}}")
            }
        };
        format!(
            "  - {} ({}): {} unique, {:.1}% null, {}",
            self.name,
            self.kind.dtype(),
            self.unique,
            self.null_pct,
            stats
        )
    }

    fn render_number(&self, value: f64) -> String {
        match self.kind {
            ColumnKind::Integer => format!("{}", value as i64),
            _ => format!("{value:?}"),
        }
    }
}

/// Profile of a whole dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Data summary handed to the models
    pub fn summary_text(&self) -> String {
        let mut parts = vec![
            format!(
                "Dataset: {} rows × {} columns",
                self.rows,
                self.columns.len()
            ),
            "\nColumns:".to_string(),
        ];
        parts.extend(self.columns.iter().map(ColumnProfile::summary_line));
        parts.join("\n")
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl DataTable {
    pub fn profile(&self) -> DatasetProfile {
        DatasetProfile {
            rows: self.row_count(),
            columns: self
                .columns()
                .iter()
                .enumerate()
                .map(|(i, name)| ColumnProfile::from_values(name, self.column_values(i)))
                .collect(),
        }
    }
}

fn is_null(value: &str) -> bool {
    NULL_MARKERS.contains(&value.trim())
}

fn summarize(numbers: &[f64]) -> NumericSummary {
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let std = if numbers.len() < 2 {
        f64::NAN
    } else {
        (numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };
    NumericSummary {
        mean,
        std,
        min: numbers.iter().copied().fold(f64::INFINITY, f64::min),
        max: numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Most frequent values, ties broken by first appearance
fn top_values(values: &[&str]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, v) in values.iter().enumerate() {
        counts.entry(*v).or_insert((0, pos)).0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> =
        counts.into_iter().map(|(v, (c, first))| (v, c, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(TOP_VALUES)
        .map(|(v, c, _)| (v.to_string(), c))
        .collect()
}
