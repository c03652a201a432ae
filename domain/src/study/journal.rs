//! Journal formatting conventions
//!
//! Each target journal has its own rules for p-values, confidence intervals,
//! Table 1 layout and boilerplate statements. The record is serialized into
//! the writing prompts as pretty JSON.

use serde::Serialize;

/// How p-values are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PValueStyle {
    Exact,
    Threshold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecimalPlaces {
    pub p_value: usize,
    pub percentage: usize,
    pub mean: usize,
    pub sd: usize,
    pub effect_size: usize,
    pub ci: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table1Format {
    pub continuous_normal: &'static str,
    pub continuous_skewed: &'static str,
    pub categorical: &'static str,
    pub test_continuous_normal: &'static str,
    pub test_continuous_skewed: &'static str,
    pub test_categorical: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MlMetrics {
    pub classification: &'static [&'static str],
    pub regression: &'static [&'static str],
    pub calibration: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurvivalAnalysis {
    pub required_for: &'static [&'static str],
    pub methods: &'static [&'static str],
    pub reporting: &'static str,
}

/// Formatting record for one journal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalFormat {
    #[serde(skip)]
    pub key: &'static str,
    pub name: &'static str,
    pub p_value_format: PValueStyle,
    pub p_value_threshold: f64,
    /// Template with `{lower}` and `{upper}` placeholders
    pub ci_format: &'static str,
    pub decimal_places: DecimalPlaces,
    pub effect_size_required: bool,
    /// Template with `{n}` and `{pct}` placeholders
    pub sample_format: &'static str,
    pub table1_format: Table1Format,
    pub statistical_software_citation: &'static str,
    pub significance_statement: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_comparison_note: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub or_rr_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_metrics: Option<MlMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survival_analysis: Option<SurvivalAnalysis>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub notes: &'static [&'static str],
}

const STANDARD_DECIMALS: DecimalPlaces = DecimalPlaces {
    p_value: 3,
    percentage: 1,
    mean: 1,
    sd: 1,
    effect_size: 2,
    ci: 2,
};

/// Supported journals; the first entry is the fallback
pub static JOURNAL_FORMATS: [JournalFormat; 7] = [
    JournalFormat {
        key: "Generic",
        name: "Generic Medical Journal",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "95% CI: {lower} to {upper}",
        decimal_places: STANDARD_DECIMALS,
        effect_size_required: true,
        sample_format: "n = {n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean ± SD",
            continuous_skewed: "median (IQR)",
            categorical: "n (%)",
            test_continuous_normal: "t-test",
            test_continuous_skewed: "Mann-Whitney U",
            test_categorical: "chi-square or Fisher exact",
        },
        statistical_software_citation: "Analyses were performed using Python (version X.X) with pandas, scipy, and statsmodels packages.",
        significance_statement: "Statistical significance was set at α = 0.05 (two-tailed).",
        multiple_comparison_note: Some(
            "P-values were adjusted for multiple comparisons using the {method} method.",
        ),
        or_rr_required: false,
        ml_metrics: None,
        survival_analysis: None,
        notes: &[],
    },
    JournalFormat {
        key: "JBJS",
        name: "Journal of Bone and Joint Surgery",
        p_value_format: PValueStyle::Threshold,
        p_value_threshold: 0.05,
        ci_format: "(95% CI, {lower}-{upper})",
        decimal_places: DecimalPlaces {
            ci: 1,
            ..STANDARD_DECIMALS
        },
        effect_size_required: true,
        sample_format: "{n} patients ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean ± SD",
            continuous_skewed: "median (range)",
            categorical: "n (%)",
            test_continuous_normal: "t-test",
            test_continuous_skewed: "Mann-Whitney U",
            test_categorical: "chi-square",
        },
        statistical_software_citation: "Statistical analysis was performed using Python statistical packages.",
        significance_statement: "Significance was set at p < 0.05.",
        multiple_comparison_note: None,
        or_rr_required: true,
        ml_metrics: None,
        survival_analysis: None,
        notes: &[
            "JBJS requires effect sizes (OR, RR, HR) with confidence intervals",
            "Table 1 should include demographics stratified by exposure/outcome",
            "Power analysis should be mentioned if sample size is limited",
        ],
    },
    JournalFormat {
        key: "CORR",
        name: "Clinical Orthopaedics and Related Research",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "(95% CI: {lower} to {upper})",
        decimal_places: STANDARD_DECIMALS,
        effect_size_required: true,
        sample_format: "{n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean ± SD",
            continuous_skewed: "median (IQR)",
            categorical: "n (%)",
            test_continuous_normal: "Student t-test",
            test_continuous_skewed: "Mann-Whitney U test",
            test_categorical: "chi-square test or Fisher exact test",
        },
        statistical_software_citation: "Statistical analyses were conducted using Python (version X.X).",
        significance_statement: "A p-value < 0.05 was considered statistically significant.",
        multiple_comparison_note: None,
        or_rr_required: true,
        ml_metrics: None,
        survival_analysis: None,
        notes: &[
            "CORR emphasizes clinical significance alongside statistical significance",
            "Minimum clinically important difference should be discussed when relevant",
            "Post-hoc power analysis discouraged - report observed effect sizes instead",
        ],
    },
    JournalFormat {
        key: "JAMIA",
        name: "Journal of the American Medical Informatics Association",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "(95% CI {lower}–{upper})",
        decimal_places: DecimalPlaces {
            p_value: 3,
            percentage: 1,
            mean: 2,
            sd: 2,
            effect_size: 3,
            ci: 3,
        },
        effect_size_required: true,
        sample_format: "n = {n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean (SD)",
            continuous_skewed: "median [IQR]",
            categorical: "n (%)",
            test_continuous_normal: "t-test",
            test_continuous_skewed: "Wilcoxon rank-sum",
            test_categorical: "χ² or Fisher exact",
        },
        statistical_software_citation: "Analyses were performed in Python X.X using pandas (X.X), scipy (X.X), and statsmodels (X.X).",
        significance_statement: "Statistical significance was defined as P < .05.",
        multiple_comparison_note: None,
        or_rr_required: false,
        ml_metrics: Some(MlMetrics {
            classification: &["AUROC", "AUPRC", "sensitivity", "specificity", "PPV", "NPV", "F1"],
            regression: &["RMSE", "MAE", "R²"],
            calibration: &["Brier score", "calibration plot"],
        }),
        survival_analysis: None,
        notes: &[
            "JAMIA expects thorough reporting of ML model performance metrics",
            "Cross-validation strategy should be clearly described",
            "Feature importance or model interpretability encouraged",
            "Code/data availability statement required",
        ],
    },
    JournalFormat {
        key: "JOA",
        name: "Journal of Arthroplasty",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "(95% CI, {lower}-{upper})",
        decimal_places: STANDARD_DECIMALS,
        effect_size_required: true,
        sample_format: "{n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean ± SD",
            continuous_skewed: "median (range)",
            categorical: "n (%)",
            test_continuous_normal: "t-test",
            test_continuous_skewed: "Mann-Whitney U",
            test_categorical: "chi-square",
        },
        statistical_software_citation: "Statistical analysis was performed using Python.",
        significance_statement: "P < .05 was considered significant.",
        multiple_comparison_note: None,
        or_rr_required: false,
        ml_metrics: None,
        survival_analysis: Some(SurvivalAnalysis {
            required_for: &["revision", "implant failure", "reoperation"],
            methods: &["Kaplan-Meier", "Cox proportional hazards"],
            reporting: "Survival estimates with 95% CI at specified time points",
        }),
        notes: &[
            "JOA frequently requires survival analysis for revision outcomes",
            "Competing risks should be addressed when relevant",
            "Minimum follow-up requirements should be stated",
        ],
    },
    JournalFormat {
        key: "Spine",
        name: "Spine",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "(95% CI: {lower}, {upper})",
        decimal_places: STANDARD_DECIMALS,
        effect_size_required: true,
        sample_format: "n = {n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "Mean ± SD",
            continuous_skewed: "Median (IQR)",
            categorical: "N (%)",
            test_continuous_normal: "t test",
            test_continuous_skewed: "Mann-Whitney U test",
            test_categorical: "Chi-square test",
        },
        statistical_software_citation: "Statistical analyses were performed using Python software.",
        significance_statement: "Statistical significance was set at P < 0.05.",
        multiple_comparison_note: None,
        or_rr_required: false,
        ml_metrics: None,
        survival_analysis: None,
        notes: &[],
    },
    JournalFormat {
        key: "AJSM",
        name: "American Journal of Sports Medicine",
        p_value_format: PValueStyle::Exact,
        p_value_threshold: 0.05,
        ci_format: "(95% CI, {lower}-{upper})",
        decimal_places: STANDARD_DECIMALS,
        effect_size_required: true,
        sample_format: "{n} ({pct}%)",
        table1_format: Table1Format {
            continuous_normal: "mean ± SD",
            continuous_skewed: "median (IQR)",
            categorical: "n (%)",
            test_continuous_normal: "t-test",
            test_continuous_skewed: "Mann-Whitney U",
            test_categorical: "chi-square or Fisher exact",
        },
        statistical_software_citation: "Statistical analysis was performed using Python.",
        significance_statement: "Significance was set at P < .05.",
        multiple_comparison_note: None,
        or_rr_required: false,
        ml_metrics: None,
        survival_analysis: None,
        notes: &[
            "AJSM emphasizes functional outcomes and return-to-sport metrics",
            "MCID values should be referenced when available",
            "Subgroup analyses by sport type often expected",
        ],
    },
];

impl JournalFormat {
    /// Look up a journal by key, falling back to Generic
    pub fn lookup(key: &str) -> &'static JournalFormat {
        let key = key.trim();
        JOURNAL_FORMATS
            .iter()
            .find(|j| j.key.eq_ignore_ascii_case(key))
            .unwrap_or(&JOURNAL_FORMATS[0])
    }

    pub fn generic() -> &'static JournalFormat {
        &JOURNAL_FORMATS[0]
    }

    pub fn keys() -> impl Iterator<Item = &'static str> {
        JOURNAL_FORMATS.iter().map(|j| j.key)
    }

    /// Pretty JSON of the record, as embedded in writing prompts
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// One worked sample per number style, embedded in results prompts
    pub fn style_examples(&self) -> String {
        [
            format!("P values: {}; {}", self.format_p_value(0.0312), self.format_p_value(0.0004)),
            format!("Confidence intervals: {}", self.format_ci(1.234, 2.5)),
            format!("Sample counts: {}", self.format_sample(42, 13.333)),
            format!("Mean ± SD: {}", self.format_mean_sd(54.31, 11.5)),
            format!("Effect sizes: {}", self.format_effect_size(0.4567)),
        ]
        .join("\n")
    }

    /// `P < .001` below one in a thousand, otherwise the exact value
    fn format_p_value(&self, p: f64) -> String {
        if p < 0.001 {
            "P < .001".to_string()
        } else {
            format!("P = {:.*}", self.decimal_places.p_value, p)
        }
    }

    fn format_ci(&self, lower: f64, upper: f64) -> String {
        let d = self.decimal_places.ci;
        self.ci_format
            .replace("{lower}", &format!("{lower:.d$}"))
            .replace("{upper}", &format!("{upper:.d$}"))
    }

    fn format_sample(&self, n: u64, pct: f64) -> String {
        let d = self.decimal_places.percentage;
        self.sample_format
            .replace("{n}", &n.to_string())
            .replace("{pct}", &format!("{pct:.d$}"))
    }

    fn format_mean_sd(&self, mean: f64, sd: f64) -> String {
        let (m, s) = (self.decimal_places.mean, self.decimal_places.sd);
        format!("{mean:.m$} ± {sd:.s$}")
    }

    fn format_effect_size(&self, effect: f64) -> String {
        format!("{:.*}", self.decimal_places.effect_size, effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        assert_eq!(JournalFormat::lookup("JBJS").name, "Journal of Bone and Joint Surgery");
        assert_eq!(JournalFormat::lookup("spine").key, "Spine");
        assert_eq!(JournalFormat::lookup("Lancet").key, "Generic");
        assert_eq!(JournalFormat::keys().count(), 7);
    }

    #[test]
    fn test_p_value_formatting() {
        let jbjs = JournalFormat::lookup("JBJS");
        assert_eq!(jbjs.format_p_value(0.0004), "P < .001");
        assert_eq!(jbjs.format_p_value(0.0312), "P = 0.031");
        assert_eq!(JournalFormat::generic().format_p_value(0.2), "P = 0.200");
    }

    #[test]
    fn test_ci_and_sample_formatting() {
        let jbjs = JournalFormat::lookup("JBJS");
        assert_eq!(jbjs.format_ci(1.234, 2.5), "(95% CI, 1.2-2.5)");
        assert_eq!(jbjs.format_sample(42, 13.333), "42 patients (13.3%)");
        let jamia = JournalFormat::lookup("JAMIA");
        assert_eq!(jamia.format_ci(0.81, 0.9), "(95% CI 0.810–0.900)");
        assert_eq!(jamia.format_mean_sd(3.14159, 1.0), "3.14 ± 1.00");
    }

    #[test]
    fn test_style_examples_follow_journal_rounding() {
        let jbjs = JournalFormat::lookup("JBJS").style_examples();
        assert!(jbjs.contains("P values: P = 0.031; P < .001"));
        assert!(jbjs.contains("Confidence intervals: (95% CI, 1.2-2.5)"));
        assert!(jbjs.contains("Sample counts: 42 patients (13.3%)"));
        assert!(jbjs.contains("Mean ± SD: 54.3 ± 11.5"));

        let jamia = JournalFormat::lookup("JAMIA").style_examples();
        assert!(jamia.contains("Mean ± SD: 54.31 ± 11.50"));
        assert!(jamia.contains("Effect sizes: 0.457"));
        assert_eq!(jamia.lines().count(), 5);
    }

    #[test]
    fn test_pretty_json_skips_empty_extras() {
        let json = JournalFormat::lookup("Spine").to_pretty_json();
        assert!(json.contains("\"p_value_format\": \"exact\""));
        assert!(!json.contains("notes"));
        assert!(!json.contains("\"key\""));
        let joa = JournalFormat::lookup("JOA").to_pretty_json();
        assert!(joa.contains("Kaplan-Meier"));
    }
}
