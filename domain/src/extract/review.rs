use serde::{Deserialize, Serialize};
use std::fmt;

/// Markers that make a review line an issue line
const ISSUE_MARKERS: [&str; 7] = [
    "ERROR",
    "FLAW",
    "INCORRECT",
    "SHOULD",
    "MUST",
    "VIOLATION",
    "MISSING",
];

const MAX_ISSUES: usize = 10;

/// Vocabulary signalling a serious problem
pub const CRITICAL_WORDS: [&str; 5] = ["critical", "severe", "major error", "incorrect", "invalid"];

/// Vocabulary signalling a soft concern
pub const WARNING_WORDS: [&str; 5] = ["caution", "consider", "minor", "suggest", "could"];

/// Reviewer confidence in the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Collect up to 10 trimmed lines mentioning an issue marker.
///
/// Returns `None` when no line matches.
pub fn extract_issues(text: &str) -> Option<String> {
    let issues: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            let upper = line.to_uppercase();
            ISSUE_MARKERS.iter().any(|m| upper.contains(m))
        })
        .map(str::trim)
        .take(MAX_ISSUES)
        .collect();

    if issues.is_empty() {
        None
    } else {
        Some(issues.join("\n"))
    }
}

/// Count how many of `words` occur at least once (case-insensitive).
///
/// Repeated occurrences of the same word count once.
pub fn count_vocabulary(text: &str, words: &[&str]) -> usize {
    let lower = text.to_lowercase();
    words.iter().filter(|w| lower.contains(*w)).count()
}

/// Classify confidence from keyword counts.
///
/// Evaluated in order: LOW, then MEDIUM, then HIGH.
pub fn classify_confidence(critical: usize, warning: usize, issue_lines: usize) -> Confidence {
    if critical >= 2 || issue_lines > 5 {
        Confidence::Low
    } else if critical >= 1 || warning >= 3 {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

/// Run the issue scan and confidence classification over one review text
pub fn assess_review(text: &str) -> (Option<String>, Confidence) {
    let issues = extract_issues(text);
    let issue_lines = issues.as_deref().map_or(0, |s| s.split('\n').count());
    let confidence = classify_confidence(
        count_vocabulary(text, &CRITICAL_WORDS),
        count_vocabulary(text, &WARNING_WORDS),
        issue_lines,
    );
    (issues, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_none_when_clean() {
        assert_eq!(extract_issues("Looks fine.\nGood work."), None);
        assert_eq!(extract_issues(""), None);
    }

    #[test]
    fn test_issues_trimmed_and_case_insensitive() {
        let text = "Intro\n   You should report CIs.  \nThe model is fine\n- missing data not handled";
        assert_eq!(
            extract_issues(text).as_deref(),
            Some("You should report CIs.\n- missing data not handled")
        );
    }

    #[test]
    fn test_issues_capped_at_ten() {
        let text = (0..15)
            .map(|i| format!("issue {i}: must fix"))
            .collect::<Vec<_>>()
            .join("\n");
        let issues = extract_issues(&text).unwrap();
        let lines: Vec<&str> = issues.split('\n').collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "issue 0: must fix");
        assert!(lines.iter().all(|l| l.to_uppercase().contains("MUST")));
    }

    #[test]
    fn test_count_vocabulary_counts_distinct_words() {
        let text = "Critical flaw. Another CRITICAL flaw. Invalid test.";
        assert_eq!(count_vocabulary(text, &CRITICAL_WORDS), 2);
        assert_eq!(count_vocabulary("nothing here", &WARNING_WORDS), 0);
    }

    #[test]
    fn test_confidence_order_of_evaluation() {
        assert_eq!(classify_confidence(2, 0, 0), Confidence::Low);
        assert_eq!(classify_confidence(0, 0, 6), Confidence::Low);
        assert_eq!(classify_confidence(1, 0, 0), Confidence::Medium);
        assert_eq!(classify_confidence(0, 3, 5), Confidence::Medium);
        assert_eq!(classify_confidence(0, 2, 5), Confidence::High);
    }

    #[test]
    fn test_assess_review() {
        let text = "Consider a sensitivity analysis.\nYou could add splines.\nI suggest bootstrapping.";
        let (issues, confidence) = assess_review(text);
        assert_eq!(issues, None);
        assert_eq!(confidence, Confidence::Medium);
    }

    #[test]
    fn test_confidence_wire_format() {
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"LOW\"");
        assert_eq!(Confidence::High.to_string(), "HIGH");
    }
}
