const FENCE: &str = "```";
const PYTHON_FENCE: &str = "```python";

/// Extract code from a model response.
///
/// Prefers a fence tagged `python`, then the first fence of any kind, then
/// the whole text verbatim. Fenced content is trimmed; an unterminated or
/// empty fence falls through to the next rule.
pub fn extract_code_block(text: &str) -> String {
    if let Some(code) = fenced(text, PYTHON_FENCE) {
        return code;
    }
    if let Some(code) = fenced(text, FENCE) {
        return code;
    }
    text.to_string()
}

fn fenced(text: &str, opener: &str) -> Option<String> {
    let start = text.find(opener)? + opener.len();
    let end = start + text[start..].find(FENCE)?;
    (end > start).then(|| text[start..end].trim().to_string())
}

/// Whether a verification response reports a problem.
///
/// Case-insensitive ERROR or BUG anywhere in the text. This over-triggers on
/// phrases like "no errors found"; a flagged result only prepends notes to
/// the code and never blocks the run.
pub fn verification_flags_problem(text: &str) -> bool {
    let upper = text.to_uppercase();
    upper.contains("ERROR") || upper.contains("BUG")
}
