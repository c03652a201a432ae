/// Markers that open a disagreement section
const SECTION_MARKERS: [&str; 3] = ["DISAGREEMENT", "CONFLICT", "DIFFER"];

/// Extract the disagreement section from a synthesis response.
///
/// Only triggers when the text mentions DISAGREEMENT or CONFLICT
/// (case-insensitive). Capture starts at the first line containing any of
/// DISAGREEMENT, CONFLICT or DIFFER and stops at the first blank line once
/// at least four lines have been collected (the blank line is kept).
///
/// Returns `None` when nothing triggers.
pub fn extract_disagreements(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    if !upper.contains("DISAGREEMENT") && !upper.contains("CONFLICT") {
        return None;
    }

    let mut collected: Vec<&str> = Vec::new();
    let mut capturing = false;

    for line in text.split('\n') {
        if !capturing {
            let line_upper = line.to_uppercase();
            capturing = SECTION_MARKERS.iter().any(|m| line_upper.contains(m));
        }
        if capturing {
            collected.push(line);
            if line.trim().is_empty() && collected.len() > 3 {
                break;
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_yields_none() {
        let text = "Use logistic regression.\nAdjust for age and sex.\n\nReport odds ratios.";
        assert_eq!(extract_disagreements(text), None);
    }

    #[test]
    fn test_differ_alone_does_not_trigger() {
        // DIFFER opens a section but cannot trigger extraction on its own
        let text = "The models differ slightly on covariates.";
        assert_eq!(extract_disagreements(text), None);
    }

    #[test]
    fn test_captures_until_blank_after_four_lines() {
        let text = "## Plan\nLogistic model\n\n## Disagreements\n- V3 prefers GEE\n- R1 prefers mixed model\n- Gemini agrees with R1\n\n## Next\nignored";
        let got = extract_disagreements(text).unwrap();
        assert_eq!(
            got,
            "## Disagreements\n- V3 prefers GEE\n- R1 prefers mixed model\n- Gemini agrees with R1\n"
        );
    }

    #[test]
    fn test_early_blank_line_does_not_stop_capture() {
        let text = "Conflict noted\n\nstill part\nof the section\n\nafter";
        let got = extract_disagreements(text).unwrap();
        assert_eq!(got, "Conflict noted\n\nstill part\nof the section\n");
    }

    #[test]
    fn test_runs_to_end_without_blank() {
        let text = "intro\nCONFLICT: dose coding";
        assert_eq!(
            extract_disagreements(text).as_deref(),
            Some("CONFLICT: dose coding")
        );
    }

    #[test]
    fn test_idempotent() {
        let text = "Models disagreement on:\n1\n2\n3\n\n4";
        assert_eq!(extract_disagreements(text), extract_disagreements(text));
    }
}
