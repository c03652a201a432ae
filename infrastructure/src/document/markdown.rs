//! Markdown manuscript builder

use council_domain::{DataTable, JournalFormat, ManuscriptSections};
use std::collections::BTreeMap;
use std::fmt::Write;

pub const MANUSCRIPT_TITLE: &str = "Statistical Analysis Results";

/// Full manuscript: title, the four sections, then one appendix per table
pub fn manuscript_markdown(
    sections: &ManuscriptSections,
    tables: &BTreeMap<String, DataTable>,
    journal: &JournalFormat,
) -> String {
    let mut md = format!("# {MANUSCRIPT_TITLE}\n\n*Formatted for {}*\n\n", journal.name);
    for (heading, body) in [
        ("Methods", &sections.methods),
        ("Results", &sections.results),
        ("Figure Legends", &sections.legends),
        ("Limitations", &sections.limitations),
    ] {
        let _ = write!(md, "## {heading}\n\n{}\n\n", body.trim());
    }

    for (name, table) in tables {
        let _ = write!(md, "## Appendix: {name}\n\n{}\n", pipe_table(table));
    }
    md
}

/// GitHub-style pipe table; pipes inside cells are escaped
fn pipe_table(table: &DataTable) -> String {
    let row = |cells: &[String]| {
        let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
        format!("| {} |\n", escaped.join(" | "))
    };
    let mut out = row(table.columns());
    out.push_str(&format!("|{}\n", " --- |".repeat(table.column_count())));
    for r in table.rows() {
        out.push_str(&row(r.as_slice()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> ManuscriptSections {
        ManuscriptSections {
            methods: "Logistic regression was used.\n".into(),
            results: "OR 1.08".into(),
            legends: "Figure 1. Forest plot.".into(),
            limitations: "Retrospective design.".into(),
        }
    }

    #[test]
    fn test_sections_in_order() {
        let md = manuscript_markdown(&sections(), &BTreeMap::new(), JournalFormat::lookup("JBJS"));
        assert!(md.starts_with("# Statistical Analysis Results\n\n*Formatted for Journal of Bone and Joint Surgery*"));
        let positions: Vec<usize> = ["## Methods", "## Results", "## Figure Legends", "## Limitations"]
            .iter()
            .map(|h| md.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(md.contains("## Methods\n\nLogistic regression was used.\n\n## Results"));
        assert!(!md.contains("Appendix"));
    }

    #[test]
    fn test_table_appendix() {
        let mut tables = BTreeMap::new();
        tables.insert(
            "table_1".to_string(),
            DataTable::parse_csv("variable,value\n\"a|b\",1\n").unwrap(),
        );
        let md = manuscript_markdown(&sections(), &tables, JournalFormat::generic());
        assert!(md.contains(
            "## Appendix: table_1\n\n| variable | value |\n| --- | --- |\n| a\\|b | 1 |\n"
        ));
    }
}
