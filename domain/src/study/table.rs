//! In-memory tabular data with a minimal CSV codec

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A rectangular table of raw string cells
///
/// Used both for the input dataset and for tables returned by the sandbox.
/// Cells are kept as text; typing happens in [`DataTable::profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build a table, checking that every row has one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DomainError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(DomainError::MalformedTable(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Parse CSV text with a header row.
    ///
    /// Handles quoted fields, doubled quotes and line breaks inside quotes.
    /// Short rows are padded with empty cells; long rows are rejected.
    pub fn parse_csv(text: &str) -> Result<Self, DomainError> {
        let mut records = parse_records(text)?.into_iter();
        let columns = records
            .next()
            .ok_or_else(|| DomainError::MalformedTable("missing header row".to_string()))?;

        let mut rows = Vec::new();
        for (i, mut record) in records.enumerate() {
            if record.len() > columns.len() {
                return Err(DomainError::MalformedTable(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    record.len(),
                    columns.len()
                )));
            }
            record.resize(columns.len(), String::new());
            rows.push(record);
        }

        Ok(Self { columns, rows })
    }

    /// Serialize back to CSV, quoting only where needed
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, &self.columns);
        for row in &self.rows {
            write_record(&mut out, row);
        }
        out
    }

    /// Plain aligned-column rendering for prompt context
    pub fn to_text(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                self.rows
                    .iter()
                    .map(|r| r[c].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        std::iter::once(render(&self.columns))
            .chain(self.rows.iter().map(|r| render(r)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[index].as_str())
    }
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>, DomainError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DomainError::MalformedTable(
            "unterminated quoted field".to_string(),
        ));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    Ok(records)
}

/// Skip lines that are entirely empty
fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if !(record.len() == 1 && record[0].is_empty()) {
        records.push(record);
    }
}

fn write_record(out: &mut String, cells: &[String]) {
    let line = cells
        .iter()
        .map(|cell| {
            if cell.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let table = DataTable::parse_csv("age,bmi\n34,22.5\n51,31.0\n").unwrap();
        assert_eq!(table.columns(), &["age", "bmi"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1], vec!["51", "31.0"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = "name,note\r\n\"Smith, J\",\"said \"\"ok\"\"\"\n\"multi\nline\",x\n";
        let table = DataTable::parse_csv(csv).unwrap();
        assert_eq!(table.rows()[0], vec!["Smith, J", "said \"ok\""]);
        assert_eq!(table.rows()[1], vec!["multi\nline", "x"]);
    }

    #[test]
    fn test_short_rows_padded_long_rows_rejected() {
        let table = DataTable::parse_csv("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2", ""]);
        assert!(DataTable::parse_csv("a,b\n1,2,3\n").is_err());
    }

    #[test]
    fn test_blank_lines_and_missing_header() {
        let table = DataTable::parse_csv("a\n\n1\n\n").unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(DataTable::parse_csv("").is_err());
        assert!(DataTable::parse_csv("a\n\"open").is_err());
    }

    #[test]
    fn test_to_csv_quotes_when_needed() {
        let table = DataTable::new(
            vec!["id".into(), "label".into()],
            vec![vec!["1".into(), "a, b".into()]],
        )
        .unwrap();
        let csv = table.to_csv();
        assert_eq!(csv, "id,label\n1,\"a, b\"\n");
        assert_eq!(DataTable::parse_csv(&csv).unwrap(), table);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        assert!(DataTable::new(vec!["a".into()], vec![vec![]]).is_err());
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let table = DataTable::parse_csv("var,OR\nage,1.02\nbmi,1.5\n").unwrap();
        assert_eq!(table.to_text(), "var    OR\nage  1.02\nbmi   1.5");
    }
}
