//! Table rendering for query results using comfy-table.

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, Table};

/// A query result: column names and formatted rows.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names
    pub columns: Vec<String>,
    /// Rows of formatted values, one entry per column
    pub rows: Vec<Vec<String>>,
}

/// Render a result set for `sqlvec eval`.
///
/// Columns whose values all parse as numbers are right-aligned.
///
/// # Example Output
///
/// ```text
/// id  vector_extract(embedding)
///  1  [1,0,0]
///  2  [0,1,0]
/// ```
pub fn render_result_table(result: &ResultSet) -> String {
    if result.columns.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    let numeric: Vec<bool> = (0..result.columns.len())
        .map(|i| {
            !result.rows.is_empty()
                && result
                    .rows
                    .iter()
                    .all(|row| row.get(i).is_some_and(|v| v.parse::<f64>().is_ok()))
        })
        .collect();

    let align = |i: usize| {
        if numeric[i] {
            CellAlignment::Right
        } else {
            CellAlignment::Left
        }
    };

    table.set_header(
        result
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| Cell::new(name).set_alignment(align(i))),
    );

    for row in &result.rows {
        table.add_row(
            row.iter()
                .enumerate()
                .map(|(i, value)| Cell::new(value).set_alignment(align(i))),
        );
    }

    table.trim_fmt().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet {
            columns: vec!["id".to_string(), "v".to_string()],
            rows: vec![
                vec!["1".to_string(), "[1,0]".to_string()],
                vec!["20".to_string(), "[0,1]".to_string()],
            ],
        }
    }

    #[test]
    fn test_result_table_structure() {
        let output = render_result_table(&sample());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("v"));
        assert!(lines[1].contains("[1,0]"));
        assert!(lines[2].contains("[0,1]"));
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(render_result_table(&ResultSet::default()), "");

        let header_only = ResultSet {
            columns: vec!["x".to_string()],
            rows: Vec::new(),
        };
        assert!(render_result_table(&header_only).contains('x'));
    }
}
