//! Markdown pipe tables (output only).

use super::tabular::{Column, TabularData};

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn alignment(column: &Column) -> &'static str {
    if column.inferred_type.is_numeric() {
        "---:"
    } else {
        ":---"
    }
}

/// Serialize as a pipe table. Numeric columns are right-aligned.
pub fn write_markdown(data: &TabularData) -> String {
    let mut lines = Vec::with_capacity(data.row_count + 2);

    let header: Vec<String> = data.columns.iter().map(|c| escape_cell(&c.name)).collect();
    lines.push(format!("| {} |", header.join(" | ")));

    let rule: Vec<&str> = data.columns.iter().map(alignment).collect();
    lines.push(format!("|{}|", rule.join("|")));

    for row in data.rows() {
        let cells: Vec<String> = row.iter().map(|v| escape_cell(&v.to_string())).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}
