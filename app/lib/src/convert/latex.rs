//! LaTeX `tabular` output with booktabs rules (output only).

use super::tabular::TabularData;

/// Escape characters that are special in LaTeX text mode.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash "),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde "),
            '^' => out.push_str("\\textasciicircum "),
            _ => out.push(c),
        }
    }
    out
}

fn table_row(cells: Vec<String>) -> String {
    format!("{} \\\\\n", cells.join(" & "))
}

/// Serialize as a `tabular` environment. Numeric columns are right-aligned.
pub fn write_latex(data: &TabularData) -> String {
    let spec: String = data
        .columns
        .iter()
        .map(|c| if c.inferred_type.is_numeric() { 'r' } else { 'l' })
        .collect();

    let mut tex = format!("\\begin{{tabular}}{{{}}}\n\\toprule\n", spec);
    tex.push_str(&table_row(data.columns.iter().map(|c| escape_latex(&c.name)).collect()));
    tex.push_str("\\midrule\n");
    for row in data.rows() {
        tex.push_str(&table_row(row.iter().map(|v| escape_latex(&v.to_string())).collect()));
    }
    tex.push_str("\\bottomrule\n\\end{tabular}\n");
    tex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Value;

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("50% of $x_1"), "50\\% of \\$x\\_1");
        assert_eq!(escape_latex("a\\b~"), "a\\textbackslash b\\textasciitilde ");
    }

    #[test]
    fn test_write_latex() {
        let data = TabularData::from_rows(
            vec!["item".into(), "qty".into()],
            vec![vec![Value::String("R&D".into()), Value::Integer(3)]],
        );
        assert_eq!(
            write_latex(&data),
            "\\begin{tabular}{lr}\n\\toprule\nitem & qty \\\\\n\\midrule\nR\\&D & 3 \\\\\n\\bottomrule\n\\end{tabular}\n"
        );
    }
}
