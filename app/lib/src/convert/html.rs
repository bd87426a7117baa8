//! HTML table reading (first `<table>` in the document) and writing.

use quick_xml::escape::escape;
use scraper::{ElementRef, Html, Selector};

use super::tabular::{TabularData, Value};
use crate::error::{ConvertError, Result};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ConvertError::parse("html", e.to_string()))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Cells of `row` itself, excluding those of tables nested inside it.
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .collect()
}

/// Whether `row` belongs to `table` rather than to a table nested in it.
fn owned_by(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
        .is_some_and(|owner| owner.id() == table.id())
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "thead")
}

/// Parse the first table of an HTML document.
///
/// Header names come from the `<thead>` row, else from a leading row made of
/// `<th>` cells only, else they are the column positions `0`, `1`, ...
pub fn read_html(content: &str) -> Result<TabularData> {
    let document = Html::parse_document(content);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ConvertError::parse("html", "No tables found"))?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<Value>> = Vec::new();

    let own_rows = table.select(&row_sel).filter(|row| owned_by(*row, table));
    for (idx, row) in own_rows.enumerate() {
        let cells = row_cells(row);
        let all_th = !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th");
        if headers.is_none() && (in_thead(row) || (idx == 0 && all_th)) {
            headers = Some(cells.into_iter().map(cell_text).collect());
            continue;
        }
        rows.push(cells.into_iter().map(|c| Value::infer(&cell_text(c))).collect());
    }

    let headers = headers.unwrap_or_else(|| {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..width).map(|i| i.to_string()).collect()
    });
    Ok(TabularData::from_rows(headers, rows))
}

/// Serialize as a bordered `dataframe` table.
pub fn write_html(data: &TabularData) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for column in &data.columns {
        html.push_str(&format!("      <th>{}</th>\n", escape(column.name.as_str())));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in data.rows() {
        html.push_str("    <tr>\n");
        for value in row {
            html.push_str(&format!("      <td>{}</td>\n", escape(value.to_string())));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_thead_table() {
        let html = "<html><body><table>\
            <thead><tr><th>id</th><th>name</th></tr></thead>\
            <tbody><tr><td>1</td><td>alice</td></tr><tr><td>2</td><td></td></tr></tbody>\
            </table><table><tr><td>ignored</td></tr></table></body></html>";
        let data = read_html(html).unwrap();
        assert_eq!(data.column_names(), vec!["id", "name"]);
        assert_eq!(data.row_count, 2);
        assert_eq!(data.columns[0].values, vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(data.columns[1].values[1], Value::Null);
    }

    #[test]
    fn test_read_th_first_row() {
        let data = read_html("<table><tr><th>a</th><th>b</th></tr><tr><td>x</td><td>1.5</td></tr></table>").unwrap();
        assert_eq!(data.column_names(), vec!["a", "b"]);
        assert_eq!(data.columns[1].values[0], Value::Float(1.5));
    }

    #[test]
    fn test_read_headerless_table() {
        let data = read_html("<table><tr><td>x</td><td>y</td></tr></table>").unwrap();
        assert_eq!(data.column_names(), vec!["0", "1"]);
        assert_eq!(data.row_count, 1);
    }

    #[test]
    fn test_read_without_table() {
        let err = read_html("<p>nothing here</p>").unwrap_err();
        assert!(err.to_string().contains("No tables found"));
    }

    #[test]
    fn test_read_ignores_nested_tables() {
        let html = "<table>\
            <tr><th>a</th><th>b</th></tr>\
            <tr><td>1</td><td><table><tr><td>x</td><td>y</td><td>z</td></tr></table></td></tr>\
            <tr><td>2</td><td>w</td></tr>\
            </table>";
        let data = read_html(html).unwrap();
        assert_eq!(data.column_names(), vec!["a", "b"]);
        assert_eq!(data.row_count, 2);
        assert_eq!(data.columns[0].values, vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(data.columns[1].values[1], Value::String("w".into()));
    }

    #[test]
    fn test_write_html() {
        let data = TabularData::from_rows(
            vec!["a<b".into(), "n".into()],
            vec![vec![Value::String("x & 'y'".into()), Value::Null]],
        );
        let out = write_html(&data);
        assert!(out.starts_with("<table border=\"1\" class=\"dataframe\">\n  <thead>\n"));
        assert!(out.contains("      <th>a&lt;b</th>\n"));
        assert!(out.contains("      <td>x &amp; &apos;y&apos;</td>\n      <td></td>\n"));
        assert!(out.ends_with("</tbody>\n</table>"));
    }

    #[test]
    fn test_written_table_reads_back() {
        let data = TabularData::from_rows(
            vec!["id".into(), "score".into()],
            vec![vec![Value::Integer(1), Value::Float(2.5)]],
        );
        let back = read_html(&write_html(&data)).unwrap();
        assert_eq!(back, data);
    }
}
