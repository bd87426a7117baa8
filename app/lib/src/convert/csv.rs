//! CSV reading and writing.

use std::io::Read;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use super::tabular::{TabularData, Value};
use crate::error::{ConvertError, Result};

/// Parse CSV with a header row.
///
/// Rows may have a different number of fields than the header; short rows
/// are padded with nulls.
pub fn read_csv<R: Read>(reader: R) -> Result<TabularData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ConvertError::parse("csv", e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConvertError::parse("csv", e.to_string()))?;
        // Blank lines come through as a single empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(Value::infer).collect());
    }

    Ok(TabularData::from_rows(headers, rows))
}

/// Serialize to CSV text with a header row and `\n` line endings.
pub fn write_csv(data: &TabularData, delimiter: u8) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(data.column_names())?;
    for row in data.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ConvertError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ConvertError::parse("csv", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_typed_values() {
        let data = read_csv("id,name,score\n1,alice,9.5\n2,bob,\n".as_bytes()).unwrap();
        assert_eq!(data.row_count, 2);
        assert_eq!(data.column_names(), vec!["id", "name", "score"]);
        assert_eq!(data.columns[0].values, vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(data.columns[2].values, vec![Value::Float(9.5), Value::Null]);
    }

    #[test]
    fn test_read_quoted_fields() {
        let data = read_csv("name,city\n\"Doe, J\",Oslo\n".as_bytes()).unwrap();
        assert_eq!(data.columns[0].values[0], Value::String("Doe, J".into()));
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let data = read_csv("a,b\n1,2\n\n3,4\n".as_bytes()).unwrap();
        assert_eq!(data.row_count, 2);
    }

    #[test]
    fn test_read_header_only() {
        let data = read_csv("a,b\n".as_bytes()).unwrap();
        assert_eq!(data.row_count, 0);
        assert_eq!(data.column_count(), 2);
    }

    #[test]
    fn test_write_csv() {
        let data = read_csv("id,name\n1,\"Doe, J\"\n2,\n".as_bytes()).unwrap();
        let out = write_csv(&data, b',').unwrap();
        assert_eq!(out, "id,name\n1,\"Doe, J\"\n2,\n");
    }

    #[test]
    fn test_write_with_semicolon() {
        let data = read_csv("a,b\n1,2\n".as_bytes()).unwrap();
        assert_eq!(write_csv(&data, b';').unwrap(), "a;b\n1;2\n");
    }
}
