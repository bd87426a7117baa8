//! JSON reading and writing.
//!
//! Input may be a records array (`[{"a": 1}, ...]`), an array of arrays, or a
//! column-oriented object (`{"a": {"0": 1, ...}}` or `{"a": [1, ...]}`).
//! Output is always a records array.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value as JsonValue};

use super::tabular::{TabularData, Value};
use crate::error::{ConvertError, Result};

/// Parse JSON text into a table, rounding floats to `round_decimals` places.
pub fn read_json(content: &str, round_decimals: Option<u32>) -> Result<TabularData> {
    let root: JsonValue =
        serde_json::from_str(content).map_err(|e| ConvertError::parse("json", e.to_string()))?;
    let convert = |v: JsonValue| to_value(v, round_decimals);

    match root {
        JsonValue::Array(items) => read_array(items, convert),
        JsonValue::Object(columns) => read_columns(columns, convert),
        other => Err(ConvertError::parse(
            "json",
            format!("expected an array or an object, found {}", kind(&other)),
        )),
    }
}

fn read_array<F>(items: Vec<JsonValue>, convert: F) -> Result<TabularData>
where
    F: Fn(JsonValue) -> Value,
{
    let mut headers: Vec<String> = Vec::new();
    let mut records: Vec<Vec<(usize, Value)>> = Vec::with_capacity(items.len());

    for item in items {
        let record = match item {
            JsonValue::Object(fields) => fields
                .into_iter()
                .map(|(key, v)| (header_index(&mut headers, key), convert(v)))
                .collect(),
            JsonValue::Array(cells) => cells
                .into_iter()
                .enumerate()
                .map(|(i, v)| (header_index(&mut headers, i.to_string()), convert(v)))
                .collect(),
            other => {
                return Err(ConvertError::parse(
                    "json",
                    format!("expected a record object, found {}", kind(&other)),
                ))
            }
        };
        records.push(record);
    }

    let width = headers.len();
    let rows = records
        .into_iter()
        .map(|record| {
            let mut row = vec![Value::Null; width];
            for (idx, value) in record {
                row[idx] = value;
            }
            row
        })
        .collect();
    Ok(TabularData::from_rows(headers, rows))
}

fn read_columns<F>(columns: Map<String, JsonValue>, convert: F) -> Result<TabularData>
where
    F: Fn(JsonValue) -> Value,
{
    let mut index: Vec<String> = Vec::new();
    let mut headers = Vec::with_capacity(columns.len());
    let mut cells: Vec<Vec<(usize, Value)>> = Vec::with_capacity(columns.len());

    for (name, column) in columns {
        let entries: Vec<(usize, Value)> = match column {
            JsonValue::Object(by_index) => by_index
                .into_iter()
                .map(|(key, v)| (header_index(&mut index, key), convert(v)))
                .collect(),
            JsonValue::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (header_index(&mut index, i.to_string()), convert(v)))
                .collect(),
            other => {
                return Err(ConvertError::parse(
                    "json",
                    format!("column '{}' must be an object or an array, found {}", name, kind(&other)),
                ))
            }
        };
        headers.push(name);
        cells.push(entries);
    }

    let mut rows = vec![vec![Value::Null; headers.len()]; index.len()];
    for (col, entries) in cells.into_iter().enumerate() {
        for (row, value) in entries {
            rows[row][col] = value;
        }
    }
    Ok(TabularData::from_rows(headers, rows))
}

/// Position of `key` in `keys`, appending it on first sight.
fn header_index(keys: &mut Vec<String>, key: String) -> usize {
    match keys.iter().position(|k| *k == key) {
        Some(idx) => idx,
        None => {
            keys.push(key);
            keys.len() - 1
        }
    }
}

fn to_value(v: JsonValue, round_decimals: Option<u32>) -> Value {
    match v {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Value::Float(match round_decimals {
                    Some(places) => round_to(f, places),
                    None => f,
                })
            }
        },
        JsonValue::String(s) => Value::String(s),
        nested => Value::String(nested.to_string()),
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

fn kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Serialize as a records array indented by `indent` spaces (0 for compact).
pub fn write_json(data: &TabularData, indent: usize) -> Result<String> {
    let records: Vec<JsonValue> = data
        .rows()
        .map(|row| {
            let fields: Map<String, JsonValue> = data
                .columns
                .iter()
                .zip(row)
                .map(|(col, v)| (col.name.clone(), to_json(v)))
                .collect();
            JsonValue::Object(fields)
        })
        .collect();

    if indent == 0 {
        return Ok(serde_json::to_string(&records)?);
    }

    let indent_bytes = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent_bytes));
    records.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ConvertError::parse("json", e.to_string()))
}

fn to_json(v: &Value) -> JsonValue {
    match v {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::from(*i),
        Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}
