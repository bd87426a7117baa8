//! XML reading and writing.
//!
//! Every child element of the document root is a row. A row's attributes and
//! its child elements become columns; elements nested deeper than that are
//! skipped.

use std::fmt::Write as FmtWrite;

use quick_xml::escape::{escape, resolve_predefined_entity};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

use super::tabular::{unique_names, TabularData, Value};
use crate::error::{ConvertError, Result};

/// Nesting levels below the document: root, row, field.
const ROW_DEPTH: usize = 1;
const FIELD_DEPTH: usize = 2;

/// Parse XML text into a table.
pub fn read_xml(content: &str) -> Result<TabularData> {
    let mut reader = Reader::from_str(content);
    // Text is trimmed per field instead; trimming here would eat spaces next
    // to entity references.
    reader.config_mut().trim_text(false);

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<(usize, Value)>> = Vec::new();
    let mut row: Vec<(usize, Value)> = Vec::new();
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ConvertError::parse("xml", format!("at byte {}: {}", reader.buffer_position(), e)))?;
        match event {
            Event::Start(e) => {
                match depth {
                    ROW_DEPTH => row = attributes(&e, &mut headers)?,
                    FIELD_DEPTH => field = Some((element_name(&e), String::new())),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                ROW_DEPTH => {
                    let cells = attributes(&e, &mut headers)?;
                    rows.push(cells);
                }
                FIELD_DEPTH => {
                    let idx = header_index(&mut headers, element_name(&e));
                    row.push((idx, Value::Null));
                }
                _ => {}
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    ROW_DEPTH => rows.push(std::mem::take(&mut row)),
                    FIELD_DEPTH => {
                        if let Some((name, text)) = field.take() {
                            let idx = header_index(&mut headers, name);
                            row.push((idx, Value::infer(text.trim())));
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) if depth == FIELD_DEPTH + 1 => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::CData(c) if depth == FIELD_DEPTH + 1 => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::GeneralRef(r) if depth == FIELD_DEPTH + 1 => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&resolve_reference(&r)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ConvertError::parse("xml", "unexpected end of document"));
    }

    // Rows are kept as (column, value) pairs until every header is known.
    let width = headers.len();
    let rows = rows
        .into_iter()
        .map(|cells| {
            let mut row = vec![Value::Null; width];
            for (idx, value) in cells {
                row[idx] = value;
            }
            row
        })
        .collect();
    Ok(TabularData::from_rows(headers, rows))
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>, headers: &mut Vec<String>) -> Result<Vec<(usize, Value)>> {
    let mut cells = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ConvertError::parse("xml", err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| ConvertError::parse("xml", err.to_string()))?;
        cells.push((header_index(headers, key), Value::infer(&value)));
    }
    Ok(cells)
}

fn header_index(headers: &mut Vec<String>, name: String) -> usize {
    match headers.iter().position(|h| *h == name) {
        Some(idx) => idx,
        None => {
            headers.push(name);
            headers.len() - 1
        }
    }
}

/// Resolve a character reference or one of the five predefined entities.
/// Anything else is kept as written.
fn resolve_reference(r: &BytesRef<'_>) -> Result<String> {
    let ch = r
        .resolve_char_ref()
        .map_err(|err| ConvertError::parse("xml", err.to_string()))?;
    if let Some(ch) = ch {
        return Ok(ch.to_string());
    }
    let name = String::from_utf8_lossy(r);
    Ok(resolve_predefined_entity(&name).map_or_else(|| format!("&{};", name), String::from))
}

/// Make a column name usable as an element name: spaces and other invalid
/// characters become `_`, and a leading digit gets a `_` prefix.
pub fn element_safe(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !out.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    out
}

/// Serialize with an XML declaration, a `root` element and one `row` element per row.
pub fn write_xml(data: &TabularData, root: &str, row: &str) -> Result<String> {
    // Distinct columns may sanitize to the same element name.
    let names = unique_names(data.columns.iter().map(|c| element_safe(&c.name)).collect());
    let root = element_safe(root);
    let row_name = element_safe(row);

    let mut xml = String::new();
    xml.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
    writeln!(xml, "<{}>", root).map_err(fmt_error)?;
    for values in data.rows() {
        writeln!(xml, "  <{}>", row_name).map_err(fmt_error)?;
        for (name, value) in names.iter().zip(values) {
            if value.is_null() {
                writeln!(xml, "    <{}/>", name).map_err(fmt_error)?;
            } else {
                let text = value.to_string();
                writeln!(xml, "    <{0}>{1}</{0}>", name, escape(text.as_str())).map_err(fmt_error)?;
            }
        }
        writeln!(xml, "  </{}>", row_name).map_err(fmt_error)?;
    }
    writeln!(xml, "</{}>", root).map_err(fmt_error)?;
    Ok(xml)
}

fn fmt_error(e: std::fmt::Error) -> ConvertError {
    ConvertError::parse("xml", e.to_string())
}
