//! XLSX reading (via calamine) and writing (a minimal single-sheet workbook).

use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::tabular::{TabularData, Value};
use crate::error::{ConvertError, Result};

/// Read the first worksheet of a workbook file. The first row is the header.
pub fn read_xlsx_path<P: AsRef<Path>>(path: P) -> Result<TabularData> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    first_sheet(&mut workbook)
}

/// Read the first worksheet of an in-memory workbook.
pub fn read_xlsx_bytes(bytes: Vec<u8>) -> Result<TabularData> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<TabularData> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::parse("xlsx", "workbook has no worksheet"))??;
    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<Data>) -> TabularData {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_to_value(cell).to_string()).collect(),
        None => return TabularData::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();
    TabularData::from_rows(headers, rows)
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Integer(*i),
        // Spreadsheets store every number as a float; whole numbers come back as integers.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::Integer(*f as i64),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Boolean(*b),
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Spreadsheet column letters for a zero-based index (0 → `A`, 26 → `AA`).
pub fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(sheet_name)
    )
}

fn write_cell(xml: &mut String, cell_ref: &str, value: &Value) -> std::fmt::Result {
    match value {
        Value::Null => Ok(()),
        Value::Integer(i) => write!(xml, r#"<c r="{}"><v>{}</v></c>"#, cell_ref, i),
        Value::Float(f) if f.is_finite() => write!(xml, r#"<c r="{}"><v>{}</v></c>"#, cell_ref, f),
        Value::Float(_) => Ok(()),
        Value::Boolean(b) => write!(xml, r#"<c r="{}" t="b"><v>{}</v></c>"#, cell_ref, u8::from(*b)),
        Value::String(s) => write!(
            xml,
            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            cell_ref,
            escape(s.as_str())
        ),
    }
}

fn sheet_xml(data: &TabularData) -> std::result::Result<String, std::fmt::Error> {
    let letters: Vec<String> = (0..data.column_count()).map(column_letters).collect();
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (letter, column) in letters.iter().zip(&data.columns) {
        write_cell(&mut xml, &format!("{}1", letter), &Value::String(column.name.clone()))?;
    }
    xml.push_str("</row>");

    for (idx, row) in data.rows().enumerate() {
        let row_number = idx + 2;
        write!(xml, r#"<row r="{}">"#, row_number)?;
        for (letter, value) in letters.iter().zip(row) {
            write_cell(&mut xml, &format!("{}{}", letter, row_number), value)?;
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

/// Serialize to a single-sheet XLSX workbook. The header is written as row 1.
pub fn write_xlsx(data: &TabularData, sheet_name: &str) -> Result<Vec<u8>> {
    let sheet = sheet_xml(data).map_err(|e| ConvertError::parse("xlsx", e.to_string()))?;
    let workbook = workbook_xml(sheet_name);
    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", workbook.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet.as_bytes()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content)?;
    }
    Ok(zip.finish()?.into_inner())
}
