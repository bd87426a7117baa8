//! In-memory output sinks with read-back.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use encoding_rs::Encoding;

use crate::convert::xlsx::read_xlsx_bytes;
use crate::convert::TabularData;
use crate::error::{ConvertError, Result};
use crate::format::{Format, SinkKind};

/// Content read back from a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadBack {
    /// Decoded text (text and binary sinks)
    Text(String),
    /// Parsed spreadsheet (spreadsheet sink)
    Table(TabularData),
}

/// Three independent output sinks, one per [`SinkKind`].
///
/// A router belongs to a single conversion; callers that convert concurrently
/// each need their own.
#[derive(Debug)]
pub struct BufferRouter {
    bytes: Cursor<Vec<u8>>,
    xlsx: Cursor<Vec<u8>>,
    text: String,
    encoding: &'static Encoding,
}

impl BufferRouter {
    /// Create empty sinks that decode the binary sink as windows-1252.
    pub fn new() -> Self {
        Self {
            bytes: Cursor::new(Vec::new()),
            xlsx: Cursor::new(Vec::new()),
            text: String::new(),
            encoding: encoding_rs::WINDOWS_1252,
        }
    }

    /// Create empty sinks that decode the binary sink with the encoding named `label`.
    pub fn with_encoding(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ConvertError::ConfigError(format!("unknown encoding '{}'", label)))?;
        Ok(Self {
            encoding,
            ..Self::new()
        })
    }

    /// Append `content` to the sink of `kind`.
    pub fn write(&mut self, kind: SinkKind, content: &[u8]) -> Result<()> {
        match kind {
            SinkKind::Binary => self.bytes.write_all(content)?,
            SinkKind::Spreadsheet => self.xlsx.write_all(content)?,
            SinkKind::Text => self.text.push_str(&String::from_utf8_lossy(content)),
        }
        Ok(())
    }

    /// Rewind the binary sink and decode everything in it.
    pub fn read_bytes_buffer(&mut self) -> Result<String> {
        let raw = rewind_and_read(&mut self.bytes)?;
        let (text, _) = self.encoding.decode_without_bom_handling(&raw);
        Ok(text.into_owned())
    }

    /// Rewind the spreadsheet sink and parse it back into a dataset.
    pub fn read_xlsx_buffer(&mut self) -> Result<TabularData> {
        read_xlsx_bytes(rewind_and_read(&mut self.xlsx)?)
    }

    /// The text sink content.
    pub fn read_string_buffer(&self) -> String {
        self.text.clone()
    }

    /// Read back the sink that `format` writes to.
    pub fn read_back(&mut self, format: Format) -> Result<ReadBack> {
        match format.sink() {
            SinkKind::Binary => Ok(ReadBack::Text(self.read_bytes_buffer()?)),
            SinkKind::Spreadsheet => Ok(ReadBack::Table(self.read_xlsx_buffer()?)),
            SinkKind::Text => Ok(ReadBack::Text(self.read_string_buffer())),
        }
    }

    /// Empty all three sinks.
    pub fn reset(&mut self) {
        self.bytes = Cursor::new(Vec::new());
        self.xlsx = Cursor::new(Vec::new());
        self.text.clear();
    }
}

impl Default for BufferRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn rewind_and_read(cursor: &mut Cursor<Vec<u8>>) -> Result<Vec<u8>> {
    cursor.seek(SeekFrom::Start(0))?;
    let mut out = Vec::with_capacity(cursor.get_ref().len());
    cursor.read_to_end(&mut out)?;
    Ok(out)
}
