//! Format dispatch for loading and serializing datasets.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};

use crate::buffer::BufferRouter;
use crate::config::ConverterConfig;
use crate::error::{ConvertError, Result};
use crate::format::Format;

use super::tabular::TabularData;
use super::{csv, html, json, latex, markdown, xlsx, xml};

/// Parses files into [`TabularData`] and serializes datasets into any output format.
#[derive(Debug, Clone, Default)]
pub struct TabularEngine {
    config: ConverterConfig,
}

impl TabularEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: ConverterConfig::default(),
        }
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Load `path` as `format`.
    ///
    /// Fails with [`ConvertError::UnsupportedFormat`] for output-only formats
    /// and with [`ConvertError::EmptyInput`] when the result has no rows or
    /// no columns.
    pub fn load<P: AsRef<Path>>(&self, path: P, format: Format) -> Result<TabularData> {
        let path = path.as_ref();
        let data = match format {
            Format::Csv => csv::read_csv(BufReader::new(File::open(path)?))?,
            Format::Json => json::read_json(&fs::read_to_string(path)?, self.config.json_round_decimals)?,
            Format::Xml => xml::read_xml(&fs::read_to_string(path)?)?,
            Format::Xlsx => xlsx::read_xlsx_path(path)?,
            Format::Html => html::read_html(&fs::read_to_string(path)?)?,
            Format::Markdown | Format::Tex => {
                return Err(ConvertError::UnsupportedFormat {
                    format: format.token(),
                    operation: "load",
                })
            }
        };

        if data.is_empty() {
            return Err(ConvertError::EmptyInput {
                file: path.display().to_string(),
            });
        }
        debug!(
            "loaded {} as {}: {} rows x {} columns",
            path.display(),
            format,
            data.row_count,
            data.column_count()
        );
        Ok(data)
    }

    /// Serialize `data` as `format` into raw bytes, with JSON indented by `json_indent`.
    pub fn encode(&self, data: &TabularData, format: Format, json_indent: usize) -> Result<Vec<u8>> {
        let bytes = match format {
            Format::Csv => csv::write_csv(data, self.config.csv_delimiter)?.into_bytes(),
            Format::Json => json::write_json(data, json_indent)?.into_bytes(),
            Format::Xml => xml::write_xml(data, &self.config.xml_root, &self.config.xml_row)?.into_bytes(),
            Format::Xlsx => xlsx::write_xlsx(data, &self.config.sheet_name)?,
            Format::Html => html::write_html(data).into_bytes(),
            Format::Markdown => markdown::write_markdown(data).into_bytes(),
            Format::Tex => latex::write_latex(data).into_bytes(),
        };
        Ok(bytes)
    }

    /// Serialize `data` as `format` into the sink that the format selects.
    pub fn serialize(&self, data: &TabularData, format: Format, router: &mut BufferRouter) -> Result<()> {
        let bytes = self.encode(data, format, self.config.json_indent)?;
        debug!("serialized {} bytes of {} into the {:?} sink", bytes.len(), format, format.sink());
        router.write(format.sink(), &bytes)
    }

    /// Serialize `data` as `format` straight into a file.
    pub fn serialize_to_file<P: AsRef<Path>>(&self, data: &TabularData, format: Format, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode(data, format, self.config.export_json_indent)?;
        fs::write(path, &bytes)?;
        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}
