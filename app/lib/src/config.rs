//! Converter configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Settings that control how datasets are loaded and serialized.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Decimal places kept for floats read from JSON input. `None` keeps full precision.
    pub json_round_decimals: Option<u32>,

    /// Indentation of JSON written to the text buffer.
    pub json_indent: usize,

    /// Indentation of JSON written to an export file.
    pub export_json_indent: usize,

    /// Encoding label used to decode the binary buffer on read-back.
    pub buffer_encoding: String,

    /// Root element name for XML output.
    pub xml_root: String,

    /// Row element name for XML output.
    pub xml_row: String,

    /// Worksheet name for XLSX output.
    pub sheet_name: String,

    /// Field delimiter used when writing CSV.
    pub csv_delimiter: u8,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            json_round_decimals: Some(2),
            json_indent: 4,
            export_json_indent: 2,
            buffer_encoding: "windows-1252".to_string(),
            xml_root: "data".to_string(),
            xml_row: "row".to_string(),
            sheet_name: "Sheet1".to_string(),
            csv_delimiter: b',',
        }
    }
}

impl ConverterConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| ConvertError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<()> {
        if encoding_rs::Encoding::for_label(self.buffer_encoding.as_bytes()).is_none() {
            return Err(ConvertError::ConfigError(format!(
                "unknown buffer encoding '{}'",
                self.buffer_encoding
            )));
        }
        if self.xml_root.trim().is_empty() || self.xml_row.trim().is_empty() {
            return Err(ConvertError::ConfigError(
                "XML element names must not be empty".to_string(),
            ));
        }
        if self.sheet_name.is_empty() || self.sheet_name.chars().count() > 31 {
            return Err(ConvertError::ConfigError(
                "sheet name must be 1 to 31 characters".to_string(),
            ));
        }
        if !self.csv_delimiter.is_ascii() || self.csv_delimiter == b'"' {
            return Err(ConvertError::ConfigError(
                "CSV delimiter must be an ASCII character other than '\"'".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.json_round_decimals, Some(2));
        assert_eq!(config.json_indent, 4);
        assert_eq!(config.export_json_indent, 2);
        assert_eq!(config.buffer_encoding, "windows-1252");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ConverterConfig::from_json_str(r#"{"json_indent": 2}"#).unwrap();
        assert_eq!(config.json_indent, 2);
        assert_eq!(config.xml_root, "data");
    }

    #[test]
    fn test_disable_rounding() {
        let config = ConverterConfig::from_json_str(r#"{"json_round_decimals": null}"#).unwrap();
        assert_eq!(config.json_round_decimals, None);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result = ConverterConfig::from_json_str(r#"{"buffer_encoding": "klingon"}"#);
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = ConverterConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }

    #[test]
    fn test_long_sheet_name_rejected() {
        let config = ConverterConfig {
            sheet_name: "x".repeat(40),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
