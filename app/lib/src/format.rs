//! Format tokens and file-name extension extraction.
//!
//! Every format-dependent decision (how to validate, how to load, which sink
//! receives serialized output) is a total `match` over [`Format`].

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConvertError, Result};

/// Trailing `.<lowercase letters>` of an input file name.
static EXTENSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([a-z]+)$").expect("extension pattern is valid"));

/// Trailing lowercase letters of an export destination.
static TRAILING_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z]+)$").expect("trailing token pattern is valid"));

/// Recognized tabular formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Comma-separated values
    Csv,
    /// JSON records
    Json,
    /// XML rows
    Xml,
    /// Office Open XML spreadsheet
    Xlsx,
    /// HTML table
    Html,
    /// Markdown pipe table (output only)
    Markdown,
    /// LaTeX tabular (output only)
    Tex,
}

/// Destination buffer selected by an output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Raw bytes, decoded on read-back
    Binary,
    /// Spreadsheet bytes, parsed back into a dataset on read-back
    Spreadsheet,
    /// Text
    Text,
}

impl Format {
    /// All formats, in token order.
    pub const ALL: [Format; 7] = [
        Format::Csv,
        Format::Json,
        Format::Xml,
        Format::Xlsx,
        Format::Html,
        Format::Markdown,
        Format::Tex,
    ];

    /// Parse a declared extension token.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "xlsx" => Ok(Format::Xlsx),
            "html" => Ok(Format::Html),
            "md" => Ok(Format::Markdown),
            "tex" => Ok(Format::Tex),
            other => Err(ConvertError::UnsupportedExtension {
                extension: other.to_string(),
            }),
        }
    }

    /// The lowercase token for this format.
    pub fn token(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Xlsx => "xlsx",
            Format::Html => "html",
            Format::Markdown => "md",
            Format::Tex => "tex",
        }
    }

    /// Whether files of this format can be validated and loaded.
    pub fn is_loadable(&self) -> bool {
        match self {
            Format::Csv | Format::Json | Format::Xml | Format::Xlsx | Format::Html => true,
            Format::Markdown | Format::Tex => false,
        }
    }

    /// The sink that receives output serialized in this format.
    pub fn sink(&self) -> SinkKind {
        match self {
            Format::Xml => SinkKind::Binary,
            Format::Xlsx => SinkKind::Spreadsheet,
            Format::Csv | Format::Json | Format::Html | Format::Markdown | Format::Tex => {
                SinkKind::Text
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        Format::from_token(s)
    }
}

/// Extract the declared extension (without the dot) from a file name.
///
/// Only a final run of lowercase ASCII letters after a dot counts:
/// `report.CSV`, `track.mp3` and `README` all yield
/// [`ConvertError::NoExtensionFound`].
pub fn extract_extension(file_name: &str) -> Result<String> {
    EXTENSION_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConvertError::NoExtensionFound {
            name: file_name.to_string(),
        })
}

/// Extract the trailing lowercase letters of an export destination path.
///
/// Unlike [`extract_extension`] no dot is required, so `out_csv` yields `csv`.
pub fn trailing_token(path: &str) -> Result<String> {
    TRAILING_TOKEN_PATTERN
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ConvertError::NoExtensionFound {
            name: path.to_string(),
        })
}
