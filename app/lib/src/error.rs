//! Error types for tabular validation and conversion.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while validating, loading, converting or exporting tabular data.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The file name has no trailing lowercase-letters suffix.
    #[error("no file extension found in '{name}'")]
    NoExtensionFound {
        /// The offending file name
        name: String,
    },

    /// The extension is not one of the recognized format tokens.
    #[error("unsupported file extension '{extension}'")]
    UnsupportedExtension {
        /// The rejected token
        extension: String,
    },

    /// The guessed MIME type is not in the allow-list for the declared extension.
    #[error("invalid MIME type for '{file}': guessed {}, expected one of [{}]",
            .guessed.as_deref().unwrap_or("nothing"), .expected.join(", "))]
    InvalidMimeType {
        /// The validated file
        file: String,
        /// MIME type guessed from the file name, if any
        guessed: Option<String>,
        /// Allowed MIME types for the declared extension
        expected: Vec<String>,
    },

    /// The comma signature or the line consistency check failed.
    #[error("'{file}' is not a well-formed CSV file: {reason}")]
    CsvStructureInvalid {
        /// The validated file
        file: String,
        /// Which check rejected the file
        reason: String,
    },

    /// The source contains no rows.
    #[error("'{file}' contains no data")]
    EmptyInput {
        /// The loaded file
        file: String,
    },

    /// A backing parser rejected the input.
    #[error("{format} parse error: {message}")]
    ParseError {
        /// Format token of the parser
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// Serialization was requested without a tabular dataset.
    #[error("a tabular dataset is expected: {0}")]
    TypeMismatch(String),

    /// The format cannot be used for the requested operation.
    #[error("format '{format}' does not support {operation}")]
    UnsupportedFormat {
        /// Format token
        format: &'static str,
        /// Operation name (load, serialize)
        operation: &'static str,
    },

    /// The export destination suffix disagrees with the requested format.
    #[error("Incorrect export format. Expected {expected}, got {found}.")]
    FormatMismatch {
        /// Requested export format token
        expected: String,
        /// Token found at the end of the destination path
        found: String,
    },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet reader error.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// Spreadsheet archive error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl ConvertError {
    /// Build a [`ConvertError::ParseError`] for the given format token.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::ParseError {
            format,
            message: message.into(),
        }
    }

    /// Whether this error means "no data" rather than a failure.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mismatch_message() {
        let err = ConvertError::FormatMismatch {
            expected: "csv".to_string(),
            found: "json".to_string(),
        };
        assert_eq!(err.to_string(), "Incorrect export format. Expected csv, got json.");
    }

    #[test]
    fn test_invalid_mime_message_lists_expected() {
        let err = ConvertError::InvalidMimeType {
            file: "data.json".to_string(),
            guessed: Some("text/plain".to_string()),
            expected: vec!["text/json".to_string(), "application/json".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("guessed text/plain"));
        assert!(msg.contains("text/json, application/json"));
    }

    #[test]
    fn test_invalid_mime_message_without_guess() {
        let err = ConvertError::InvalidMimeType {
            file: "data".to_string(),
            guessed: None,
            expected: vec!["text/html".to_string()],
        };
        assert!(err.to_string().contains("guessed nothing"));
    }

    #[test]
    fn test_is_empty_input() {
        assert!(ConvertError::EmptyInput { file: "a.csv".into() }.is_empty_input());
        assert!(!ConvertError::TypeMismatch("x".into()).is_empty_input());
    }
}
