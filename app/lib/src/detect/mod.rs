//! Input format validation.
//!
//! Decides whether a file's declared extension can be trusted before any
//! parser touches it:
//!
//! - `csv` files are sniffed: the content must contain the comma
//!   [signature](signature::matches) and every line must have the same comma
//!   count as the first ([structure](structure::check_line_consistency)).
//! - `json`, `xml`, `xlsx` and `html` files are checked by guessing a MIME type
//!   from the file name and testing it against a fixed
//!   [allow-list](mime::ALLOWED_MIME_TYPES).
//!
//! The two strategies are asymmetric. The CSV check reads the
//! file; the MIME check never does. A comma-free single-column CSV is always
//! rejected by the signature check.

pub mod mime;
pub mod signature;
pub mod structure;

use std::path::Path;

use log::debug;

use crate::error::{ConvertError, Result};
use crate::format::Format;

pub use mime::{ExtensionMimeGuesser, MimeGuesser};
pub use structure::Inconsistency;

/// Detailed outcome of validating a file against its declared extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The declared extension is trustworthy.
    Valid,
    /// The CSV content contains no comma byte.
    MissingSignature,
    /// A CSV line has a different comma count than the first line.
    InconsistentLines(Inconsistency),
    /// The guessed MIME type is not allowed for the declared extension.
    MimeMismatch {
        /// Guessed MIME type, if any
        guessed: Option<String>,
        /// Allowed MIME types
        expected: &'static [&'static str],
    },
}

impl Verdict {
    /// Whether the file passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Turn a rejection into the matching error for `file`.
    ///
    /// Returns `None` for [`Verdict::Valid`].
    pub fn into_error(self, file: &str) -> Option<ConvertError> {
        match self {
            Verdict::Valid => None,
            Verdict::MissingSignature => Some(ConvertError::CsvStructureInvalid {
                file: file.to_string(),
                reason: "no comma signature found".to_string(),
            }),
            Verdict::InconsistentLines(Inconsistency {
                line,
                expected,
                found,
            }) => Some(ConvertError::CsvStructureInvalid {
                file: file.to_string(),
                reason: format!(
                    "line {} has {} commas, expected {}",
                    line, found, expected
                ),
            }),
            Verdict::MimeMismatch { guessed, expected } => Some(ConvertError::InvalidMimeType {
                file: file.to_string(),
                guessed,
                expected: expected.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

/// Validates files against their declared extension.
pub struct FormatValidator {
    guesser: Box<dyn MimeGuesser>,
}

impl FormatValidator {
    /// Create a validator that guesses MIME types from file suffixes.
    pub fn new() -> Self {
        Self::with_guesser(ExtensionMimeGuesser)
    }

    /// Create a validator with a custom MIME guesser.
    pub fn with_guesser<G: MimeGuesser + 'static>(guesser: G) -> Self {
        Self {
            guesser: Box::new(guesser),
        }
    }

    /// Whether `path` is trustworthy as a file of the declared `extension`.
    ///
    /// Fails with [`ConvertError::UnsupportedExtension`] for unknown tokens and
    /// for the output-only `md` and `tex`, and with [`ConvertError::Io`] when a
    /// CSV file cannot be read.
    pub fn is_valid<P: AsRef<Path>>(&self, extension: &str, path: P) -> Result<bool> {
        Ok(self.verdict(extension, path)?.is_valid())
    }

    /// Validate `path` as the declared `extension` and explain the outcome.
    pub fn verdict<P: AsRef<Path>>(&self, extension: &str, path: P) -> Result<Verdict> {
        let format = Format::from_token(extension)?;
        self.verdict_for(format, path.as_ref())
    }

    /// Validate `path` as `format`.
    pub fn verdict_for(&self, format: Format, path: &Path) -> Result<Verdict> {
        let verdict = match format {
            Format::Csv => self.check_csv(path)?,
            Format::Json | Format::Xml | Format::Xlsx | Format::Html => {
                self.check_mime(format, path)
            }
            Format::Markdown | Format::Tex => {
                return Err(ConvertError::UnsupportedExtension {
                    extension: format.token().to_string(),
                })
            }
        };
        debug!("validated {} as {}: {:?}", path.display(), format, verdict);
        Ok(verdict)
    }

    fn check_csv(&self, path: &Path) -> Result<Verdict> {
        // Read once per call; nothing is cached between calls.
        let content = std::fs::read(path)?;
        let has_signature = signature::matches(&content);
        let lines = structure::split_lines(&content)?;

        if !has_signature {
            return Ok(Verdict::MissingSignature);
        }
        Ok(match structure::first_inconsistent_line(&lines) {
            Some(inconsistency) => Verdict::InconsistentLines(inconsistency),
            None => Verdict::Valid,
        })
    }

    fn check_mime(&self, format: Format, path: &Path) -> Verdict {
        let expected = mime::allowed_mime_types(format).unwrap_or(&[]);
        let guessed = self.guesser.guess(path);
        if mime::is_allowed(guessed.as_deref(), expected) {
            Verdict::Valid
        } else {
            Verdict::MimeMismatch { guessed, expected }
        }
    }
}

impl Default for FormatValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct FixedGuesser(&'static str);

    impl MimeGuesser for FixedGuesser {
        fn guess(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_csv() {
        let file = temp_file(".csv", "a,b,c\n1,2,3\n4,5,6\n");
        assert!(FormatValidator::new().is_valid("csv", file.path()).unwrap());
    }

    #[test]
    fn test_inconsistent_csv() {
        let file = temp_file(".csv", "a,b,c\n1,2\n");
        let verdict = FormatValidator::new().verdict("csv", file.path()).unwrap();
        assert_eq!(
            verdict,
            Verdict::InconsistentLines(Inconsistency {
                line: 2,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_single_column_csv_is_rejected() {
        let file = temp_file(".csv", "name\nalice\nbob\n");
        let verdict = FormatValidator::new().verdict("csv", file.path()).unwrap();
        assert_eq!(verdict, Verdict::MissingSignature);
    }

    #[test]
    fn test_missing_csv_is_an_error() {
        let result = FormatValidator::new().is_valid("csv", "/no/such/file.csv");
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[test]
    fn test_csv_lines_come_from_the_bytes_read() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"a,b\r\n1,2\r\n").unwrap();
        assert!(FormatValidator::new().is_valid("csv", file.path()).unwrap());

        let mut latin1 = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        latin1.write_all(b"caf\xe9,b\n1,2\n").unwrap();
        let result = FormatValidator::new().is_valid("csv", latin1.path());
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[test]
    fn test_json_mime_valid() {
        assert!(FormatValidator::new().is_valid("json", "data.json").unwrap());
    }

    #[test]
    fn test_json_misidentified_as_plain_text() {
        let validator = FormatValidator::with_guesser(FixedGuesser("text/plain"));
        let verdict = validator.verdict("json", "data.json").unwrap();
        assert_eq!(
            verdict,
            Verdict::MimeMismatch {
                guessed: Some("text/plain".to_string()),
                expected: &["text/json", "application/json"],
            }
        );
    }

    #[test]
    fn test_mime_check_ignores_content() {
        // The file does not even exist; only its name is inspected.
        assert!(FormatValidator::new().is_valid("xlsx", "/missing/book.xlsx").unwrap());
    }

    #[test]
    fn test_declared_extension_disagrees_with_name() {
        assert!(!FormatValidator::new().is_valid("json", "data.txt").unwrap());
    }

    #[test]
    fn test_unsupported_extensions() {
        let validator = FormatValidator::new();
        for ext in ["txt", "pdf", "md", "tex", ""] {
            assert!(
                matches!(
                    validator.is_valid(ext, "whatever"),
                    Err(ConvertError::UnsupportedExtension { .. })
                ),
                "{}",
                ext
            );
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let file = temp_file(".csv", "a,b\n1,2\n");
        let validator = FormatValidator::new();
        let first = validator.is_valid("csv", file.path()).unwrap();
        let second = validator.is_valid("csv", file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_verdict_into_error() {
        assert!(Verdict::Valid.into_error("a.csv").is_none());
        let err = Verdict::MissingSignature.into_error("a.csv").unwrap();
        assert!(matches!(err, ConvertError::CsvStructureInvalid { .. }));
        let err = Verdict::MimeMismatch {
            guessed: None,
            expected: &["text/html"],
        }
        .into_error("a.html")
        .unwrap();
        assert!(matches!(err, ConvertError::InvalidMimeType { .. }));
    }
}
