//! MIME type guessing and allow-list checks.
//!
//! Guessing is based on the file name only. A truncated or corrupted file
//! with the right suffix passes; content is never inspected here.

use std::path::Path;

use phf::{phf_map, Map};

use crate::format::Format;

// text/json is deprecated but still produced by some registries
const JSON_MIME_TYPES: &[&str] = &["text/json", "application/json"];
const XML_MIME_TYPES: &[&str] = &["application/xml", "text/xml"];
const XLSX_MIME_TYPES: &[&str] =
    &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"];
const HTML_MIME_TYPES: &[&str] = &["text/html"];

/// MIME types accepted for each MIME-checked extension.
pub static ALLOWED_MIME_TYPES: Map<&'static str, &'static [&'static str]> = phf_map! {
    "json" => JSON_MIME_TYPES,
    "xml" => XML_MIME_TYPES,
    "xlsx" => XLSX_MIME_TYPES,
    "html" => HTML_MIME_TYPES,
};

/// Suffix to MIME type registry used by [`ExtensionMimeGuesser`].
pub static SUFFIX_MIME_TYPES: Map<&'static str, &'static str> = phf_map! {
    "csv" => "text/csv",
    "tsv" => "text/tab-separated-values",
    "txt" => "text/plain",
    "text" => "text/plain",
    "json" => "application/json",
    "xml" => "text/xml",
    "xsl" => "application/xml",
    "rdf" => "application/xml",
    "html" => "text/html",
    "htm" => "text/html",
    "md" => "text/markdown",
    "markdown" => "text/markdown",
    "tex" => "application/x-tex",
    "latex" => "application/x-latex",
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "xls" => "application/vnd.ms-excel",
    "ods" => "application/vnd.oasis.opendocument.spreadsheet",
    "pdf" => "application/pdf",
    "zip" => "application/zip",
    "gz" => "application/gzip",
    "js" => "text/javascript",
    "css" => "text/css",
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
};

/// Guesses a MIME type for a file.
pub trait MimeGuesser {
    /// Guess the MIME type of `path`, or `None` when nothing is known.
    fn guess(&self, path: &Path) -> Option<String>;
}

/// Guesses MIME types from the final suffix of the file name.
///
/// The suffix lookup is case-insensitive, so `REPORT.JSON` guesses
/// `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionMimeGuesser;

impl MimeGuesser for ExtensionMimeGuesser {
    fn guess(&self, path: &Path) -> Option<String> {
        let suffix = path.extension()?.to_str()?;
        if let Some(mime) = SUFFIX_MIME_TYPES.get(suffix) {
            return Some((*mime).to_string());
        }
        SUFFIX_MIME_TYPES
            .get(suffix.to_ascii_lowercase().as_str())
            .map(|mime| (*mime).to_string())
    }
}

/// MIME types accepted for `format`, or `None` if the format is not MIME-checked.
pub fn allowed_mime_types(format: Format) -> Option<&'static [&'static str]> {
    match format {
        Format::Json | Format::Xml | Format::Xlsx | Format::Html => {
            ALLOWED_MIME_TYPES.get(format.token()).copied()
        }
        Format::Csv | Format::Markdown | Format::Tex => None,
    }
}

/// Whether `guessed` is in `allowed`.
pub fn is_allowed(guessed: Option<&str>, allowed: &[&str]) -> bool {
    guessed.is_some_and(|mime| allowed.contains(&mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_known_suffixes() {
        let guesser = ExtensionMimeGuesser;
        assert_eq!(guesser.guess(Path::new("data.json")).as_deref(), Some("application/json"));
        assert_eq!(guesser.guess(Path::new("a/b/data.xml")).as_deref(), Some("text/xml"));
        assert_eq!(guesser.guess(Path::new("page.html")).as_deref(), Some("text/html"));
        assert_eq!(
            guesser.guess(Path::new("book.xlsx")).as_deref(),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        );
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        let guesser = ExtensionMimeGuesser;
        assert_eq!(guesser.guess(Path::new("DATA.JSON")).as_deref(), Some("application/json"));
    }

    #[test]
    fn test_guess_unknown_or_missing_suffix() {
        let guesser = ExtensionMimeGuesser;
        assert_eq!(guesser.guess(Path::new("data.unknownext")), None);
        assert_eq!(guesser.guess(Path::new("README")), None);
    }

    #[test]
    fn test_allow_list_covers_mime_checked_formats() {
        assert_eq!(allowed_mime_types(Format::Json), Some(&["text/json", "application/json"][..]));
        assert_eq!(allowed_mime_types(Format::Html), Some(&["text/html"][..]));
        assert!(allowed_mime_types(Format::Csv).is_none());
        assert!(allowed_mime_types(Format::Tex).is_none());
    }

    #[test]
    fn test_every_allow_list_accepts_default_guess() {
        let guesser = ExtensionMimeGuesser;
        for format in [Format::Json, Format::Xml, Format::Xlsx, Format::Html] {
            let name = format!("file.{}", format.token());
            let guessed = guesser.guess(Path::new(&name));
            let allowed = allowed_mime_types(format).unwrap();
            assert!(is_allowed(guessed.as_deref(), allowed), "{}", name);
        }
    }

    #[test]
    fn test_is_allowed() {
        assert!(is_allowed(Some("text/xml"), &["application/xml", "text/xml"]));
        assert!(!is_allowed(Some("text/plain"), &["application/json"]));
        assert!(!is_allowed(None, &["application/json"]));
    }
}
