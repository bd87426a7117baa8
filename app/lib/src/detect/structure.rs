//! Line-by-line column count consistency for comma-delimited text.

use std::io;

use crate::error::Result;

/// First line whose comma count disagrees with the first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inconsistency {
    /// 1-based line number
    pub line: usize,
    /// Comma count of the first line
    pub expected: usize,
    /// Comma count of the offending line
    pub found: usize,
}

fn comma_count(line: &str) -> usize {
    line.bytes().filter(|&b| b == b',').count()
}

/// Find the first line whose comma count differs from the first line's.
///
/// Quoted fields are not special: a comma inside quotes still counts.
pub fn first_inconsistent_line<S: AsRef<str>>(lines: &[S]) -> Option<Inconsistency> {
    let (first, rest) = lines.split_first()?;
    let expected = comma_count(first.as_ref());

    rest.iter().enumerate().find_map(|(idx, line)| {
        let found = comma_count(line.as_ref());
        (found != expected).then_some(Inconsistency {
            line: idx + 2,
            expected,
            found,
        })
    })
}

/// Whether every line has the same number of commas as the first.
///
/// Zero or one lines are vacuously consistent.
pub fn check_line_consistency<S: AsRef<str>>(lines: &[S]) -> bool {
    first_inconsistent_line(lines).is_none()
}

/// Split file content into UTF-8 text lines.
///
/// Content that is not UTF-8 is an [`std::io::ErrorKind::InvalidData`] error.
pub fn split_lines(content: &[u8]) -> Result<Vec<&str>> {
    let text = std::str::from_utf8(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(text.lines().collect())
}
