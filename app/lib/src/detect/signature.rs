//! Comma-delimited text signature.
//!
//! The signature is a single comma byte. It is a weak first-pass filter: any
//! file containing a comma matches, so a match never proves the file is CSV
//! on its own.

/// Signature for comma-delimited text (`0x2C`).
pub const CSV_SIGNATURE: &[u8] = b",";

/// Whether the CSV signature appears anywhere in `content`.
///
/// Empty input never matches.
pub fn matches(content: &[u8]) -> bool {
    content.contains(&CSV_SIGNATURE[0])
}
