//! # Tabconv
//!
//! Tabular data conversion between CSV, JSON, XML, XLSX, HTML, Markdown and
//! LaTeX, with validation of the input file type before any parsing.
//!
//! A load first checks that a file's declared extension can be trusted
//! ([`detect`]), then parses it into [`TabularData`]. A loaded dataset can be
//! serialized into in-memory sinks for display ([`BufferRouter`]) or exported
//! to a file whose suffix must match the requested format.
//!
//! ```no_run
//! use tabconv::{pipeline, ConverterConfig, Format, FormatValidator};
//!
//! let config = ConverterConfig::default();
//! let data = pipeline::load_file("people.csv", &FormatValidator::new(), &config)?;
//! pipeline::export_file(Some(&data), Format::Json, "people.json", &config)?;
//! # Ok::<(), tabconv::ConvertError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod format;
pub mod pipeline;

pub use buffer::{BufferRouter, ReadBack};
pub use config::ConverterConfig;
pub use convert::{Column, ColumnType, TabularData, TabularEngine, Value};
pub use detect::{FormatValidator, MimeGuesser, Verdict};
pub use error::{ConvertError, Result};
pub use format::{extract_extension, trailing_token, Format, SinkKind};
