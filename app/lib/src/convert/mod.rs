//! Tabular data and the per-format readers and writers.
//!
//! Every format converts to and from the column-oriented [`TabularData`].
//! [`TabularEngine`] selects the reader or writer for a [`Format`](crate::Format).

pub mod csv;
pub mod engine;
pub mod html;
pub mod json;
pub mod latex;
pub mod markdown;
mod tabular;
pub mod xlsx;
pub mod xml;

pub use engine::TabularEngine;
pub use tabular::{Column, ColumnType, TabularData, Value};
