//! Format-agnostic tabular data.

use std::collections::HashMap;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// Text
    String(String),
}

impl Value {
    /// Infer a typed value from cell text.
    ///
    /// Empty text is `Null`; integers, floats and `true`/`false` (any case) are
    /// recognized; everything else stays a string.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        // Require a digit so words like "inf" or "NaN" stay text.
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Value::Float(f);
            }
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        Value::String(text.to_string())
    }

    /// Whether this value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The column type this value belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::String(_) => ColumnType::String,
        }
    }
}

impl fmt::Display for Value {
    /// Text rendering used by every text format; `Null` renders as empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) if !x.is_finite() => Ok(()),
            // Keep a trailing ".0" so whole floats stay floats on reload.
            Value::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Only missing values
    Null,
    /// Integers (and missing values)
    Integer,
    /// Floats, possibly mixed with integers
    Float,
    /// Booleans
    Boolean,
    /// Text
    String,
    /// Incompatible value kinds
    Mixed,
}

impl ColumnType {
    /// Whether values of this type are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    fn merge(self, other: ColumnType) -> ColumnType {
        use ColumnType::*;
        match (self, other) {
            (Null, t) | (t, Null) => t,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Mixed,
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Values, one per row
    pub values: Vec<Value>,
    /// Type inferred from the values
    pub inferred_type: ColumnType,
}

impl Column {
    /// Create a column and infer its type.
    ///
    /// Integers in a column that also holds floats are promoted to floats.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let inferred_type = values
            .iter()
            .fold(ColumnType::Null, |acc, v| acc.merge(v.column_type()));
        let values = if inferred_type == ColumnType::Float {
            values
                .into_iter()
                .map(|v| match v {
                    Value::Integer(i) => Value::Float(i as f64),
                    other => other,
                })
                .collect()
        } else {
            values
        };
        Self {
            name: name.into(),
            values,
            inferred_type,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Column-oriented table.
///
/// All columns have exactly `row_count` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularData {
    /// Columns in order
    pub columns: Vec<Column>,
    /// Number of rows
    pub row_count: usize,
}

impl TabularData {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and rows.
    ///
    /// Short rows are padded with `Null`; cells beyond the header get generated
    /// column names. Blank and duplicate header names are made unique the way
    /// spreadsheet tools do (`Unnamed: 2`, `name.1`).
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());

        let mut names = headers;
        while names.len() < width {
            names.push(String::new());
        }
        let names = unique_names(names);

        let row_count = rows.len();
        let mut columns: Vec<Vec<Value>> = (0..width).map(|_| Vec::with_capacity(row_count)).collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or(Value::Null));
            }
        }

        Self {
            columns: names
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
            row_count,
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    /// Values of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        (index < self.row_count).then(|| self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}

pub(crate) fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };
        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", base, count);
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}
