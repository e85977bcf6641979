//! In-memory table model
//!
//! A [`Table`] is a list of named columns, an ordered list of fixed-arity
//! [`Row`]s and one index label per row. Labels start contiguous but survive
//! filtering, so a deduplicated table may have gaps in its index.

use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell value
///
/// Equality is structural with no coercion between variants. Floats compare
/// by bit pattern so the type can implement `Eq` and `Hash`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Append a canonical byte encoding of this value to `buf`
    ///
    /// Each variant is prefixed with its own tag byte, so values of different
    /// variants never encode to the same bytes.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Null => buf.push(0),
            Value::Bool(b) => {
                buf.push(1);
                buf.push(*b as u8);
            }
            Value::Int(i) => {
                buf.push(2);
                buf.extend_from_slice(&i.to_le_bytes());
            }
            Value::Float(f) => {
                buf.push(3);
                buf.extend_from_slice(&f.to_bits().to_le_bytes());
            }
            Value::Text(s) => {
                buf.push(4);
                buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
                buf.extend_from_slice(s.as_bytes());
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // Whole floats always carry a "." or an exponent so they read back as floats
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                if x.abs() < 1e15 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{:e}", x)
                }
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// An immutable tuple of cell values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row(Box<[Value]>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into_boxed_slice())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered, uniformly shaped collection of rows sharing a column schema
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    index: Vec<usize>,
    next_label: usize,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index: Vec::new(),
            next_label: 0,
        }
    }

    /// Create a table from rows, labelling them `0..n`
    ///
    /// Fails with [`Error::ArityMismatch`] if any row's length differs from
    /// the number of columns.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let expected = columns.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(Error::ArityMismatch {
                row,
                expected,
                found: bad.len(),
            });
        }

        let n = rows.len();
        Ok(Self {
            columns,
            rows,
            index: (0..n).collect(),
            next_label: n,
        })
    }

    /// Build a table from rows whose arity has already been checked
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>, index: Vec<usize>) -> Self {
        debug_assert_eq!(rows.len(), index.len());
        let next_label = index.iter().max().map_or(0, |m| m + 1);
        Self {
            columns,
            rows,
            index,
            next_label,
        }
    }

    /// Append a row, giving it the next unused index label
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ArityMismatch {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        self.index.push(self.next_label);
        self.next_label += 1;
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row labels, one per row, in row order
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over `(label, row)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Row)> + '_ {
        self.index.iter().copied().zip(self.rows.iter())
    }

    /// Copy the rows at the given positions, keeping their labels
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn select(&self, positions: &[usize]) -> Table {
        let rows = positions.iter().map(|&p| self.rows[p].clone()).collect();
        let index = positions.iter().map(|&p| self.index[p]).collect();
        Table::from_parts(self.columns.clone(), rows, index)
    }

    /// Keep the rows whose mask entry is `false`, preserving order and labels
    ///
    /// # Panics
    ///
    /// Panics if `mask` is shorter than the table.
    pub fn without_marked(&self, mask: &[bool]) -> Table {
        let keep: Vec<usize> = (0..self.rows.len()).filter(|&p| !mask[p]).collect();
        self.select(&keep)
    }

    /// Keep the rows whose mask entry is `true`, preserving order and labels
    ///
    /// # Panics
    ///
    /// Panics if `mask` is shorter than the table.
    pub fn only_marked(&self, mask: &[bool]) -> Table {
        let keep: Vec<usize> = (0..self.rows.len()).filter(|&p| mask[p]).collect();
        self.select(&keep)
    }

    /// Relabel rows `0..n` in their current order
    pub fn reset_index(mut self) -> Table {
        let n = self.rows.len();
        self.index = (0..n).collect();
        self.next_label = n;
        self
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.index == other.index && self.rows == other.rows
    }
}

impl Eq for Table {}
