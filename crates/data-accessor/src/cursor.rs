//! Forward-only result cursor.
//!
//! A [`Cursor`] owns every row the driver returned, so it stays valid after
//! the command that produced it has been dropped.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// A single cell read from a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) if *v <= i64::MAX as u64 => Some(*v as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bytes(v) => {
                f.write_str("0x")?;
                for b in v {
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
        }
    }
}

/// One row of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Look a value up by column name.
    ///
    /// An exact match wins; otherwise the first case-insensitive match is used.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.ordinal(name).and_then(|i| self.values.get(i))
    }

    /// Position of the named column.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    #[must_use]
    pub fn is_null(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(Value::is_null)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Forward-only, read-once sequence of rows.
#[derive(Debug, Clone)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: VecDeque<Vec<Value>>,
    total: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let total = rows.len();
        Self {
            columns: columns.into(),
            rows: rows.into(),
            total,
        }
    }

    /// Cursor with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the result set produced any row, read or not.
    #[must_use]
    pub const fn has_rows(&self) -> bool {
        self.total > 0
    }

    /// Rows not read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Advance to the next row.
    pub fn read(&mut self) -> Option<Row> {
        self.rows.pop_front().map(|values| Row {
            columns: Arc::clone(&self.columns),
            values,
        })
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.read()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for Cursor {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cursor {
        Cursor::new(
            vec!["Id".to_string(), "Name".to_string()],
            vec![
                vec![Value::Int(1), Value::Text("alpha".to_string())],
                vec![Value::Int(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_forward_only_read() {
        let mut cursor = sample();
        assert!(cursor.has_rows());
        assert_eq!(cursor.remaining(), 2);

        let first = cursor.read().unwrap();
        assert_eq!(first.get(0), Some(&Value::Int(1)));
        assert_eq!(cursor.remaining(), 1);

        let second = cursor.read().unwrap();
        assert!(second.is_null(1));
        assert!(cursor.read().is_none());
        assert!(cursor.has_rows());
    }

    #[test]
    fn test_lookup_by_name() {
        let row = sample().next().unwrap();
        assert_eq!(row.get_by_name("Name").and_then(Value::as_str), Some("alpha"));
        assert_eq!(row.get_by_name("name").and_then(Value::as_str), Some("alpha"));
        assert_eq!(row.ordinal("ID"), Some(0));
        assert!(row.get_by_name("missing").is_none());
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = Cursor::empty();
        assert!(!cursor.has_rows());
        assert_eq!(cursor.field_count(), 0);
        assert!(cursor.read().is_none());
    }

    #[test]
    fn test_row_display() {
        let row = Cursor::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![Value::Text("x".into()), Value::Null, Value::Bytes(vec![0xde, 0xad])]],
        )
        .next()
        .unwrap();
        assert_eq!(row.to_string(), "x\tNULL\t0xDEAD");
    }

    #[test]
    fn test_iterator_len() {
        let cursor = sample();
        assert_eq!(cursor.len(), 2);
        let ids: Vec<_> = cursor.filter_map(|r| r.get(0).and_then(Value::as_i64)).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(Value::UInt(5).as_i64(), Some(5));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Text("5".into()).as_i64(), None);
    }
}
