//! One record of tabular input data.

use indexmap::IndexMap;

/// An ordered mapping from column name to a raw cell value.
///
/// A `None` value is an absent cell (blank spreadsheet cell, null). Column
/// order follows insertion order, which is the source's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    cells: IndexMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell, returning the modified row (builder pattern).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, Some(value.into()));
        self
    }

    /// Insert an absent cell, returning the modified row (builder pattern).
    pub fn with_missing(mut self, column: impl Into<String>) -> Self {
        self.insert(column, None);
        self
    }

    /// Insert or replace a cell. A re-inserted column keeps its original position.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.insert(column.into(), value);
    }

    /// Whether the row has a column with this exact name.
    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Look up a column. The outer `None` means "no such column", the inner
    /// `None` means "column present, value absent".
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.cells.get(column).map(|v| v.as_deref())
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let cells = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        Self { cells }
    }
}
