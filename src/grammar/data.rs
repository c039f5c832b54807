//! Data abstraction for Grammar of Graphics.
//!
//! A small ordered columnar frame. Stats read and write it; columns keep
//! their insertion order so computed layers are predictable.

use std::fmt;

/// A value in a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f32),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f32, or None if not a number.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether the value is missing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Number(n) => write!(f, "{n}"),
            DataValue::Text(s) => f.write_str(s),
            DataValue::Null => f.write_str("NA"),
        }
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DataValue::Null, Into::into)
    }
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Vec<DataValue>,
}

/// A simple ordered columnar data frame.
///
/// Columns shorter than [`DataFrame::nrow`] read as [`DataValue::Null`]
/// past their end.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from x and y arrays.
    #[must_use]
    pub fn from_xy(x: &[f32], y: &[f32]) -> Self {
        let n = x.len().min(y.len());
        let mut df = Self::new();
        df.add_column_f32("x", &x[..n]);
        df.add_column_f32("y", &y[..n]);
        df
    }

    /// Create from segment endpoints: columns `x`, `y`, `xend`, `yend`.
    #[must_use]
    pub fn from_segments(x: &[f32], y: &[f32], xend: &[f32], yend: &[f32]) -> Self {
        let n = x.len().min(y.len()).min(xend.len()).min(yend.len());
        let mut df = Self::new();
        df.add_column_f32("x", &x[..n]);
        df.add_column_f32("y", &y[..n]);
        df.add_column_f32("xend", &xend[..n]);
        df.add_column_f32("yend", &yend[..n]);
        df
    }

    /// Add a column, replacing any column with the same name in place.
    pub fn add_column(&mut self, name: &str, values: Vec<DataValue>) {
        self.n_rows = self.n_rows.max(values.len());
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(Column { name: name.to_string(), values }),
        }
    }

    /// Add a numeric column.
    pub fn add_column_f32(&mut self, name: &str, data: &[f32]) {
        self.add_column(name, data.iter().map(|&v| DataValue::Number(v)).collect());
    }

    /// Add a text column.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        self.add_column(name, data.iter().map(|&s| DataValue::from(s)).collect());
    }

    /// Get a column's numbers, skipping non-numeric cells.
    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<Vec<f32>> {
        self.get(name).map(|col| col.iter().filter_map(DataValue::as_f32).collect())
    }

    /// Get a column as one optional number per row.
    ///
    /// Text, null and non-finite cells read as `None`.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f32>>> {
        let col = self.get(name)?;
        Some(
            (0..self.n_rows)
                .map(|i| col.get(i).and_then(DataValue::as_f32).filter(|v| v.is_finite()))
                .collect(),
        )
    }

    /// Get a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }

    /// Get a single cell; missing cells read as [`DataValue::Null`].
    #[must_use]
    pub fn value(&self, name: &str, row: usize) -> Option<&DataValue> {
        const NULL: &DataValue = &DataValue::Null;
        self.get(name).map(|col| col.get(row).unwrap_or(NULL))
    }

    /// Build a new frame from the given rows, in the given order.
    ///
    /// Indices may repeat, which replicates rows.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices
                    .iter()
                    .map(|&i| c.values.get(i).cloned().unwrap_or(DataValue::Null))
                    .collect(),
            })
            .collect();
        Self { columns, n_rows: indices.len() }
    }

    /// Copy of the frame without the named columns.
    #[must_use]
    pub fn without_columns(&self, names: &[&str]) -> Self {
        let columns =
            self.columns.iter().filter(|c| !names.contains(&c.name.as_str())).cloned().collect();
        Self { columns, n_rows: self.n_rows }
    }

    /// Get number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Get number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
