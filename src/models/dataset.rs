use std::collections::HashSet;

use super::{DType, Value};
use crate::error::EdaError;

/// A named, typed column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header name, unique within the dataset
    pub name: String,
    /// Type inferred at load time
    pub dtype: DType,
    /// One cell per row
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Number of non-null cells.
    pub fn non_null_count(&self) -> usize {
        self.len() - self.null_count()
    }

    /// Non-null cells in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Non-null numeric cells as `f64`, in row order. Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Count of distinct non-null values.
    pub fn unique_count(&self) -> usize {
        self.non_null().map(Value::key).collect::<HashSet<_>>().len()
    }
}

/// The in-memory table loaded from a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Name or identifier for this dataset (usually the file stem)
    pub name: String,
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Create a new dataset with no columns and no rows.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            num_rows: 0,
        }
    }

    /// Build a dataset from columns, checking that names are unique and all
    /// columns have the same length.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, EdaError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(EdaError::ParseError(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }

        let num_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != num_rows) {
            return Err(EdaError::ParseError(format!(
                "Column '{}' has {} rows, expected {num_rows}",
                bad.name,
                bad.len()
            )));
        }

        Ok(Self {
            name: name.into(),
            columns,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns with a machine-number dtype, in dataset order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.dtype.is_numeric()).collect()
    }

    /// Cells of one row, in column order. Returns `None` past the last row.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.num_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Vec<Vec<&Value>> {
        (0..n.min(self.num_rows))
            .filter_map(|i| self.row(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_column(name: &str, values: &[i64]) -> Column {
        Column::new(
            name,
            DType::Int64,
            values.iter().map(|v| Value::Int(*v)).collect(),
        )
    }

    #[test]
    fn test_from_columns_shape() {
        let ds = Dataset::from_columns(
            "t",
            vec![int_column("a", &[1, 2, 3]), int_column("b", &[4, 5, 6])],
        )
        .unwrap();
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_columns_rejects_duplicate_names() {
        let result = Dataset::from_columns(
            "t",
            vec![int_column("a", &[1]), int_column("a", &[2])],
        );
        assert!(matches!(result, Err(EdaError::ParseError(_))));
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Dataset::from_columns(
            "t",
            vec![int_column("a", &[1, 2]), int_column("b", &[2])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_is_empty() {
        let ds = Dataset::new("empty");
        assert!(ds.is_empty());
        assert_eq!(ds.shape(), (0, 0));
        assert!(ds.head(5).is_empty());
    }

    #[test]
    fn test_head_and_row() {
        let ds = Dataset::from_columns("t", vec![int_column("a", &[1, 2, 3, 4, 5, 6, 7])])
            .unwrap();
        assert_eq!(ds.head(5).len(), 5);
        assert_eq!(ds.row(6), Some(vec![&Value::Int(7)]));
        assert_eq!(ds.row(7), None);
    }

    #[test]
    fn test_column_null_and_unique_counts() {
        let col = Column::new(
            "x",
            DType::Float64,
            vec![
                Value::Float(1.0),
                Value::Null,
                Value::Float(1.0),
                Value::Float(2.0),
            ],
        );
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.non_null_count(), 3);
        assert_eq!(col.unique_count(), 2);
        assert_eq!(col.numeric_values(), vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_numeric_columns_excludes_bool() {
        let ds = Dataset::from_columns(
            "t",
            vec![
                int_column("n", &[1, 2]),
                Column::new("flag", DType::Bool, vec![Value::Bool(true), Value::Bool(false)]),
            ],
        )
        .unwrap();
        let numeric: Vec<&str> = ds.numeric_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["n"]);
    }
}
