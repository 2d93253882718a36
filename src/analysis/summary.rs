use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::describe::{describe_with_fallback, DescribeMode, DescribeTable};
use crate::error::EdaError;
use crate::models::{DType, Dataset, ValueKey};

/// Missing-value count and percentage for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingStat {
    pub column: String,
    pub missing_count: usize,
    /// `missing_count / rows * 100`, 0.0 for an empty dataset
    pub missing_pct: f64,
}

/// Distinct non-null values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueCount {
    pub column: String,
    pub unique_count: usize,
}

/// Non-null count and inferred type of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column: String,
    pub non_null: usize,
    pub dtype: DType,
}

pub fn missing_values(dataset: &Dataset) -> Vec<MissingStat> {
    let rows = dataset.num_rows();
    dataset
        .columns()
        .iter()
        .map(|c| {
            let missing_count = c.null_count();
            let missing_pct = if rows == 0 {
                0.0
            } else {
                missing_count as f64 / rows as f64 * 100.0
            };
            MissingStat {
                column: c.name.clone(),
                missing_count,
                missing_pct,
            }
        })
        .collect()
}

pub fn unique_counts(dataset: &Dataset) -> Vec<UniqueCount> {
    dataset
        .columns()
        .iter()
        .map(|c| UniqueCount {
            column: c.name.clone(),
            unique_count: c.unique_count(),
        })
        .collect()
}

pub fn column_info(dataset: &Dataset) -> Vec<ColumnInfo> {
    dataset
        .columns()
        .iter()
        .map(|c| ColumnInfo {
            column: c.name.clone(),
            non_null: c.non_null_count(),
            dtype: c.dtype,
        })
        .collect()
}

/// Number of rows that exactly repeat an earlier row. Nulls match nulls.
pub fn duplicate_rows(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<ValueKey>> = HashSet::with_capacity(dataset.num_rows());
    (0..dataset.num_rows())
        .filter_map(|i| dataset.row(i))
        .filter(|row| !seen.insert(row.iter().map(|v| v.key()).collect()))
        .count()
}

/// Tally of columns per dtype, in first-seen order.
pub fn dtype_counts(dataset: &Dataset) -> Vec<(DType, usize)> {
    let mut tally: Vec<(DType, usize)> = Vec::new();
    for column in dataset.columns() {
        match tally.iter_mut().find(|(d, _)| *d == column.dtype) {
            Some((_, n)) => *n += 1,
            None => tally.push((column.dtype, 1)),
        }
    }
    tally
}

/// All report views over a dataset. Each is derived independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub name: String,
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub dtypes: Vec<ColumnInfo>,
    pub missing: Vec<MissingStat>,
    pub unique: Vec<UniqueCount>,
    pub duplicate_rows: usize,
    pub describe: DescribeTable,
    pub describe_mode: DescribeMode,
}

impl SummaryReport {
    pub fn compute(dataset: &Dataset) -> Result<Self, EdaError> {
        let (describe, describe_mode) = describe_with_fallback(dataset)?;
        Ok(SummaryReport {
            name: dataset.name.clone(),
            shape: dataset.shape(),
            columns: dataset.column_names(),
            dtypes: column_info(dataset),
            missing: missing_values(dataset),
            unique: unique_counts(dataset),
            duplicate_rows: duplicate_rows(dataset),
            describe,
            describe_mode,
        })
    }

    /// Pretty-printed JSON form of the whole report.
    pub fn to_json(&self) -> Result<String, EdaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
