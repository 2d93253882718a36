use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

use super::distribution::{quantile, sorted_copy};
use crate::error::EdaError;
use crate::models::{format_float, Column, DType, Dataset, Timestamp, Value, ValueKey};

/// How datetime columns are summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescribeMode {
    /// Datetime columns get mean/min/quartiles/max like numbers.
    DatetimeAsNumeric,
    /// Datetime columns are summarized like text (unique/top/freq).
    Basic,
}

/// A statistic column of the describe table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Count,
    Unique,
    Top,
    Freq,
    Mean,
    Std,
    Min,
    Q25,
    Q50,
    Q75,
    Max,
}

impl Statistic {
    pub const CATEGORICAL: [Statistic; 3] = [Statistic::Unique, Statistic::Top, Statistic::Freq];
    pub const NUMERIC: [Statistic; 7] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Q50,
        Statistic::Q75,
        Statistic::Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Unique => "unique",
            Statistic::Top => "top",
            Statistic::Freq => "freq",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Q25 => "25%",
            Statistic::Q50 => "50%",
            Statistic::Q75 => "75%",
            Statistic::Max => "max",
        }
    }
}

/// One cell of the describe table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(usize),
    Number(f64),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Integer(n) => Some(*n as f64),
            StatValue::Number(x) => Some(*x),
            StatValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Integer(n) => write!(f, "{n}"),
            StatValue::Number(x) => f.write_str(&format_float(*x)),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Statistics for one source column (one row of the transposed table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRow {
    pub column: String,
    pub values: BTreeMap<Statistic, StatValue>,
}

/// Transposed describe table: one row per source column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeTable {
    /// Statistic columns present, in display order
    pub statistics: Vec<Statistic>,
    pub rows: Vec<DescribeRow>,
}

impl DescribeTable {
    pub fn get(&self, column: &str, stat: Statistic) -> Option<&StatValue> {
        self.rows
            .iter()
            .find(|r| r.column == column)
            .and_then(|r| r.values.get(&stat))
    }
}

/// Describe every column of the dataset.
///
/// `DatetimeAsNumeric` returns [`EdaError::Unsupported`] when a datetime
/// column mixes offset-aware and naive timestamps.
pub fn describe(dataset: &Dataset, mode: DescribeMode) -> Result<DescribeTable, EdaError> {
    let mut rows = Vec::with_capacity(dataset.num_columns());
    let mut any_categorical = false;
    let mut any_numeric = false;

    for column in dataset.columns() {
        let values = match (column.dtype, mode) {
            (DType::Int64 | DType::Float64, _) => {
                any_numeric = true;
                describe_numeric(column)
            }
            (DType::Datetime, DescribeMode::DatetimeAsNumeric) => {
                any_numeric = true;
                describe_datetime(column)?
            }
            _ => {
                any_categorical = true;
                describe_categorical(column)
            }
        };
        rows.push(DescribeRow {
            column: column.name.clone(),
            values,
        });
    }

    let mut statistics = Vec::new();
    if !rows.is_empty() {
        statistics.push(Statistic::Count);
    }
    if any_categorical {
        statistics.extend(Statistic::CATEGORICAL);
    }
    if any_numeric {
        statistics.extend(Statistic::NUMERIC);
    }

    Ok(DescribeTable { statistics, rows })
}

/// Describe with datetime-as-numeric, falling back to the basic variant when
/// the data signals it is unsupported. Returns the variant actually used.
pub fn describe_with_fallback(
    dataset: &Dataset,
) -> Result<(DescribeTable, DescribeMode), EdaError> {
    match describe(dataset, DescribeMode::DatetimeAsNumeric) {
        Ok(table) => Ok((table, DescribeMode::DatetimeAsNumeric)),
        Err(EdaError::Unsupported(reason)) => {
            warn!(%reason, "datetime-as-numeric describe unsupported; using basic describe");
            let table = describe(dataset, DescribeMode::Basic)?;
            Ok((table, DescribeMode::Basic))
        }
        Err(e) => Err(e),
    }
}

fn describe_numeric(column: &Column) -> BTreeMap<Statistic, StatValue> {
    let values = column.numeric_values();
    let sorted = sorted_copy(&values);
    let (min, max) = match (sorted.first(), sorted.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => (f64::NAN, f64::NAN),
    };

    // Numeric rows are all floats, count included.
    let mut out = BTreeMap::new();
    out.insert(Statistic::Count, StatValue::Number(values.len() as f64));
    out.insert(Statistic::Mean, StatValue::Number(values.iter().mean()));
    out.insert(Statistic::Std, StatValue::Number(values.iter().std_dev()));
    out.insert(Statistic::Min, StatValue::Number(min));
    out.insert(Statistic::Q25, StatValue::Number(quantile(&sorted, 0.25)));
    out.insert(Statistic::Q50, StatValue::Number(quantile(&sorted, 0.5)));
    out.insert(Statistic::Q75, StatValue::Number(quantile(&sorted, 0.75)));
    out.insert(Statistic::Max, StatValue::Number(max));
    out
}

fn describe_categorical(column: &Column) -> BTreeMap<Statistic, StatValue> {
    let mut counts: HashMap<ValueKey, (usize, usize)> = HashMap::new();
    let mut first_seen: Vec<&Value> = Vec::new();

    for value in column.non_null() {
        let entry = counts.entry(value.key()).or_insert_with(|| {
            first_seen.push(value);
            (first_seen.len() - 1, 0)
        });
        entry.1 += 1;
    }

    let mut out = BTreeMap::new();
    out.insert(Statistic::Count, StatValue::Integer(column.non_null_count()));
    out.insert(Statistic::Unique, StatValue::Integer(counts.len()));

    // Most frequent value; ties go to the one seen first.
    if let Some((order, freq)) = counts
        .values()
        .copied()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    {
        out.insert(Statistic::Top, StatValue::Text(first_seen[order].to_string()));
        out.insert(Statistic::Freq, StatValue::Integer(freq));
    }
    out
}

fn describe_datetime(column: &Column) -> Result<BTreeMap<Statistic, StatValue>, EdaError> {
    let stamps: Vec<&Timestamp> = column
        .non_null()
        .filter_map(|v| match v {
            Value::Datetime(ts) => Some(ts),
            _ => None,
        })
        .collect();

    let aware = stamps.first().map(|ts| ts.is_aware()).unwrap_or(false);
    if stamps.iter().any(|ts| ts.is_aware() != aware) {
        return Err(EdaError::Unsupported(format!(
            "column '{}' mixes timezone-aware and naive timestamps",
            column.name
        )));
    }

    let micros: Vec<f64> = stamps.iter().map(|ts| ts.epoch_micros() as f64).collect();
    let sorted = sorted_copy(&micros);
    debug!(column = %column.name, count = sorted.len(), "describing datetime column");

    let render = |m: f64| -> StatValue {
        if m.is_nan() {
            return StatValue::Number(f64::NAN);
        }
        Timestamp::from_epoch_micros(m.round() as i64, aware)
            .map(|ts| StatValue::Text(ts.to_string()))
            .unwrap_or(StatValue::Number(f64::NAN))
    };

    let mean = if sorted.is_empty() {
        f64::NAN
    } else {
        sorted.iter().mean()
    };

    let mut out = BTreeMap::new();
    out.insert(Statistic::Count, StatValue::Integer(sorted.len()));
    out.insert(Statistic::Mean, render(mean));
    out.insert(Statistic::Min, render(quantile(&sorted, 0.0)));
    out.insert(Statistic::Q25, render(quantile(&sorted, 0.25)));
    out.insert(Statistic::Q50, render(quantile(&sorted, 0.5)));
    out.insert(Statistic::Q75, render(quantile(&sorted, 0.75)));
    out.insert(Statistic::Max, render(quantile(&sorted, 1.0)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_csv_from_bytes;
    use assert_approx_eq::assert_approx_eq;

    fn load(data: &str) -> Dataset {
        read_csv_from_bytes(data.as_bytes(), "test").unwrap()
    }

    fn num(table: &DescribeTable, column: &str, stat: Statistic) -> f64 {
        table.get(column, stat).and_then(StatValue::as_f64).unwrap()
    }

    #[test]
    fn test_numeric_one_to_five() {
        let ds = load("x\n1\n2\n3\n4\n5\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(table.get("x", Statistic::Count), Some(&StatValue::Number(5.0)));
        assert_approx_eq!(num(&table, "x", Statistic::Mean), 3.0);
        assert_approx_eq!(num(&table, "x", Statistic::Min), 1.0);
        assert_approx_eq!(num(&table, "x", Statistic::Max), 5.0);
        assert_approx_eq!(num(&table, "x", Statistic::Q25), 2.0);
        assert_approx_eq!(num(&table, "x", Statistic::Q50), 3.0);
        assert_approx_eq!(num(&table, "x", Statistic::Q75), 4.0);
        assert_approx_eq!(num(&table, "x", Statistic::Std), 1.5811388, 1e-6);
    }

    #[test]
    fn test_numeric_only_has_no_categorical_columns() {
        let ds = load("x,y\n1,2.5\n2,3.5\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(table.statistics[0], Statistic::Count);
        assert!(!table.statistics.contains(&Statistic::Top));
        assert!(table.statistics.contains(&Statistic::Q75));
    }

    #[test]
    fn test_categorical_top_and_freq() {
        let ds = load("color\nred\nblue\nred\ngreen\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(
            table.get("color", Statistic::Top),
            Some(&StatValue::Text("red".to_string()))
        );
        assert_eq!(table.get("color", Statistic::Freq), Some(&StatValue::Integer(2)));
        assert_eq!(table.get("color", Statistic::Unique), Some(&StatValue::Integer(3)));
        assert!(table.get("color", Statistic::Mean).is_none());
        assert!(!table.statistics.contains(&Statistic::Mean));
    }

    #[test]
    fn test_categorical_tie_prefers_first_seen() {
        let ds = load("c\nb\na\na\nb\n");
        let table = describe(&ds, DescribeMode::Basic).unwrap();
        assert_eq!(
            table.get("c", Statistic::Top),
            Some(&StatValue::Text("b".to_string()))
        );
    }

    #[test]
    fn test_mixed_table_has_all_statistics() {
        let ds = load("n,s\n1,a\n2,b\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(table.statistics.len(), 11);
    }

    #[test]
    fn test_datetime_as_numeric() {
        let ds = load("when\n2024-01-01\n2024-01-03\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(
            table.get("when", Statistic::Mean),
            Some(&StatValue::Text("2024-01-02 00:00:00".to_string()))
        );
        assert!(table.get("when", Statistic::Top).is_none());
    }

    #[test]
    fn test_datetime_basic_is_categorical() {
        let ds = load("when\n2024-01-01\n2024-01-01\n2024-01-03\n");
        let table = describe(&ds, DescribeMode::Basic).unwrap();
        assert_eq!(table.get("when", Statistic::Freq), Some(&StatValue::Integer(2)));
        assert!(table.get("when", Statistic::Mean).is_none());
    }

    #[test]
    fn test_mixed_offsets_signal_unsupported() {
        let ds = load("when\n2024-01-01 10:00:00\n2024-01-01T10:00:00+02:00\n");
        let result = describe(&ds, DescribeMode::DatetimeAsNumeric);
        assert!(matches!(result, Err(EdaError::Unsupported(_))));
    }

    #[test]
    fn test_fallback_uses_basic_on_unsupported() {
        let ds = load("when\n2024-01-01 10:00:00\n2024-01-01T10:00:00+02:00\n");
        let (table, mode) = describe_with_fallback(&ds).unwrap();
        assert_eq!(mode, DescribeMode::Basic);
        assert_eq!(table.get("when", Statistic::Unique), Some(&StatValue::Integer(2)));
    }

    #[test]
    fn test_fallback_keeps_extended_when_supported() {
        let ds = load("x\n1\n2\n");
        let (_, mode) = describe_with_fallback(&ds).unwrap();
        assert_eq!(mode, DescribeMode::DatetimeAsNumeric);
    }

    #[test]
    fn test_empty_dataset_is_degenerate_not_error() {
        let ds = load("a,b\n");
        let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.get("a", Statistic::Count), Some(&StatValue::Number(0.0)));
        assert!(num(&table, "a", Statistic::Mean).is_nan());
    }

    #[test]
    fn test_statistic_labels() {
        let labels: Vec<&str> = Statistic::NUMERIC.iter().map(Statistic::label).collect();
        assert_eq!(labels, vec!["mean", "std", "min", "25%", "50%", "75%", "max"]);
    }
}
