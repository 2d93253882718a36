use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inferred type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Datetime,
    Object,
}

impl DType {
    /// Machine-number column types. Booleans are not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Datetime => "datetime64[ns]",
            DType::Object => "object",
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed date/time cell, either naive or carrying a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Microseconds since the Unix epoch. Naive values are read as UTC.
    pub fn epoch_micros(&self) -> i64 {
        match self {
            Timestamp::Naive(dt) => dt.and_utc().timestamp_micros(),
            Timestamp::Aware(dt) => dt.timestamp_micros(),
        }
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, Timestamp::Aware(_))
    }

    /// Rebuild a timestamp of the same kind from epoch microseconds.
    pub fn from_epoch_micros(micros: i64, aware: bool) -> Option<Self> {
        let utc: DateTime<Utc> = DateTime::from_timestamp_micros(micros)?;
        if aware {
            Some(Timestamp::Aware(utc.fixed_offset()))
        } else {
            Some(Timestamp::Naive(utc.naive_utc()))
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Aware(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

/// A single cell of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Datetime(Timestamp),
    Text(String),
}

/// Hashable identity of a cell, used for distinct counts and duplicate detection.
///
/// Numerically equal values compare equal regardless of representation, and
/// nulls compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Number(u64),
    Bool(bool),
    Datetime(i64, bool),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell, for `Int` and `Float` only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Int(i) => ValueKey::Number(normalized_bits(*i as f64)),
            Value::Float(f) => ValueKey::Number(normalized_bits(*f)),
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Datetime(ts) => ValueKey::Datetime(ts.epoch_micros(), ts.is_aware()),
            Value::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

fn normalized_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NaN"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Datetime(ts) => write!(f, "{ts}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Format a float the way dataframe CSV exports do: whole numbers keep one
/// decimal (`3.0`), others use the shortest round-trip form, NaN is empty.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        let s = if value > 0.0 { "inf" } else { "-inf" };
        s.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_dtype_names() {
        assert_eq!(DType::Int64.to_string(), "int64");
        assert_eq!(DType::Float64.to_string(), "float64");
        assert_eq!(DType::Bool.to_string(), "bool");
        assert_eq!(DType::Datetime.to_string(), "datetime64[ns]");
        assert_eq!(DType::Object.to_string(), "object");
    }

    #[test]
    fn test_bool_is_not_numeric() {
        assert!(DType::Int64.is_numeric());
        assert!(DType::Float64.is_numeric());
        assert!(!DType::Bool.is_numeric());
        assert!(!DType::Datetime.is_numeric());
        assert!(!DType::Object.is_numeric());
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(12.5), "12.5");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(f64::NAN), "");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_int_and_float_keys_match() {
        assert_eq!(Value::Int(3).key(), Value::Float(3.0).key());
        assert_eq!(Value::Float(0.0).key(), Value::Float(-0.0).key());
        assert_ne!(Value::Int(3).key(), Value::Text("3".to_string()).key());
    }

    #[test]
    fn test_null_keys_equal() {
        assert_eq!(Value::Null.key(), Value::Null.key());
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Int(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Bool(true).as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NaN");
        assert_eq!(Value::Float(7.0).to_string(), "7.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Text("red".into()).to_string(), "red");
    }

    #[test]
    fn test_timestamp_epoch_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let ts = Timestamp::Naive(dt);
        let back = Timestamp::from_epoch_micros(ts.epoch_micros(), false).unwrap();
        assert_eq!(back, ts);
        assert_eq!(back.to_string(), "2024-03-01 12:30:00");
    }
}
