use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::EdaError;
use crate::models::{Column, DType, Dataset, Timestamp, Value};

/// Cell spellings read as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const AWARE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

fn is_na(cell: &str) -> bool {
    NA_VALUES.iter().any(|na| *na == cell)
}

fn csv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Read a dataset from a CSV file with a header row.
///
/// Fails with [`EdaError::InputNotFound`] when the path does not exist.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset, EdaError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EdaError::InputNotFound(path.to_path_buf()));
    }

    let rdr = csv_reader_builder().from_path(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let dataset = parse_csv_records(rdr, name)?;
    info!(
        path = %path.display(),
        rows = dataset.num_rows(),
        columns = dataset.num_columns(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read a dataset from CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], name: &str) -> Result<Dataset, EdaError> {
    let rdr = csv_reader_builder().from_reader(data);
    parse_csv_records(rdr, name.to_string())
}

/// Create the output directory (and parents) if absent. Idempotent.
pub fn prepare_output_dir(dir: impl AsRef<Path>) -> Result<PathBuf, EdaError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    debug!(dir = %dir.display(), "output directory ready");
    Ok(dir.to_path_buf())
}

fn parse_csv_records<R: Read>(mut rdr: csv::Reader<R>, name: String) -> Result<Dataset, EdaError> {
    let headers = unique_headers(rdr.headers()?);
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut extra_fields = 0usize;

    for result in rdr.records() {
        let record = result?;
        if record.len() > headers.len() {
            extra_fields += 1;
        }
        for (idx, column) in cells.iter_mut().enumerate() {
            let cell = record
                .get(idx)
                .filter(|s| !is_na(s))
                .map(str::to_string);
            column.push(cell);
        }
    }

    if extra_fields > 0 {
        warn!(rows = extra_fields, "ignored fields beyond the header width");
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(header, column)| infer_column(header, column))
        .collect();

    Dataset::from_columns(name, columns)
}

/// Make header names unique: blanks become `Unnamed: <i>`, repeats get `.1`, `.2`, ...
fn unique_headers(record: &csv::StringRecord) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(record.len());

    for (idx, raw) in record.iter().enumerate() {
        let base = if raw.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        while counts.contains_key(&name) {
            let n = counts.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }
        counts.insert(name.clone(), 0);
        names.push(name);
    }

    names
}

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let has_null = cells.iter().any(Option::is_none);
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();
    let dtype = infer_dtype(&present, has_null);
    debug!(column = %name, dtype = %dtype, nulls = has_null, "inferred column type");

    let values = cells
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) => parse_cell(s, dtype),
        })
        .collect();

    Column::new(name, dtype, values)
}

/// Pick the narrowest type every non-null cell parses as.
///
/// Integer columns with nulls widen to `Float64`; boolean columns with nulls
/// fall back to `Object`; a column with no values at all is `Float64`.
fn infer_dtype(present: &[&str], has_null: bool) -> DType {
    if present.is_empty() {
        return DType::Float64;
    }
    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        return if has_null { DType::Float64 } else { DType::Int64 };
    }
    if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        return DType::Float64;
    }
    if present.iter().all(|s| parse_bool(s).is_some()) {
        return if has_null { DType::Object } else { DType::Bool };
    }
    if present.iter().all(|s| parse_datetime(s).is_some()) {
        return DType::Datetime;
    }
    DType::Object
}

fn parse_cell(raw: String, dtype: DType) -> Value {
    let parsed = match dtype {
        DType::Int64 => raw.parse::<i64>().ok().map(Value::Int),
        DType::Float64 => raw.parse::<f64>().ok().map(Value::Float),
        DType::Bool => parse_bool(&raw).map(Value::Bool),
        DType::Datetime => parse_datetime(&raw).map(Value::Datetime),
        DType::Object => None,
    };
    parsed.unwrap_or(Value::Text(raw))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn parse_datetime(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::Aware(dt));
    }
    for fmt in AWARE_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(Timestamp::Aware(dt));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Timestamp::Naive(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(Timestamp::Naive);
        }
    }
    None
}
