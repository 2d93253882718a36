use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::{ColumnInfo, DescribeTable, MissingStat, SummaryReport, UniqueCount};
use crate::error::EdaError;
use crate::models::format_float;

pub const MISSING_REPORT_FILE: &str = "missing_report.csv";
pub const UNIQUE_COUNTS_FILE: &str = "unique_counts.csv";
pub const DTYPES_FILE: &str = "dtypes.csv";
pub const DESCRIBE_FILE: &str = "summary_describe.csv";
pub const DUPLICATES_FILE: &str = "duplicates.txt";

/// Write missing-value counts and percentages, one row per column.
pub fn write_missing_report(missing: &[MissingStat], path: impl AsRef<Path>) -> Result<(), EdaError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record(["", "missing_count", "missing_pct"])?;
    for stat in missing {
        wtr.write_record([
            stat.column.clone(),
            stat.missing_count.to_string(),
            format_float(stat.missing_pct),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write distinct-value counts, one row per column.
pub fn write_unique_counts(unique: &[UniqueCount], path: impl AsRef<Path>) -> Result<(), EdaError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record(["", "unique_count"])?;
    for u in unique {
        wtr.write_record([u.column.clone(), u.unique_count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the inferred dtype of each column.
pub fn write_dtypes(dtypes: &[ColumnInfo], path: impl AsRef<Path>) -> Result<(), EdaError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record(["", "dtype"])?;
    for info in dtypes {
        wtr.write_record([info.column.as_str(), info.dtype.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the transposed describe table; inapplicable cells are left empty.
pub fn write_describe(table: &DescribeTable, path: impl AsRef<Path>) -> Result<(), EdaError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    let mut header = vec![String::new()];
    header.extend(table.statistics.iter().map(|s| s.label().to_string()));
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.column.clone()];
        record.extend(table.statistics.iter().map(|stat| {
            row.values
                .get(stat)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the single-line duplicate-row note.
pub fn write_duplicates(count: usize, path: impl AsRef<Path>) -> Result<(), EdaError> {
    std::fs::write(path.as_ref(), format!("Duplicate rows: {count}\n"))?;
    Ok(())
}

/// Writes every tabular artifact of a [`SummaryReport`] into one directory.
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn path_for(&self, file: &str) -> PathBuf {
        self.out_dir.join(file)
    }

    /// Write all five report files, overwriting earlier runs. Returns their paths.
    pub fn write_all(&self, report: &SummaryReport) -> Result<Vec<PathBuf>, EdaError> {
        let missing = self.path_for(MISSING_REPORT_FILE);
        write_missing_report(&report.missing, &missing)?;

        let unique = self.path_for(UNIQUE_COUNTS_FILE);
        write_unique_counts(&report.unique, &unique)?;

        let dtypes = self.path_for(DTYPES_FILE);
        write_dtypes(&report.dtypes, &dtypes)?;

        let describe = self.path_for(DESCRIBE_FILE);
        write_describe(&report.describe, &describe)?;

        let duplicates = self.path_for(DUPLICATES_FILE);
        write_duplicates(report.duplicate_rows, &duplicates)?;

        let written = vec![missing, unique, dtypes, describe, duplicates];
        for path in &written {
            debug!(path = %path.display(), "wrote report");
        }
        Ok(written)
    }
}
