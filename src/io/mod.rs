mod csv_io;
mod report_io;

use std::path::Path;

use crate::error::EdaError;
use crate::models::Dataset;

pub use csv_io::{prepare_output_dir, read_csv, read_csv_from_bytes, NA_VALUES};
pub use report_io::{
    write_describe, write_dtypes, write_duplicates, write_missing_report, write_unique_counts,
    ReportWriter, DESCRIBE_FILE, DTYPES_FILE, DUPLICATES_FILE, MISSING_REPORT_FILE,
    UNIQUE_COUNTS_FILE,
};

/// Trait for reading a dataset from a file.
pub trait DatasetReader {
    fn read(&self, path: &Path) -> Result<Dataset, EdaError>;
}

/// Comma-delimited text with a header row.
pub struct CsvFormat;

impl DatasetReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Dataset, EdaError> {
        read_csv(path)
    }
}
