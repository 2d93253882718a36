use crate::analysis::{
    column_info, describe_with_fallback, duplicate_rows, missing_values, unique_counts, BoxStats,
    ColumnInfo, CorrelationMatrix, DescribeMode, DescribeTable, Histogram, MissingStat,
    SummaryReport, UniqueCount,
};
use crate::error::EdaError;
use crate::models::Dataset;

/// Unified analysis API that groups all analysis operations on a dataset.
pub struct Analyzer<'a> {
    dataset: &'a Dataset,
}

impl<'a> Analyzer<'a> {
    /// Create a new Analyzer for the given dataset.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.dataset.shape()
    }

    pub fn missing_values(&self) -> Vec<MissingStat> {
        missing_values(self.dataset)
    }

    pub fn unique_counts(&self) -> Vec<UniqueCount> {
        unique_counts(self.dataset)
    }

    pub fn column_info(&self) -> Vec<ColumnInfo> {
        column_info(self.dataset)
    }

    pub fn duplicate_rows(&self) -> usize {
        duplicate_rows(self.dataset)
    }

    /// Describe table, using the basic variant if datetime-as-numeric is unsupported.
    pub fn describe(&self) -> Result<(DescribeTable, DescribeMode), EdaError> {
        describe_with_fallback(self.dataset)
    }

    /// Every report view at once.
    pub fn summary_report(&self) -> Result<SummaryReport, EdaError> {
        SummaryReport::compute(self.dataset)
    }

    pub fn has_numeric_columns(&self) -> bool {
        !self.dataset.numeric_columns().is_empty()
    }

    /// One histogram per numeric column.
    pub fn histograms(&self, bins: usize) -> Vec<Histogram> {
        self.dataset
            .numeric_columns()
            .into_iter()
            .map(|c| Histogram::from_column(c, bins))
            .collect()
    }

    /// Pearson correlations between numeric columns.
    pub fn correlation(&self) -> CorrelationMatrix {
        CorrelationMatrix::compute(&self.dataset.numeric_columns())
    }

    /// Boxplot summaries for numeric columns that have at least one value.
    pub fn box_stats(&self) -> Vec<BoxStats> {
        self.dataset
            .numeric_columns()
            .into_iter()
            .filter_map(BoxStats::from_column)
            .collect()
    }
}
