mod analyzer;
mod correlation;
mod describe;
mod distribution;
mod summary;

pub use analyzer::Analyzer;
pub use correlation::CorrelationMatrix;
pub use describe::{
    describe, describe_with_fallback, DescribeMode, DescribeRow, DescribeTable, StatValue,
    Statistic,
};
pub use distribution::{grid_layout, quantile, BoxStats, Histogram};
pub use summary::{
    column_info, dtype_counts, duplicate_rows, missing_values, unique_counts, ColumnInfo,
    MissingStat, SummaryReport, UniqueCount,
};
