pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod visualization;

pub use analysis::{Analyzer, SummaryReport};
pub use config::{EdaConfig, PlotConfig};
pub use error::EdaError;
pub use io::{CsvFormat, DatasetReader, ReportWriter};
pub use models::{Column, DType, Dataset, Value};
pub use pipeline::{run, RunSummary};
