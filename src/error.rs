use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while profiling a dataset.
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(
        "Couldn't find {}. Place it in the working directory and try again.",
        .0.display()
    )]
    InputNotFound(PathBuf),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for EdaError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        EdaError::Render(err.to_string())
    }
}
