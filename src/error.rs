use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockLensError {
    #[error("Unrecognized input format: {0}")]
    Format(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Empty series: {0}")]
    EmptySeries(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StockLensError>;
