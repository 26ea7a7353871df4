//! Dataset error types
//!
//! Errors raised while loading the source CSV or computing statistics over it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Source file does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV could not be parsed (ragged rows, bad encoding, ...)
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Errors that can occur while computing summary statistics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// No values to summarise
    #[error("column '{0}' has no values")]
    Empty(String),

    /// Sample standard deviation needs at least two values
    #[error("column '{column}' needs at least 2 values for a standard deviation, found {found}")]
    InsufficientData { column: String, found: usize },

    /// A statistic came out as NaN or infinity
    #[error("{statistic} of column '{column}' is not a finite number")]
    NonFinite { column: String, statistic: String },
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
