use std::path::PathBuf;
use thiserror::Error;

/// Error type for netdist operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (bad chunk size, impossible sample target, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A named column is missing from the entity table header.
    #[error("column not found in entity table: {0}")]
    ColumnNotFound(String),

    /// Graph file parsing error.
    #[error("failed to parse graph file: {0}")]
    GraphParse(String),

    /// Pair row parsing error.
    #[error("failed to parse pair row: {0}")]
    PairParse(String),

    /// Refusing to overwrite an existing file.
    #[error("path already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for netdist operations.
pub type Result<T> = std::result::Result<T, Error>;
