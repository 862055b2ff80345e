use std::io;
use thiserror::Error;

/// Error type for loading tables and configuring analysis.
///
/// The analysis functions themselves never fail; degenerate input is
/// reported through sentinel values instead.
#[derive(Error, Debug)]
pub enum LensError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Delimited-text parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// No header row could be read.
    #[error("Empty file or no data to analyze")]
    EmptyData,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for fallible table and analyzer operations.
pub type Result<T> = std::result::Result<T, LensError>;
