//! Error types for the rowgraph library.

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rowgraph operations.
///
/// Only configuration defects and row structural defects surface here.
/// Value-level problems are reported through [`crate::Diagnostics`] and
/// never abort processing.
#[derive(Debug, Error)]
pub enum RowgraphError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Invalid delimiter specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preprocessor type tag with no implementation.
    #[error("Preprocessor of type '{0}' does not exist")]
    UnknownPreprocessor(String),

    /// Generator key not declared by the processor.
    #[error("Attribute generator '{0}' is not declared by the processor")]
    UnknownGenerator(String),

    /// Data entry or processor name not present in the configuration.
    #[error("Unknown configuration entry: {0}")]
    UnknownEntry(String),

    /// Row does not conform to RFC 4180 quoting.
    #[error("Quoting error at byte {position}: {message}")]
    Quoting { position: usize, message: String },

    /// Row has more tokens than the header has columns.
    #[error(
        "Malformed input row at line {line} (additional separator characters found), \
         not inserted; fix the row and restart the migration: {row}"
    )]
    MalformedRow { line: usize, row: String },
}

/// Result type alias for rowgraph operations.
pub type Result<T> = std::result::Result<T, RowgraphError>;

/// Reason a cleaned value could not be coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("not a valid long: {0}")]
    Long(#[from] ParseIntError),

    #[error("not a valid double: {0}")]
    Double(#[from] ParseFloatError),

    #[error("not a finite double: '{0}'")]
    NonFinite(String),

    #[error("not a valid boolean: '{0}' (expected true or false)")]
    Boolean(String),

    #[error("not an ISO 8601 date-time: {0}")]
    DateTime(#[from] chrono::ParseError),

    #[error("not an ISO 8601 date-time: '{0}'")]
    DateTimeShape(String),
}
