//! Error types for the comdirect importer.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading a statement export.
///
/// A file that simply is not a comdirect export is not an error; see
/// [`crate::types::Extraction::Skipped`].
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred while reading the export or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading the tabular section.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading configuration or writing JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header pattern failed to compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Line 3 does not carry the "Neuer Kontostand" label.
    ///
    /// Kept apart from [`Error::MalformedHeader`] so callers can skip
    /// statements that are still open.
    #[error("File does not have a new balance (line {line})")]
    MissingClosingBalance { line: usize },

    /// The metadata header could not be understood.
    #[error("Invalid metadata: {reason}: {line}")]
    MalformedHeader { reason: String, line: String },

    /// A numeric field is not a decimal after normalization.
    #[error("Invalid amount format: {0}")]
    MalformedAmount(String),

    /// The file name does not carry a `yyyymmdd[-hhmm]` stamp.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Unknown output format name.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl Error {
    pub(crate) fn malformed_header(reason: impl Into<String>, line: impl Into<String>) -> Self {
        Error::MalformedHeader {
            reason: reason.into(),
            line: line.into(),
        }
    }
}
