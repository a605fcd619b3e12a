//! Error types for contact file ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an input file into rows.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Format Errors ===
    /// Extension is not one of the supported input formats.
    #[error("unsupported file type '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Delimited text could not be parsed.
    #[error("failed to parse delimited text: {source}")]
    Delimited {
        #[source]
        source: csv::Error,
    },

    /// Workbook could not be opened or read.
    #[error("failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Workbook has no worksheets.
    #[error("spreadsheet has no sheets: {path}")]
    NoSheets { path: PathBuf },

    /// JSON input was malformed.
    #[error("failed to parse JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    /// JSON input held something other than objects.
    #[error("expected JSON objects, found {found}")]
    JsonShape { found: &'static str },
}

impl From<csv::Error> for IngestError {
    fn from(source: csv::Error) -> Self {
        Self::Delimited { source }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
