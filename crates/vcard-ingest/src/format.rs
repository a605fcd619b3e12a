//! Input format detection from the file extension.

use std::fmt;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Supported input layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Plain text: the vertical contact layout, falling back to tab-separated.
    Text,
    /// Excel or OpenDocument workbook.
    Spreadsheet,
    /// Array of JSON objects or newline-delimited objects.
    Json,
}

impl FileFormat {
    /// Picks the format from the (case-insensitive) extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "txt" => Ok(Self::Text),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "json" | "ndjson" | "jsonl" => Ok(Self::Json),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Text => "text",
            Self::Spreadsheet => "spreadsheet",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
