//! File-level entry point: size check, format dispatch, decoding.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use vcard_model::AliasTable;

use crate::delimited::read_delimited;
use crate::encoding::decode_text;
use crate::error::{IngestError, Result};
use crate::format::FileFormat;
use crate::json::read_json;
use crate::spreadsheet::read_spreadsheet;
use crate::table::RawTable;
use crate::vertical::read_vertical;

/// Maximum input file size (500 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 500 * 1024 * 1024;

fn read_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Check file size against a limit, returning the size.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(metadata.len())
}

/// Tabulizes already decoded text.
///
/// Plain text is read as the vertical contact layout first and as
/// tab-separated values when no contact block is found. Spreadsheets are
/// binary and must go through [`read_table`].
pub fn read_text_table(text: &str, format: FileFormat) -> Result<RawTable> {
    match format {
        FileFormat::Csv => read_delimited(text, b','),
        FileFormat::Tsv => read_delimited(text, b'\t'),
        FileFormat::Json => read_json(text),
        FileFormat::Text => {
            let vertical = read_vertical(text);
            if vertical.is_empty() {
                debug!("no vertical contact blocks, reading as tab-separated");
                read_delimited(text, b'\t')
            } else {
                Ok(vertical)
            }
        }
        FileFormat::Spreadsheet => Err(IngestError::UnsupportedFormat {
            path: PathBuf::new(),
            extension: format.to_string(),
        }),
    }
}

/// Reads any supported contact file into a [`RawTable`].
pub fn read_table(path: &Path, aliases: &AliasTable) -> Result<RawTable> {
    let format = FileFormat::from_path(path)?;
    let size = check_file_size(path, MAX_INPUT_FILE_SIZE)?;
    debug!(path = %path.display(), %format, size, "reading input file");

    let table = match format {
        FileFormat::Spreadsheet => read_spreadsheet(path, aliases)?,
        _ => {
            let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
            let decoded = decode_text(&bytes);
            read_text_table(&decoded.text, format)?
        }
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(
        file = %file_name,
        %format,
        rows = table.len(),
        columns = table.headers.len(),
        "parsed input file"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_falls_back_to_tab_separated() {
        let table = read_text_table("Nombre\tTeléfono\nAna\t22221234\n", FileFormat::Text).unwrap();
        assert_eq!(table.headers, vec!["Nombre", "Teléfono"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn text_prefers_vertical_layout() {
        let table = read_text_table("Ana\nGerente\nana@example.com\n", FileFormat::Text).unwrap();
        assert_eq!(table.headers[0], "first_name");
    }

    #[test]
    fn size_limit_is_enforced() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"0123456789").unwrap();
        assert_eq!(check_file_size(file.path(), 10).unwrap(), 10);
        assert!(matches!(
            check_file_size(file.path(), 9),
            Err(IngestError::FileTooLarge { size: 10, .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = read_table(
            Path::new("/nonexistent/contacts.csv"),
            AliasTable::default_table(),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
