//! Excel and OpenDocument workbooks.
//!
//! Only the first worksheet is read. Its header row is located with
//! [`locate_header_row`] rather than assumed to be the first row.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use vcard_model::AliasTable;

use crate::error::{IngestError, Result};
use crate::header::locate_header_row;
use crate::table::{Cells, RawTable, is_blank, normalize_cell};

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => normalize_cell(value),
        other => normalize_cell(&other.to_string()),
    }
}

/// Reads the first sheet of the workbook at `path`.
pub fn read_spreadsheet(path: &Path, aliases: &AliasTable) -> Result<RawTable> {
    let spreadsheet_error = |source| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(IngestError::NoSheets {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(spreadsheet_error)?;
    let (height, width) = range.get_size();
    debug!(
        sheet = %sheet_name,
        sheets = sheet_names.len(),
        rows = height,
        columns = width,
        "reading worksheet"
    );

    let grid: Vec<Cells> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Cells>())
        .filter(|row| !is_blank(row))
        .collect();
    let header = locate_header_row(&grid, aliases);
    Ok(RawTable::from_grid(grid, header.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rendering() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(
            cell_text(&Data::String("  Ana ".to_string())),
            Some("Ana".to_string())
        );
        assert_eq!(cell_text(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::Float(22221234.0)), Some("22221234".to_string()));
        assert_eq!(cell_text(&Data::String("   ".to_string())), None);
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let result = read_spreadsheet(
            Path::new("/nonexistent/contacts.xlsx"),
            AliasTable::default_table(),
        );
        assert!(matches!(result, Err(IngestError::Spreadsheet { .. })));
    }
}
