//! Rectangular table of raw cells produced by every tabulizer.

use vcard_model::RawRow;

/// One row of raw cells; `None` is the null sentinel.
pub type Cells = Vec<Option<String>>;

/// Header labels plus data rows, before any field mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Cells>,
}

pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims a cell; blank cells become the null sentinel.
pub(crate) fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn is_blank(row: &[Option<String>]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|value| value.trim().is_empty()))
}

impl RawTable {
    /// Builds a table from a grid whose row `header_index` holds the labels.
    ///
    /// Blank rows are dropped. Data rows are padded or truncated to the
    /// header width.
    pub fn from_grid(grid: Vec<Cells>, header_index: usize) -> Self {
        let mut grid: Vec<Cells> = grid.into_iter().filter(|row| !is_blank(row)).collect();
        if header_index >= grid.len() {
            return Self::default();
        }
        let headers: Vec<String> = grid[header_index]
            .iter()
            .map(|cell| cell.as_deref().map(normalize_header).unwrap_or_default())
            .collect();
        let width = headers.len();
        let rows = grid
            .drain(header_index + 1..)
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts every data row into a labeled [`RawRow`].
    pub fn into_raw_rows(self) -> Vec<RawRow> {
        let Self { headers, rows } = self;
        rows.into_iter()
            .map(|cells| headers.iter().cloned().zip(cells).collect())
            .collect()
    }
}
