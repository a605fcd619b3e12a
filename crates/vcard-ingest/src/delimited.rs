//! Comma- and tab-separated text.

use csv::ReaderBuilder;

use crate::error::Result;
use crate::table::{Cells, RawTable, normalize_cell};

/// Parses delimited text whose first non-blank row holds the headers.
pub fn read_delimited(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut grid: Vec<Cells> = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(normalize_cell).collect());
    }
    Ok(RawTable::from_grid(grid, 0))
}
