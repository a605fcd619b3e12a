//! Contact file ingestion.
//!
//! Turns an input file into a [`RawTable`] of header labels and raw cells,
//! ready for field mapping.
//!
//! # Formats
//!
//! - **CSV / TSV**: first non-blank row is the header
//! - **Spreadsheets** (xls, xlsx, xlsm, xlsb, ods): first sheet, header row
//!   located by alias keyword matching
//! - **Plain text**: vertical one-value-per-line layout, else tab-separated
//! - **JSON**: array of objects or newline-delimited objects
//!
//! Text input is decoded as UTF-8 when valid, otherwise by byte sniffing.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use vcard_ingest::read_table;
//! use vcard_model::AliasTable;
//!
//! let table = read_table(Path::new("contacts.xlsx"), AliasTable::default_table())?;
//! for row in table.into_raw_rows() {
//!     // map row
//! }
//! ```

#![deny(unsafe_code)]

mod delimited;
mod encoding;
mod error;
mod format;
mod header;
mod json;
mod reader;
mod spreadsheet;
mod table;
mod vertical;

// === Error Types ===
pub use error::{IngestError, Result};

// === Entry Points ===
pub use reader::{MAX_INPUT_FILE_SIZE, check_file_size, read_table, read_text_table};

// === Tabulizers ===
pub use delimited::read_delimited;
pub use json::read_json;
pub use spreadsheet::read_spreadsheet;
pub use vertical::{EMAIL_LOOKAHEAD, clean_lines, read_vertical};

// === Detection ===
pub use encoding::{DecodedText, decode_text};
pub use format::FileFormat;
pub use header::{HEADER_SCAN_ROWS, HeaderMatch, locate_header_row};

// === Table ===
pub use table::{Cells, RawTable};
