//! Header row discovery for sheets whose labels are not on the first row.
//!
//! Each of the first [`HEADER_SCAN_ROWS`] rows is scored by how many of its
//! cells look like a known header alias. The earliest row with the highest
//! score wins; when no row scores, row 0 is assumed and a warning is logged.

use tracing::{debug, warn};

use vcard_model::{AliasTable, fold_key};

/// Upper bound on the rows inspected.
pub const HEADER_SCAN_ROWS: usize = 20;

/// Minimum length for substring matches in either direction. Shorter keys
/// (`tel`, `li`, `ext`) only match exactly.
const MIN_CONTAINMENT_LEN: usize = 4;

/// Outcome of the header scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    pub index: usize,
    /// Number of cells in the row that matched an alias; zero on fallback.
    pub score: usize,
}

fn cell_matches(cell: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        cell == *keyword
            || (keyword.chars().count() >= MIN_CONTAINMENT_LEN && cell.contains(keyword))
            || (cell.chars().count() >= MIN_CONTAINMENT_LEN && keyword.contains(cell))
    })
}

fn score_row(row: &[Option<String>], keywords: &[&str]) -> usize {
    row.iter()
        .filter_map(|cell| cell.as_deref())
        .map(fold_key)
        .filter(|cell| !cell.is_empty() && cell_matches(cell, keywords))
        .count()
}

/// Picks the header row among the leading rows of `rows`.
pub fn locate_header_row(rows: &[Vec<Option<String>>], aliases: &AliasTable) -> HeaderMatch {
    let keywords: Vec<&str> = aliases.keywords().collect();
    let mut best = HeaderMatch { index: 0, score: 0 };
    for (index, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let score = score_row(row, &keywords);
        if score > best.score {
            best = HeaderMatch { index, score };
        }
    }

    if best.score == 0 {
        warn!("could not confidently detect header row, assuming row 0");
    } else {
        debug!(
            header_row = best.index,
            matches = best.score,
            "detected header row"
        );
    }
    best
}
