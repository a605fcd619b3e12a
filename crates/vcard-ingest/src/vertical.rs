//! Vertical plain-text contact layout.
//!
//! Some directories are exported one value per line:
//!
//! ```text
//! Ana Jimenez
//! Gerente (TI)
//! ana@example.com
//! 2222-1234
//! 8888-0000
//! 123
//! ```
//!
//! Each block is anchored on its email line. The two lines before it are the
//! name and title; the phone-like lines after it are classified by digit
//! count and leading digit.

use tracing::debug;

use crate::table::{RawTable, normalize_cell};

/// How far ahead of the cursor an email line is searched for.
pub const EMAIL_LOOKAHEAD: usize = 10;

const STOP_MARKER: &str = "DEVELOPER NOTE";
const BARE_LABELS: &[&str] = &["Nombre", "Puesto", "Correo", "Ext"];
const MIN_PHONE_DIGITS: usize = 4;
const MIN_FULL_NUMBER_DIGITS: usize = 8;
const MOBILE_LEADING_DIGITS: &[char] = &['6', '7', '8'];

const COLUMNS: [&str; 6] = [
    "first_name",
    "business_title",
    "email",
    "work_phone",
    "mobile_phone",
    "work_phone_ext",
];

/// Lines that carry data: trimmed, non-blank, not comments or bare labels,
/// and above the first developer note.
pub fn clean_lines(text: &str) -> Vec<&str> {
    text.lines()
        .take_while(|line| !line.contains(STOP_MARKER))
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !BARE_LABELS.contains(line))
        .collect()
}

fn is_email_line(line: &str) -> bool {
    line.contains('@') && !line.contains(char::is_whitespace)
}

fn digit_count(line: &str) -> usize {
    line.chars().filter(char::is_ascii_digit).count()
}

#[derive(Debug, Default)]
struct VerticalContact<'a> {
    name: &'a str,
    title: &'a str,
    email: &'a str,
    work_phone: &'a str,
    mobile_phone: &'a str,
    extension: &'a str,
}

impl<'a> VerticalContact<'a> {
    /// Files a phone-like line; a later line of the same kind replaces an
    /// earlier one.
    fn file_phone(&mut self, line: &'a str) {
        let digits: String = line.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < MIN_FULL_NUMBER_DIGITS {
            self.extension = line;
        } else if digits.starts_with(MOBILE_LEADING_DIGITS) {
            self.mobile_phone = line;
        } else {
            self.work_phone = line;
        }
    }

    fn into_cells(self) -> Vec<Option<String>> {
        [
            self.name,
            self.title,
            self.email,
            self.work_phone,
            self.mobile_phone,
            self.extension,
        ]
        .into_iter()
        .map(normalize_cell)
        .collect()
    }
}

/// Scan position within the cleaned lines.
enum Scan {
    /// Looking for the next email line starting at the cursor.
    Seek(usize),
    /// Email found; collecting phone lines after it.
    Anchor(usize),
    Done,
}

/// Extracts contacts from the vertical layout.
///
/// Returns an empty table when no email anchor is found, which callers take
/// as "not this layout".
pub fn read_vertical(text: &str) -> RawTable {
    let lines = clean_lines(text);
    let mut rows = Vec::new();
    let mut state = Scan::Seek(0);

    loop {
        state = match state {
            Scan::Seek(cursor) => {
                let window_end = lines.len().min(cursor + EMAIL_LOOKAHEAD);
                (cursor..window_end)
                    .find(|&idx| is_email_line(lines[idx]))
                    .map_or(Scan::Done, Scan::Anchor)
            }
            Scan::Anchor(email_idx) => {
                let mut contact = VerticalContact {
                    email: lines[email_idx],
                    ..VerticalContact::default()
                };
                match email_idx {
                    0 => {}
                    1 => contact.name = lines[0],
                    _ => {
                        contact.name = lines[email_idx - 2];
                        contact.title = lines[email_idx - 1];
                    }
                }
                let mut next = email_idx + 1;
                while let Some(&line) = lines.get(next)
                    && digit_count(line) >= MIN_PHONE_DIGITS
                {
                    contact.file_phone(line);
                    next += 1;
                }
                rows.push(contact.into_cells());
                Scan::Seek(next)
            }
            Scan::Done => break,
        };
    }

    debug!(contacts = rows.len(), lines = lines.len(), "vertical text scan finished");
    if rows.is_empty() {
        return RawTable::default();
    }
    RawTable {
        headers: COLUMNS.iter().map(ToString::to_string).collect(),
        rows,
    }
}
