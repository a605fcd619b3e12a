//! Tiered person-name parsing.
//!
//! A free-text name is split into given name and surname by three ordered
//! strategies:
//!
//! 1. **Spanish order** (`SURNAME SURNAME GIVEN…`), detected from the given
//!    name lexicon or an all-caps export with three or more tokens.
//! 2. **Normal order** by token count (three or more tokens).
//! 3. **Western fallback** for one or two tokens, which is also the only tier
//!    that yields a title or suffix.
//!
//! Output is title-cased; the suffix is returned as written.

pub mod lexicon;
pub mod western;

use tracing::trace;

use vcard_model::ParsedName;

use crate::casing::title_case;

use self::lexicon::{is_given_name, is_surname_particle};
use self::western::WesternName;

/// Which token order the detector settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrder {
    /// Surnames first, given names last.
    Spanish,
    /// Given names first.
    Normal,
}

/// Python-style `isupper`: at least one cased letter and no lowercase ones.
fn is_all_caps(raw: &str) -> bool {
    raw.chars().any(char::is_uppercase) && !raw.chars().any(char::is_lowercase)
}

/// Decides the token order of a trimmed name.
pub fn detect_order(raw: &str, tokens: &[&str]) -> NameOrder {
    let Some(first) = tokens.first() else {
        return NameOrder::Normal;
    };
    if is_given_name(first) {
        return NameOrder::Normal;
    }
    if tokens.len() == 4 && is_given_name(tokens[2]) && is_given_name(tokens[3]) {
        return NameOrder::Spanish;
    }
    if tokens.len() >= 3 && is_all_caps(raw) {
        return NameOrder::Spanish;
    }
    NameOrder::Normal
}

#[derive(Debug, Default)]
struct Split {
    given: String,
    surname: String,
    title: String,
    suffix: String,
}

impl Split {
    fn new(given: &[&str], surname: &[&str]) -> Self {
        Self {
            given: given.join(" "),
            surname: surname.join(" "),
            ..Self::default()
        }
    }
}

/// Length of the run of given names and surname particles at the end of
/// `tokens`.
fn trailing_given_run(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .rev()
        .take_while(|token| is_given_name(token) || is_surname_particle(token))
        .count()
}

fn split_spanish(tokens: &[&str]) -> Split {
    match tokens.len() {
        0 => Split::default(),
        1 => Split::new(tokens, &[]),
        2 => Split::new(&tokens[1..], &tokens[..1]),
        3 => Split::new(&tokens[2..], &tokens[..2]),
        _ => {
            // The run length is reported but does not move the split point:
            // the first two tokens are always the surnames.
            let run = trailing_given_run(tokens);
            trace!(
                tokens = tokens.len(),
                trailing_given_run = run,
                "spanish-order name with four or more tokens"
            );
            Split::new(&tokens[2..], &tokens[..2])
        }
    }
}

fn split_normal(raw: &str, tokens: &[&str]) -> Split {
    match tokens.len() {
        3 => Split::new(&tokens[..1], &tokens[1..]),
        n if n >= 4 => {
            if is_given_name(tokens[0]) && is_given_name(tokens[1]) {
                Split::new(&tokens[..2], &tokens[2..])
            } else {
                Split::new(&tokens[..1], &tokens[1..])
            }
        }
        _ => split_western(raw, tokens),
    }
}

fn split_western(raw: &str, tokens: &[&str]) -> Split {
    let western = WesternName::parse(raw);
    let mut split = Split {
        given: western.given(),
        surname: western.last.clone(),
        title: western.title,
        suffix: western.suffix,
    };
    if split.given.is_empty() && split.surname.is_empty() {
        split = if tokens.len() >= 2 {
            Split::new(&tokens[..1], &tokens[1..])
        } else {
            Split::new(tokens, &[])
        };
    }
    split
}

/// Splits a free-text name into its components.
///
/// Blank input yields an all-empty [`ParsedName`]; this never fails.
pub fn parse_name(input: &str) -> ParsedName {
    let raw = input.trim();
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() {
        return ParsedName::default();
    }

    let order = detect_order(raw, &tokens);
    let split = match order {
        NameOrder::Spanish => split_spanish(&tokens),
        NameOrder::Normal => split_normal(raw, &tokens),
    };
    trace!(?order, tokens = tokens.len(), "parsed name");

    let full = format!("{} {}", split.given, split.surname)
        .trim()
        .to_string();
    ParsedName {
        first: title_case(&split.given),
        last: title_case(&split.surname),
        title: title_case(&split.title),
        suffix: split.suffix,
        full: if full.is_empty() {
            title_case(raw)
        } else {
            title_case(&full)
        },
    }
}
