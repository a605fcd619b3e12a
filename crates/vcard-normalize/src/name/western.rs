//! General Western name parsing.
//!
//! Splits a name into title, first, middle, last, and suffix. Handles the
//! `Last, First` comma form. Used as the last tier of [`super::parse_name`].

use super::lexicon::{is_suffix, is_title};

/// Components of a Western-ordered name, in the input's casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WesternName {
    pub title: String,
    pub first: String,
    pub middle: String,
    pub last: String,
    pub suffix: String,
}

impl WesternName {
    /// Parses `raw`; blank input yields an empty value.
    pub fn parse(raw: &str) -> Self {
        let mut suffixes: Vec<&str> = Vec::new();
        let mut pieces: Vec<&str> = match raw.split_once(',') {
            Some((before, after)) => {
                let after_tokens: Vec<&str> = after
                    .split([',', ' ', '\t'])
                    .filter(|token| !token.is_empty())
                    .collect();
                let before_tokens = before.split_whitespace();
                if !after_tokens.is_empty() && after_tokens.iter().all(|t| is_suffix(t)) {
                    // "John Smith, Jr."
                    suffixes.extend(after_tokens);
                    before_tokens.collect()
                } else {
                    // "Smith, John"
                    after_tokens.into_iter().chain(before_tokens).collect()
                }
            }
            None => raw.split_whitespace().collect(),
        };

        let mut titles = Vec::new();
        while pieces.len() > 1 && is_title(pieces[0]) {
            titles.push(pieces.remove(0));
        }
        let mut trailing = Vec::new();
        while pieces.len() > 1 && pieces.last().is_some_and(|t| is_suffix(t)) {
            if let Some(token) = pieces.pop() {
                trailing.push(token);
            }
        }
        trailing.reverse();
        trailing.extend(suffixes);
        let suffixes = trailing;

        let mut name = WesternName {
            title: titles.join(" "),
            suffix: suffixes
                .iter()
                .map(|s| s.trim_end_matches(','))
                .collect::<Vec<_>>()
                .join(" "),
            ..WesternName::default()
        };
        match pieces.as_slice() {
            [] => {}
            [only] => name.first = (*only).to_string(),
            [first, last] => {
                name.first = (*first).to_string();
                name.last = (*last).to_string();
            }
            [first, middle @ .., last] => {
                name.first = (*first).to_string();
                name.middle = middle.join(" ");
                name.last = (*last).to_string();
            }
        }
        name
    }

    /// First and middle names joined, as used for the given-name slot.
    pub fn given(&self) -> String {
        format!("{} {}", self.first, self.middle).trim().to_string()
    }
}
