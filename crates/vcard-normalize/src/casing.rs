//! Locale-aware text casing.
//!
//! Two modes are provided:
//! - [`title_case`]: capitalize the first letter of every whitespace-delimited
//!   word and lowercase the rest.
//! - [`smart_title_case`]: like `title_case`, but Spanish and English articles,
//!   prepositions and conjunctions stay lowercase unless they are the first or
//!   last word.
//!
//! Both modes leave parenthesized spans exactly as written:
//! `"gerente (CEO)"` becomes `"Gerente (CEO)"`.

use std::sync::LazyLock;

use regex::Regex;

use vcard_model::{CanonicalField, FieldCasing};

static PAREN_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]+\)").expect("parenthesized span pattern is valid")
});

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Words kept lowercase by [`smart_title_case`] when not at either end.
pub const SMART_CASE_STOP_WORDS: &[&str] = &[
    // Spanish
    "de", "del", "la", "las", "los", "y", "e", "o", "u", "el", "un", "una", "unos", "unas", "al",
    "en", "con", "por", "para", "sin", "sobre",
    // English
    "a", "an", "the", "of", "and", "or", "in", "on", "at", "to", "for", "with", "from", "by",
    "as", "is", "was", "are", "were",
];

/// Parenthesized spans pulled out of a string and replaced by placeholders
/// that no casing operation can alter.
struct Protected {
    text: String,
    spans: Vec<String>,
}

impl Protected {
    fn extract(input: &str) -> Self {
        let mut spans = Vec::new();
        let text = PAREN_SPAN
            .replace_all(input, |caps: &regex::Captures<'_>| {
                let marker = format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", spans.len());
                spans.push(caps[0].to_string());
                marker
            })
            .into_owned();
        Self { text, spans }
    }

    fn restore(&self, cased: String) -> String {
        let mut out = cased;
        for (idx, original) in self.spans.iter().enumerate() {
            let marker = format!("{PLACEHOLDER_OPEN}{idx}{PLACEHOLDER_CLOSE}");
            out = out.replacen(&marker, original, 1);
        }
        out
    }
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out
}

fn is_stop_word(word: &str) -> bool {
    let bare = word
        .trim_end_matches(|ch: char| ch.is_ascii_punctuation())
        .to_lowercase();
    SMART_CASE_STOP_WORDS.contains(&bare.as_str())
}

/// Rebuilds `text` word by word, keeping the original whitespace runs.
fn recase_words(text: &str, mut case_word: impl FnMut(usize, usize, &str) -> String) -> String {
    let word_count = text.split_whitespace().count();
    let mut out = String::with_capacity(text.len());
    let mut word_idx = 0usize;
    let mut word_start: Option<usize> = None;

    for (pos, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                out.push_str(&case_word(word_idx, word_count, &text[start..pos]));
                word_idx += 1;
            }
            out.push(ch);
        } else if word_start.is_none() {
            word_start = Some(pos);
        }
    }
    if let Some(start) = word_start {
        out.push_str(&case_word(word_idx, word_count, &text[start..]));
    }
    out
}

/// Capitalizes every whitespace-delimited word.
pub fn title_case(input: &str) -> String {
    let protected = Protected::extract(input);
    let cased = recase_words(&protected.text, |_, _, word| capitalize_word(word));
    protected.restore(cased)
}

/// Capitalizes every word except stop words in the interior of the string.
pub fn smart_title_case(input: &str) -> String {
    let protected = Protected::extract(input);
    let cased = recase_words(&protected.text, |idx, count, word| {
        let at_edge = idx == 0 || idx + 1 == count;
        if !at_edge && is_stop_word(word) {
            word.to_lowercase()
        } else {
            capitalize_word(word)
        }
    });
    protected.restore(cased)
}

/// Applies a casing policy to an already trimmed value.
pub fn apply_casing(casing: FieldCasing, value: &str) -> String {
    match casing {
        FieldCasing::Verbatim | FieldCasing::Name => value.to_string(),
        FieldCasing::Lower => value.to_lowercase(),
        FieldCasing::SmartTitle => smart_title_case(value),
        FieldCasing::PlainTitle => title_case(value),
    }
}

/// Formats a field value according to the field's casing policy.
///
/// Name fields are returned trimmed but otherwise untouched; the name parser
/// decides their casing.
pub fn format_field(field: CanonicalField, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    apply_casing(field.casing(), trimmed)
}
