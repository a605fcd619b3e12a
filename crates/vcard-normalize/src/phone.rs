//! Phone number canonicalization.
//!
//! [`normalize_phone`] is total: every input maps to a [`PhoneNormalization`],
//! and shapes the policy does not recognize come back unchanged instead of
//! being guessed at or dropped.

use vcard_model::{PhoneNormalizationPolicy, PhoneRole};

const NULL_LIKE: &[&str] = &["nan", "none", "null"];
const MAX_EXTENSION_DIGITS: usize = 3;
const SHORT_WORK_DIGITS: usize = 4;
const LOCAL_DIGITS: usize = 8;

/// Outcome of normalizing one phone value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneNormalization {
    /// Blank or null-like input.
    Empty,
    /// Input already starts with `+`; kept verbatim.
    International(String),
    /// Three digits or fewer; the bare digits.
    Extension(String),
    /// Eight-digit local number rendered as `XXXX-XXXX`, optionally prefixed
    /// with the policy's country code.
    Local(String),
    /// Unrecognized shape; the original input.
    Unchanged(String),
}

impl PhoneNormalization {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::International(value)
            | Self::Extension(value)
            | Self::Local(value)
            | Self::Unchanged(value) => value,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::International(value)
            | Self::Extension(value)
            | Self::Local(value)
            | Self::Unchanged(value) => value,
        }
    }

    /// True when a rule produced a new rendering of the number.
    pub fn is_formatted(&self) -> bool {
        matches!(self, Self::Extension(_) | Self::Local(_))
    }
}

fn digits_of(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Canonicalizes a raw phone value.
///
/// Rules, first match wins:
/// 1. blank, `nan`, `none`, `null` → [`PhoneNormalization::Empty`]
/// 2. starts with `+` → [`PhoneNormalization::International`] (verbatim)
/// 3. 1–3 digits → [`PhoneNormalization::Extension`]
/// 4. work role, exactly 4 digits, prefix configured → prefix is prepended
/// 5. anything but 8 digits → [`PhoneNormalization::Unchanged`]
/// 6. 8 digits → `XXXX-XXXX`, or `{country} XXXX-XXXX` when configured
pub fn normalize_phone(
    raw: &str,
    role: PhoneRole,
    policy: &PhoneNormalizationPolicy,
) -> PhoneNormalization {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_LIKE.contains(&trimmed.to_lowercase().as_str()) {
        return PhoneNormalization::Empty;
    }
    if trimmed.starts_with('+') {
        return PhoneNormalization::International(raw.to_string());
    }

    let mut digits = digits_of(trimmed);
    if digits.is_empty() {
        return PhoneNormalization::Unchanged(raw.to_string());
    }
    if digits.len() <= MAX_EXTENSION_DIGITS {
        return PhoneNormalization::Extension(digits);
    }

    if role == PhoneRole::Work
        && digits.len() == SHORT_WORK_DIGITS
        && let Some(prefix) = policy.work_phone_prefix.as_deref()
    {
        digits = format!("{}{digits}", digits_of(prefix));
    }

    if digits.len() != LOCAL_DIGITS {
        return PhoneNormalization::Unchanged(raw.to_string());
    }

    let (head, tail) = digits.split_at(LOCAL_DIGITS / 2);
    let local = match policy.default_country_code.as_deref() {
        Some(country) => format!("{country} {head}-{tail}"),
        None => format!("{head}-{tail}"),
    };
    PhoneNormalization::Local(local)
}
