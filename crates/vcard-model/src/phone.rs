//! Phone normalization inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which contact slot a phone number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRole {
    Work,
    Mobile,
    Other,
}

impl fmt::Display for PhoneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Work => "work",
            Self::Mobile => "mobile",
            Self::Other => "other",
        })
    }
}

/// Per-batch phone formatting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNormalizationPolicy {
    /// Digits prepended to 4-digit work numbers (e.g. a switchboard prefix).
    pub work_phone_prefix: Option<String>,
    /// Country code rendered in front of local 8-digit numbers, e.g. `+(506)`.
    pub default_country_code: Option<String>,
}

impl PhoneNormalizationPolicy {
    pub fn new(work_phone_prefix: Option<String>, default_country_code: Option<String>) -> Self {
        Self {
            work_phone_prefix: non_blank(work_phone_prefix),
            default_country_code: non_blank(default_country_code),
        }
    }

    #[must_use]
    pub fn with_work_phone_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.work_phone_prefix = non_blank(Some(prefix.into()));
        self
    }

    #[must_use]
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = non_blank(Some(code.into()));
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_policy_values_are_unset() {
        let policy = PhoneNormalizationPolicy::new(Some("  ".into()), Some(" +(506) ".into()));
        assert_eq!(policy.work_phone_prefix, None);
        assert_eq!(policy.default_country_code.as_deref(), Some("+(506)"));
    }
}
