//! Parsed person-name components.

use serde::{Deserialize, Serialize};

/// Result of splitting a free-text name.
///
/// Fields are never null; an empty string means the component could not be
/// determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    pub first: String,
    pub last: String,
    pub title: String,
    pub suffix: String,
    pub full: String,
}

impl ParsedName {
    /// True when neither given name nor surname was determined.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }
}
