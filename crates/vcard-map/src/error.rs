//! Error types for field mapping.

use thiserror::Error;

/// Errors raised while configuring a [`crate::FieldMapper`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The work phone prefix has no digits to prepend.
    #[error("work phone prefix '{0}' contains no digits")]
    InvalidWorkPhonePrefix(String),

    /// The country code has no digits.
    #[error("country code '{0}' contains no digits")]
    InvalidCountryCode(String),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;
