//! Field normalization for contact records.
//!
//! - [`casing`]: plain and smart title case with protected parenthesized spans
//! - [`phone`]: rule-ordered phone canonicalization
//! - [`name`]: tiered name splitting (Spanish order, normal order, Western)

#![deny(unsafe_code)]

pub mod casing;
pub mod name;
pub mod phone;

pub use casing::{apply_casing, format_field, smart_title_case, title_case};
pub use name::western::WesternName;
pub use name::{NameOrder, detect_order, parse_name};
pub use phone::{PhoneNormalization, normalize_phone};
