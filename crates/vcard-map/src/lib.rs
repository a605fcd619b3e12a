//! Field mapping for contact rows.
//!
//! [`FieldMapper`] resolves each [`vcard_model::RawRow`] against the alias
//! table, formats every value by its field's casing policy, canonicalizes
//! phones, and splits free-text names.

#![deny(unsafe_code)]

mod error;
mod mapper;

pub use error::{MapError, Result};
pub use mapper::FieldMapper;
