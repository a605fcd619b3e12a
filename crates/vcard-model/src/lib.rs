//! Contact data model.
//!
//! Shared types for the contact-list normalization pipeline: the canonical
//! field schema, the header alias table, per-row and per-record containers,
//! parsed names, phone policy, identifiers, and the batch lifecycle.

#![deny(unsafe_code)]

pub mod alias;
pub mod batch;
pub mod error;
pub mod field;
pub mod ids;
pub mod name;
pub mod phone;
pub mod record;

pub use alias::{Alias, AliasTable, fold_key, strip_accents};
pub use batch::{BatchReport, BatchState, BatchStatus};
pub use error::{ModelError, Result};
pub use field::{CanonicalField, FieldCasing};
pub use ids::{BatchId, IdempotencyKey, RecordId};
pub use name::ParsedName;
pub use phone::{PhoneNormalizationPolicy, PhoneRole};
pub use record::{MappedFields, NormalizedRecord, RawRow};
