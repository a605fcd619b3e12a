//! Row and record types flowing through the pipeline.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::field::CanonicalField;

/// One input row: ordered column labels with their raw cell values.
///
/// `None` is the null sentinel (missing cell, JSON `null`, empty spreadsheet
/// cell); `Some("")` is an explicitly empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: Option<String>) {
        self.cells.push((label.into(), value));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates `(label, value)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_deref()))
    }

    /// First cell whose label equals `label` exactly.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(candidate, _)| candidate == label)
            .and_then(|(_, value)| value.as_deref())
    }

    /// True when no cell carries a non-blank value.
    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

impl<L: Into<String>> FromIterator<(L, Option<String>)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (L, Option<String>)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        }
    }
}

/// Per-row mapping result. A missing key means the field is absent, which is
/// distinct from a present empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedFields {
    values: BTreeMap<CanonicalField, String>,
}

impl MappedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn remove(&mut self, field: CanonicalField) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn is_present(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field)
    }

    /// True when the field is present with non-blank content.
    pub fn is_populated(&self, field: CanonicalField) -> bool {
        self.get(field).is_some_and(|value| !value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }
}

/// The canonical contact record committed to both stores.
///
/// Every present value is non-empty; blank values are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    values: BTreeMap<CanonicalField, String>,
}

impl NormalizedRecord {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Number of present fields.
    pub fn populated(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every canonical field in schema order with its value, if any.
    pub fn fields(&self) -> impl Iterator<Item = (CanonicalField, Option<&str>)> {
        CanonicalField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
    }
}

impl From<MappedFields> for NormalizedRecord {
    fn from(mapped: MappedFields) -> Self {
        let values = mapped
            .values
            .into_iter()
            .filter_map(|(field, value)| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some((field, trimmed.to_string()))
                }
            })
            .collect();
        Self { values }
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CanonicalField::ALL.len()))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field.key(), &value)?;
        }
        map.end()
    }
}
