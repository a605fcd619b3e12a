//! Row-to-record mapping.

use std::collections::HashSet;

use tracing::{debug, trace};

use vcard_model::{
    AliasTable, CanonicalField, MappedFields, NormalizedRecord, PhoneNormalizationPolicy,
    PhoneRole, RawRow, fold_key,
};
use vcard_normalize::{PhoneNormalization, format_field, normalize_phone, parse_name, title_case};

use crate::error::{MapError, Result};

/// Cell values treated as missing after trimming and float cleanup.
const EMPTY_MARKERS: &[&str] = &["", "0"];

/// Column label and cell value, with the label folded for alias lookup.
struct Column<'r> {
    key: String,
    value: Option<&'r str>,
}

/// Strips the `.0` spreadsheets append to integral numbers.
fn clean_value(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed)
}

/// Maps [`RawRow`]s onto the canonical schema.
#[derive(Debug, Clone)]
pub struct FieldMapper<'a> {
    aliases: &'a AliasTable,
    policy: PhoneNormalizationPolicy,
    known_keys: HashSet<&'a str>,
}

impl<'a> FieldMapper<'a> {
    /// Creates a mapper, rejecting phone policies that could never apply.
    pub fn new(aliases: &'a AliasTable, policy: PhoneNormalizationPolicy) -> Result<Self> {
        if let Some(prefix) = policy.work_phone_prefix.as_deref()
            && !prefix.chars().any(|ch| ch.is_ascii_digit())
        {
            return Err(MapError::InvalidWorkPhonePrefix(prefix.to_string()));
        }
        if let Some(code) = policy.default_country_code.as_deref()
            && !code.chars().any(|ch| ch.is_ascii_digit())
        {
            return Err(MapError::InvalidCountryCode(code.to_string()));
        }
        Ok(Self {
            aliases,
            policy,
            known_keys: aliases.keywords().collect(),
        })
    }

    pub fn policy(&self) -> &PhoneNormalizationPolicy {
        &self.policy
    }

    /// Resolves one field: aliases in declared order, columns in row order.
    ///
    /// A matched cell that is null, blank, or `"0"` does not count; the
    /// search continues with the next alias.
    fn resolve<'r>(&self, field: CanonicalField, columns: &[Column<'r>]) -> Option<&'r str> {
        self.aliases.aliases(field).iter().find_map(|alias| {
            let column = columns.iter().find(|column| column.key == alias.key)?;
            let value = clean_value(column.value?);
            if EMPTY_MARKERS.contains(&value) {
                return None;
            }
            trace!(%field, alias = %alias.spelling, "alias matched");
            Some(value)
        })
    }

    /// Maps a row onto the canonical fields.
    ///
    /// Name fields are title-cased, and split with the name parser when only
    /// a multi-word first name or only a full name was supplied. Phones are
    /// canonicalized with the mapper's policy. Other fields follow their
    /// casing policy.
    pub fn map_row(&self, row: &RawRow) -> MappedFields {
        let columns: Vec<Column<'_>> = row
            .iter()
            .map(|(label, value)| Column {
                key: fold_key(label),
                value,
            })
            .collect();

        let mut mapped = MappedFields::new();
        for field in CanonicalField::ALL {
            let Some(value) = self.resolve(field, &columns) else {
                continue;
            };
            if field.is_name() {
                mapped.set(field, value);
            } else {
                mapped.set(field, format_field(field, value));
            }
        }

        let names_parsed = split_names(&mut mapped);
        self.normalize_phones(&mut mapped);
        finish_names(&mut mapped, names_parsed);

        let unmapped: Vec<&str> = row
            .iter()
            .zip(&columns)
            .filter(|((_, value), column)| {
                value.is_some() && !self.known_keys.contains(column.key.as_str())
            })
            .map(|((label, _), _)| label)
            .collect();
        if !unmapped.is_empty() {
            debug!(columns = ?unmapped, "unmapped columns");
        }
        mapped
    }

    /// Maps a row and drops empty values.
    pub fn normalize(&self, row: &RawRow) -> NormalizedRecord {
        NormalizedRecord::from(self.map_row(row))
    }

    fn normalize_phones(&self, mapped: &mut MappedFields) {
        for (field, role) in [
            (CanonicalField::WorkPhone, PhoneRole::Work),
            (CanonicalField::MobilePhone, PhoneRole::Mobile),
        ] {
            let Some(raw) = mapped.get(field) else {
                continue;
            };
            let normalized = normalize_phone(raw, role, &self.policy);
            trace!(%field, formatted = normalized.is_formatted(), "normalized phone");
            match normalized {
                PhoneNormalization::Empty => {
                    mapped.remove(field);
                }
                other => mapped.set(field, other.into_string()),
            }
        }
    }
}

/// Runs the name parser when the row carries a single free-text name.
///
/// Returns true when the name fields were replaced by parser output.
fn split_names(mapped: &mut MappedFields) -> bool {
    let source = if !mapped.is_populated(CanonicalField::LastName)
        && let Some(first) = mapped.get(CanonicalField::FirstName)
        && first.contains(char::is_whitespace)
    {
        first.to_string()
    } else if !mapped.is_present(CanonicalField::FirstName)
        && !mapped.is_present(CanonicalField::LastName)
        && let Some(full) = mapped.get(CanonicalField::FullName)
    {
        full.to_string()
    } else {
        return false;
    };

    let parsed = parse_name(&source);
    mapped.set(CanonicalField::FirstName, parsed.first);
    mapped.set(CanonicalField::LastName, parsed.last);
    mapped.set(CanonicalField::FullName, parsed.full);
    true
}

/// Title-cases name fields the parser did not touch and derives a missing
/// full name from the parts.
fn finish_names(mapped: &mut MappedFields, names_parsed: bool) {
    if !names_parsed {
        for field in [
            CanonicalField::FirstName,
            CanonicalField::LastName,
            CanonicalField::FullName,
        ] {
            if let Some(value) = mapped.get(field) {
                let cased = title_case(value);
                mapped.set(field, cased);
            }
        }
    }
    if !mapped.is_populated(CanonicalField::FullName) {
        let first = mapped.get(CanonicalField::FirstName).unwrap_or_default();
        let last = mapped.get(CanonicalField::LastName).unwrap_or_default();
        let full = format!("{first} {last}").trim().to_string();
        if !full.is_empty() {
            mapped.set(CanonicalField::FullName, full);
        }
    }
}
