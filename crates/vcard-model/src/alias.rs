//! Header alias table.
//!
//! Maps each [`CanonicalField`] to the header spellings accepted for it in
//! source files (English and Spanish, several casings and separators).
//! Lookups compare folded keys: trimmed, lowercased, and accent-stripped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::field::CanonicalField;

const DEFAULT_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::FirstName,
        &[
            "first_name",
            "firstName",
            "first name",
            "firstname",
            "fname",
            "given name",
            "nombre",
        ],
    ),
    (
        CanonicalField::LastName,
        &[
            "last_name",
            "lastName",
            "last name",
            "lastname",
            "lname",
            "surname",
            "family name",
            "apellidos",
        ],
    ),
    (
        CanonicalField::FullName,
        &["full_name", "fullName", "full name", "nombre completo"],
    ),
    (
        CanonicalField::Email,
        &[
            "email",
            "e-mail",
            "mail",
            "email address",
            "correo",
            "correo electrónico",
            "correo electronico",
        ],
    ),
    (
        CanonicalField::WorkPhone,
        &[
            "work_phone",
            "workPhone",
            "work phone",
            "office phone",
            "business phone",
            "tel",
            "phone",
            "telefono",
            "teléfono",
            "telefono ofi",
            "teléfono ofi",
        ],
    ),
    (
        CanonicalField::WorkPhoneExt,
        &["work_phone_ext", "ext", "extension", "extensión"],
    ),
    (
        CanonicalField::MobilePhone,
        &[
            "mobile_phone",
            "mobilePhone",
            "mobile",
            "cell",
            "cellular",
            "mobile phone",
            "cell phone",
            "celular",
            "móvil",
        ],
    ),
    (
        CanonicalField::AddressStreet,
        &[
            "address_street",
            "address",
            "street",
            "street address",
            "dirección",
            "direccion",
            "calle",
        ],
    ),
    (
        CanonicalField::AddressCity,
        &["address_city", "city", "town", "ciudad"],
    ),
    (
        CanonicalField::AddressState,
        &[
            "address_state",
            "state",
            "province",
            "region",
            "estado",
            "provincia",
        ],
    ),
    (
        CanonicalField::AddressPostal,
        &[
            "address_postal",
            "zip",
            "postal",
            "zip code",
            "postal code",
            "código postal",
            "codigo postal",
        ],
    ),
    (
        CanonicalField::AddressCountry,
        &["address_country", "country", "nation", "país", "pais"],
    ),
    (
        CanonicalField::SocialInstagram,
        &["social_instagram", "instagram", "ig"],
    ),
    (
        CanonicalField::SocialTwitter,
        &["social_twitter", "twitter", "x"],
    ),
    (
        CanonicalField::SocialFacebook,
        &["social_facebook", "facebook", "fb"],
    ),
    (
        CanonicalField::BusinessName,
        &[
            "business_name",
            "organization",
            "company",
            "business",
            "org",
            "empresa",
        ],
    ),
    (
        CanonicalField::BusinessTitle,
        &[
            "business_title",
            "title",
            "job title",
            "position",
            "role",
            "puesto",
            "cargo",
        ],
    ),
    (
        CanonicalField::BusinessDepartment,
        &[
            "business_department",
            "department",
            "dept",
            "departamento",
            "area",
        ],
    ),
    (
        CanonicalField::BusinessUrl,
        &["business_url", "website", "url", "web", "sitio web"],
    ),
    (
        CanonicalField::BusinessHours,
        &["business_hours", "hours", "business hours", "horario"],
    ),
    (
        CanonicalField::BusinessAddressStreet,
        &[
            "business_address_street",
            "business address",
            "business street",
            "dirección trabajo",
        ],
    ),
    (
        CanonicalField::BusinessAddressCity,
        &["business_address_city", "business city", "ciudad trabajo"],
    ),
    (
        CanonicalField::BusinessAddressState,
        &["business_address_state", "business state", "estado trabajo"],
    ),
    (
        CanonicalField::BusinessAddressPostal,
        &["business_address_postal", "business zip", "postal trabajo"],
    ),
    (
        CanonicalField::BusinessAddressCountry,
        &[
            "business_address_country",
            "business country",
            "país trabajo",
        ],
    ),
    (
        CanonicalField::BusinessLinkedin,
        &["business_linkedin", "linkedin", "li"],
    ),
    (
        CanonicalField::BusinessTwitter,
        &["business_twitter", "company twitter"],
    ),
    (
        CanonicalField::PersonalUrl,
        &[
            "personal_url",
            "personal website",
            "personal url",
            "sitio personal",
        ],
    ),
    (
        CanonicalField::PersonalBio,
        &[
            "personal_bio",
            "notes",
            "comments",
            "description",
            "notas",
            "comentarios",
            "bio",
            "biography",
        ],
    ),
    (
        CanonicalField::PersonalBirthday,
        &[
            "personal_birthday",
            "birthday",
            "dob",
            "cumpleaños",
            "fecha nacimiento",
        ],
    ),
];

static DEFAULT_TABLE: LazyLock<AliasTable> = LazyLock::new(AliasTable::build_default);

/// Removes combining accent marks after canonical decomposition.
///
/// `"Teléfono"` becomes `"Telefono"`; characters without a decomposition pass
/// through unchanged.
pub fn strip_accents(value: &str) -> String {
    value.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

/// Folds a header label or alias into its comparison key.
pub fn fold_key(value: &str) -> String {
    strip_accents(&value.trim().to_lowercase())
}

/// Immutable mapping from canonical field to its ordered alias list.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: BTreeMap<CanonicalField, Vec<Alias>>,
}

/// One accepted spelling together with its folded comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub spelling: String,
    pub key: String,
}

impl Alias {
    fn new(spelling: &str) -> Self {
        Self {
            spelling: spelling.to_string(),
            key: fold_key(spelling),
        }
    }
}

impl AliasTable {
    /// Returns the process-wide default table.
    pub fn default_table() -> &'static AliasTable {
        &DEFAULT_TABLE
    }

    fn build_default() -> Self {
        Self::from_entries(DEFAULT_ALIASES.iter().map(|(field, aliases)| {
            (*field, aliases.iter().copied().collect::<Vec<_>>())
        }))
    }

    /// Builds a table from `(field, aliases)` pairs.
    ///
    /// Fields not listed still receive an entry containing their own key, so
    /// every canonical field has exactly one entry.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalField, Vec<&'a str>)>,
    {
        let mut map: BTreeMap<CanonicalField, Vec<Alias>> = BTreeMap::new();
        for (field, aliases) in entries {
            let slot = map.entry(field).or_default();
            slot.extend(aliases.into_iter().map(Alias::new));
        }
        for field in CanonicalField::ALL {
            map.entry(field)
                .or_insert_with(|| vec![Alias::new(field.key())]);
        }
        Self { entries: map }
    }

    /// Aliases for a field, in declared order.
    pub fn aliases(&self, field: CanonicalField) -> &[Alias] {
        self.entries.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates `(field, aliases)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &[Alias])> {
        self.entries
            .iter()
            .map(|(field, aliases)| (*field, aliases.as_slice()))
    }

    /// All folded alias keys across every field.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .flat_map(|aliases| aliases.iter().map(|alias| alias.key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_an_entry() {
        let table = AliasTable::default_table();
        for field in CanonicalField::ALL {
            assert!(
                !table.aliases(field).is_empty(),
                "{field} has no aliases"
            );
        }
        assert_eq!(table.iter().count(), CanonicalField::ALL.len());
    }

    #[test]
    fn fold_key_is_case_and_accent_insensitive() {
        assert_eq!(fold_key("  Teléfono "), "telefono");
        assert_eq!(fold_key("CÓDIGO POSTAL"), "codigo postal");
        assert_eq!(fold_key("Cumpleaños"), "cumpleanos");
    }

    #[test]
    fn aliases_keep_declared_order() {
        let table = AliasTable::default_table();
        let keys: Vec<&str> = table
            .aliases(CanonicalField::WorkPhoneExt)
            .iter()
            .map(|alias| alias.key.as_str())
            .collect();
        assert_eq!(keys, vec!["work_phone_ext", "ext", "extension", "extension"]);
    }

    #[test]
    fn from_entries_fills_missing_fields() {
        let table = AliasTable::from_entries([(CanonicalField::Email, vec!["Correo"])]);
        assert_eq!(table.aliases(CanonicalField::Email)[0].key, "correo");
        assert_eq!(table.aliases(CanonicalField::PersonalBio)[0].key, "personal_bio");
    }

    #[test]
    fn alias_keeps_its_declared_spelling() {
        let table = AliasTable::from_entries([(CanonicalField::Email, vec!["Correo Electrónico"])]);
        let alias = &table.aliases(CanonicalField::Email)[0];
        assert_eq!(alias.spelling, "Correo Electrónico");
        assert_eq!(alias.key, "correo electronico");
        assert_eq!(table.aliases(CanonicalField::PersonalBio)[0].spelling, "personal_bio");

        for (_, aliases) in AliasTable::default_table().iter() {
            for alias in aliases {
                assert_eq!(alias.key, fold_key(&alias.spelling));
            }
        }
    }
}
