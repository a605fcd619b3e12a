//! Canonical output schema.
//!
//! Every contact record is expressed in terms of the fixed [`CanonicalField`]
//! set. Each field also carries the casing policy the text caser applies to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How a field's value is cased before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCasing {
    /// Value is kept exactly as supplied.
    Verbatim,
    /// Value is lowercased (emails, URLs, handles).
    Lower,
    /// Title case that keeps articles and prepositions lowercase.
    SmartTitle,
    /// Every word capitalized.
    PlainTitle,
    /// Person-name field; casing is decided by the name parser.
    Name,
}

/// One key of the canonical contact schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    FullName,
    FirstName,
    LastName,
    WorkPhone,
    WorkPhoneExt,
    MobilePhone,
    Email,
    AddressStreet,
    AddressCity,
    AddressState,
    AddressPostal,
    AddressCountry,
    SocialInstagram,
    SocialTwitter,
    SocialFacebook,
    BusinessName,
    BusinessTitle,
    BusinessDepartment,
    BusinessUrl,
    BusinessHours,
    BusinessAddressStreet,
    BusinessAddressCity,
    BusinessAddressState,
    BusinessAddressPostal,
    BusinessAddressCountry,
    BusinessLinkedin,
    BusinessTwitter,
    PersonalUrl,
    PersonalBio,
    PersonalBirthday,
}

impl CanonicalField {
    /// All fields in schema order.
    pub const ALL: [CanonicalField; 30] = [
        Self::FullName,
        Self::FirstName,
        Self::LastName,
        Self::WorkPhone,
        Self::WorkPhoneExt,
        Self::MobilePhone,
        Self::Email,
        Self::AddressStreet,
        Self::AddressCity,
        Self::AddressState,
        Self::AddressPostal,
        Self::AddressCountry,
        Self::SocialInstagram,
        Self::SocialTwitter,
        Self::SocialFacebook,
        Self::BusinessName,
        Self::BusinessTitle,
        Self::BusinessDepartment,
        Self::BusinessUrl,
        Self::BusinessHours,
        Self::BusinessAddressStreet,
        Self::BusinessAddressCity,
        Self::BusinessAddressState,
        Self::BusinessAddressPostal,
        Self::BusinessAddressCountry,
        Self::BusinessLinkedin,
        Self::BusinessTwitter,
        Self::PersonalUrl,
        Self::PersonalBio,
        Self::PersonalBirthday,
    ];

    /// Fields copied into the narrow lookup projection.
    pub const NARROW: [CanonicalField; 5] = [
        Self::FullName,
        Self::WorkPhone,
        Self::MobilePhone,
        Self::Email,
        Self::BusinessName,
    ];

    /// Snake-case key used in storage and serialized output.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::WorkPhone => "work_phone",
            Self::WorkPhoneExt => "work_phone_ext",
            Self::MobilePhone => "mobile_phone",
            Self::Email => "email",
            Self::AddressStreet => "address_street",
            Self::AddressCity => "address_city",
            Self::AddressState => "address_state",
            Self::AddressPostal => "address_postal",
            Self::AddressCountry => "address_country",
            Self::SocialInstagram => "social_instagram",
            Self::SocialTwitter => "social_twitter",
            Self::SocialFacebook => "social_facebook",
            Self::BusinessName => "business_name",
            Self::BusinessTitle => "business_title",
            Self::BusinessDepartment => "business_department",
            Self::BusinessUrl => "business_url",
            Self::BusinessHours => "business_hours",
            Self::BusinessAddressStreet => "business_address_street",
            Self::BusinessAddressCity => "business_address_city",
            Self::BusinessAddressState => "business_address_state",
            Self::BusinessAddressPostal => "business_address_postal",
            Self::BusinessAddressCountry => "business_address_country",
            Self::BusinessLinkedin => "business_linkedin",
            Self::BusinessTwitter => "business_twitter",
            Self::PersonalUrl => "personal_url",
            Self::PersonalBio => "personal_bio",
            Self::PersonalBirthday => "personal_birthday",
        }
    }

    /// Casing policy applied by the field mapper.
    #[must_use]
    pub fn casing(self) -> FieldCasing {
        match self {
            Self::FullName | Self::FirstName | Self::LastName => FieldCasing::Name,
            Self::BusinessName => FieldCasing::Verbatim,
            Self::Email
            | Self::BusinessUrl
            | Self::PersonalUrl
            | Self::BusinessLinkedin
            | Self::BusinessTwitter
            | Self::SocialInstagram
            | Self::SocialTwitter
            | Self::SocialFacebook => FieldCasing::Lower,
            Self::AddressStreet
            | Self::AddressCity
            | Self::AddressState
            | Self::AddressCountry
            | Self::BusinessAddressStreet
            | Self::BusinessAddressCity
            | Self::BusinessAddressState
            | Self::BusinessAddressCountry
            | Self::BusinessTitle
            | Self::BusinessDepartment => FieldCasing::SmartTitle,
            Self::WorkPhone
            | Self::WorkPhoneExt
            | Self::MobilePhone
            | Self::AddressPostal
            | Self::BusinessAddressPostal
            | Self::BusinessHours
            | Self::PersonalBio
            | Self::PersonalBirthday => FieldCasing::PlainTitle,
        }
    }

    /// True for the three person-name fields.
    #[must_use]
    pub fn is_name(self) -> bool {
        self.casing() == FieldCasing::Name
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
