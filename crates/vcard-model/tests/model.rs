#![allow(missing_docs)]

use vcard_model::{
    AliasTable, CanonicalField, FieldCasing, MappedFields, NormalizedRecord, RecordId,
};

#[test]
fn test_record_ids_are_unique() {
    assert_ne!(RecordId::new_v4(), RecordId::new_v4());
}

#[test]
fn test_narrow_projection_fields() {
    assert_eq!(
        CanonicalField::NARROW,
        [
            CanonicalField::FullName,
            CanonicalField::WorkPhone,
            CanonicalField::MobilePhone,
            CanonicalField::Email,
            CanonicalField::BusinessName,
        ]
    );
    assert_eq!(CanonicalField::BusinessName.casing(), FieldCasing::Verbatim);
    assert_eq!(CanonicalField::BusinessTwitter.casing(), FieldCasing::Lower);
}

#[test]
fn test_alias_lookup_folds_accents() {
    let table = AliasTable::default_table();
    let phone_keys: Vec<&str> = table
        .aliases(CanonicalField::WorkPhone)
        .iter()
        .map(|alias| alias.key.as_str())
        .collect();
    assert!(phone_keys.contains(&"telefono"));
    assert!(table.keywords().any(|key| key == "nombre"));
}

#[test]
fn test_record_json_has_snake_case_keys() {
    let mut mapped = MappedFields::new();
    mapped.set(CanonicalField::BusinessAddressCity, "San José");
    mapped.set(CanonicalField::Email, "");
    let record = NormalizedRecord::from(mapped);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["business_address_city"], "San José");
    assert!(json["email"].is_null());
}
