use proptest::prelude::*;

use vcard_map::FieldMapper;
use vcard_model::{AliasTable, CanonicalField, PhoneNormalizationPolicy, RawRow};

fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(label, value)| (label.to_string(), Some(value.to_string())))
        .collect()
}

fn costa_rica_mapper() -> FieldMapper<'static> {
    FieldMapper::new(
        AliasTable::default_table(),
        PhoneNormalizationPolicy::default().with_country_code("+(506)"),
    )
    .expect("valid policy")
}

#[test]
fn spanish_row_end_to_end() {
    let record = costa_rica_mapper().normalize(&row(&[
        ("Nombre", "ana maria jimenez solis"),
        ("Teléfono", "22221234"),
    ]));

    assert_eq!(record.get(CanonicalField::FirstName), Some("Ana Maria"));
    assert_eq!(record.get(CanonicalField::LastName), Some("Jimenez Solis"));
    assert_eq!(record.get(CanonicalField::FullName), Some("Ana Maria Jimenez Solis"));
    assert_eq!(record.get(CanonicalField::WorkPhone), Some("+(506) 2222-1234"));
    assert_eq!(record.populated(), 4);
}

#[test]
fn formats_by_field_policy() {
    let record = costa_rica_mapper().normalize(&row(&[
        ("Empresa", "ACME de Costa Rica"),
        ("Puesto", "gerente DE ventas (LATAM)"),
        ("E-Mail", "Ana.Lopez@Example.COM"),
        ("Ciudad", "SAN JOSE DE LA MONTAÑA"),
        ("Celular", "+1-555-0100"),
    ]));

    assert_eq!(record.get(CanonicalField::BusinessName), Some("ACME de Costa Rica"));
    assert_eq!(
        record.get(CanonicalField::BusinessTitle),
        Some("Gerente de Ventas (LATAM)")
    );
    assert_eq!(record.get(CanonicalField::Email), Some("ana.lopez@example.com"));
    assert_eq!(
        record.get(CanonicalField::AddressCity),
        Some("San Jose de la Montaña")
    );
    assert_eq!(record.get(CanonicalField::MobilePhone), Some("+1-555-0100"));
}

#[test]
fn work_prefix_completes_extension_style_numbers() {
    let mapper = FieldMapper::new(
        AliasTable::default_table(),
        PhoneNormalizationPolicy::default().with_work_phone_prefix("2222"),
    )
    .expect("valid policy");
    let record = mapper.normalize(&row(&[("Tel", "1234"), ("Móvil", "1234")]));
    assert_eq!(record.get(CanonicalField::WorkPhone), Some("2222-1234"));
    assert_eq!(record.get(CanonicalField::MobilePhone), Some("1234"));
}

#[test]
fn unknown_columns_are_ignored() {
    let record = costa_rica_mapper().normalize(&row(&[("Color favorito", "azul")]));
    assert!(record.is_empty());
}

fn flip_case(label: &str, mask: &[bool]) -> String {
    label
        .chars()
        .zip(mask.iter().cycle())
        .map(|(ch, upper)| {
            if *upper {
                ch.to_uppercase().to_string()
            } else {
                ch.to_lowercase().to_string()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn header_casing_does_not_change_mapping(
        first_mask in proptest::collection::vec(any::<bool>(), 1..8),
        second_mask in proptest::collection::vec(any::<bool>(), 1..8),
        first in "[0-9]{8}",
        second in "[0-9]{8}",
    ) {
        let mapper = costa_rica_mapper();
        let plain = mapper.normalize(&row(&[("Phone", first.as_str()), ("phone", second.as_str())]));
        let cased = mapper.normalize(&row(&[
            (flip_case("phone", &first_mask).as_str(), first.as_str()),
            (flip_case("PHONE", &second_mask).as_str(), second.as_str()),
        ]));
        prop_assert_eq!(plain, cased);
    }

    #[test]
    fn accents_in_headers_do_not_matter(value in "[a-z]{3,10}") {
        let mapper = costa_rica_mapper();
        let accented = mapper.normalize(&row(&[("Cumpleaños", value.as_str())]));
        let plain = mapper.normalize(&row(&[("CUMPLEANOS", value.as_str())]));
        prop_assert_eq!(accented, plain);
    }
}
