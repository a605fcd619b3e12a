//! Property tests for the normalizers.

use proptest::prelude::*;

use vcard_model::{PhoneNormalizationPolicy, PhoneRole};
use vcard_normalize::{PhoneNormalization, normalize_phone, parse_name, smart_title_case, title_case};

fn role() -> impl Strategy<Value = PhoneRole> {
    prop_oneof![
        Just(PhoneRole::Work),
        Just(PhoneRole::Mobile),
        Just(PhoneRole::Other)
    ]
}

fn policy() -> impl Strategy<Value = PhoneNormalizationPolicy> {
    (
        proptest::option::of("[0-9]{1,4}"),
        proptest::option::of(r"\+\([0-9]{1,3}\)"),
    )
        .prop_map(|(prefix, country)| PhoneNormalizationPolicy::new(prefix, country))
}

proptest! {
    #[test]
    fn phone_normalization_is_total(raw in ".{0,40}", role in role(), policy in policy()) {
        let _ = normalize_phone(&raw, role, &policy);
    }

    #[test]
    fn plus_prefixed_numbers_are_never_rewritten(
        rest in "[0-9 ()-]{0,20}",
        role in role(),
        policy in policy(),
    ) {
        let raw = format!("+{rest}");
        prop_assert_eq!(
            normalize_phone(&raw, role, &policy),
            PhoneNormalization::International(raw.clone())
        );
    }

    #[test]
    fn up_to_three_digits_are_extensions(digits in "[0-9]{1,3}", role in role(), policy in policy()) {
        let normalized = normalize_phone(&digits, role, &policy);
        prop_assert_eq!(normalized.as_str(), digits.as_str());
    }

    #[test]
    fn parenthesized_text_survives_casing(inner in "[A-Za-z ]{1,12}", word in "[a-z]{1,8}") {
        prop_assume!(!inner.trim().is_empty());
        let input = format!("{word} ({inner})");
        let span = format!("({inner})");
        prop_assert!(title_case(&input).contains(&span));
        prop_assert!(smart_title_case(&input).contains(&span));
    }

    #[test]
    fn name_parsing_never_panics(raw in "[A-Za-zÁÉÍÓÚáéíóúñÑ ,.]{0,40}") {
        let parsed = parse_name(&raw);
        if raw.trim().is_empty() {
            prop_assert!(parsed.is_empty());
            prop_assert!(parsed.full.is_empty());
        } else {
            prop_assert!(!parsed.full.is_empty());
        }
    }
}
