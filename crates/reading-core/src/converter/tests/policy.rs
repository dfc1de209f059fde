use super::factory;
use crate::error::ReadingError;
use crate::options::{option_map, OptionMap, OptionValue};
use crate::reading::Reading;
use crate::testutil::strings;

fn numbers() -> OptionMap {
    option_map([("toneMarkType", "numbers")])
}

#[test]
fn test_unmapped_entity_left_unconverted() {
    // "ng" has no GR spelling; it is kept in the caller's Pinyin dialect.
    let out = factory()
        .convert_entities(
            &strings(&["ni3", " ", "ng2"]),
            Reading::Pinyin,
            &numbers(),
            Reading::Gr,
            &OptionMap::new(),
        )
        .unwrap();
    assert_eq!(out, strings(&["nii", " ", "ng2"]));
}

#[test]
fn test_unmapped_entity_between_converted_ones() {
    let out = factory()
        .convert_entities(
            &strings(&["ni3", "ng2", "hao3"]),
            Reading::Pinyin,
            &numbers(),
            Reading::Gr,
            &OptionMap::new(),
        )
        .unwrap();
    assert_eq!(out, strings(&["nii", "ng2", "hao"]));
}

#[test]
fn test_strict_conversion_rejects_unmapped_entity() {
    let conv = factory()
        .converter(
            Reading::Pinyin,
            &numbers(),
            Reading::Gr,
            &OptionMap::new(),
            &option_map([("strictConversion", true)]),
        )
        .unwrap();
    let err = conv.convert_entities(&strings(&["ni3", " ", "ng2"])).unwrap_err();
    assert!(matches!(err, ReadingError::Conversion(_)), "{err}");
}

#[test]
fn test_strict_conversion_is_recorded() {
    let conv = factory()
        .converter(Reading::Pinyin, &numbers(), Reading::Gr, &OptionMap::new(), &OptionMap::new())
        .unwrap();
    assert_eq!(conv.options()["strictConversion"], false.into());
    assert_eq!(conv.options()["tieBreak"], "none".into());
}

#[test]
fn test_ambiguous_mapping_needs_tie_break() {
    let entities = strings(&["o4"]);
    let err = factory()
        .convert_entities(&entities, Reading::WadeGiles, &numbers(), Reading::Pinyin, &OptionMap::new())
        .unwrap_err();
    assert!(matches!(&err, ReadingError::AmbiguousConversion(msg) if msg.contains("e, o")), "{err}");

    let conv = factory()
        .converter(
            Reading::WadeGiles,
            &numbers(),
            Reading::Pinyin,
            &OptionMap::new(),
            &option_map([("tieBreak", "first")]),
        )
        .unwrap();
    assert_eq!(conv.convert_entities(&entities).unwrap(), strings(&["è"]));
}

#[test]
fn test_braille_tie_break_first() {
    let conv = factory()
        .converter(
            Reading::MandarinBraille,
            &OptionMap::new(),
            Reading::Pinyin,
            &OptionMap::new(),
            &option_map([("tieBreak", "first")]),
        )
        .unwrap();
    assert_eq!(conv.convert("⠍⠢").unwrap(), "me");
}

#[test]
fn test_unknown_tie_break_rejected() {
    let err = factory()
        .converter(
            Reading::WadeGiles,
            &OptionMap::new(),
            Reading::Pinyin,
            &OptionMap::new(),
            &option_map([("tieBreak", OptionValue::from("last"))]),
        )
        .err()
        .unwrap();
    assert!(matches!(err, ReadingError::UnsupportedOption { .. }), "{err}");
}
