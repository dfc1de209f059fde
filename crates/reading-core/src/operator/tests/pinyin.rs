use crate::entity::{EntityKind, Tone};
use crate::error::ReadingError;
use crate::operator::ReadingOperator;
use crate::options::{option_map, OptionValue};
use crate::reading::Reading;
use crate::testutil::{default_operator, operator, strings};

#[test]
fn test_decompose_with_apostrophe() {
    let op = default_operator(Reading::Pinyin);
    let d = op.decompose("tiān'ānmén").unwrap();
    assert_eq!(d.texts(), vec!["tiān", "'", "ān", "mén"]);
    assert_eq!(d.entities[1].kind, EntityKind::Formatting);
    assert!(d.strict);
}

#[test]
fn test_decompose_prefers_unmergeable_segmentation() {
    let op = default_operator(Reading::Pinyin);
    let d = op.decompose("xian").unwrap();
    assert_eq!(d.texts(), vec!["xian"]);
}

#[test]
fn test_decompose_keeps_foreign_material() {
    let op = default_operator(Reading::Pinyin);
    let d = op.decompose("hàn, zì").unwrap();
    assert_eq!(d.texts(), vec!["hàn", ", ", "zì"]);
    assert_eq!(d.entities[1].kind, EntityKind::Other);
}

#[test]
fn test_compose_inserts_apostrophe() {
    let op = default_operator(Reading::Pinyin);
    assert_eq!(op.compose(&strings(&["xī", "ān"])).unwrap(), "xī'ān");
    assert_eq!(op.compose(&strings(&["hàn", "zì"])).unwrap(), "hànzì");
}

#[test]
fn test_numbers_round_trip() {
    let op = operator(Reading::Pinyin, &option_map([("toneMarkType", "numbers")]));
    let d = op.decompose("han4zi4").unwrap();
    assert_eq!(d.texts(), vec!["han4", "zi4"]);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.split_entity_tone("han4").unwrap(), ("han".to_string(), Some(Tone::Number(4))));
    assert_eq!(tonal.tonal_entity("zi", Some(Tone::Number(4))).unwrap(), "zi4");
}

#[test]
fn test_diacritic_placement() {
    let op = default_operator(Reading::Pinyin);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("han", Some(Tone::Number(4))).unwrap(), "hàn");
    assert_eq!(tonal.tonal_entity("lao", Some(Tone::Number(3))).unwrap(), "lǎo");
    assert_eq!(tonal.tonal_entity("gui", Some(Tone::Number(4))).unwrap(), "guì");
    assert_eq!(tonal.split_entity_tone("lǎo").unwrap(), ("lao".to_string(), Some(Tone::Number(3))));
}

#[test]
fn test_case_option() {
    let both = default_operator(Reading::Pinyin);
    assert!(both.is_reading_entity("Hàn"));
    let lower = operator(Reading::Pinyin, &option_map([("case", "lower")]));
    assert!(!lower.is_reading_entity("Hàn"));
    assert!(lower.is_reading_entity("hàn"));
}

#[test]
fn test_unknown_option_rejected() {
    let ctx = crate::testutil::ctx();
    let err = crate::operator::Operator::build(
        Reading::Pinyin,
        &option_map([("toneMarkType", OptionValue::from("bogus"))]),
        &ctx,
    )
    .err()
    .unwrap();
    assert!(matches!(err, ReadingError::UnsupportedOption { .. }));
}

#[test]
fn test_invalid_tone() {
    let op = default_operator(Reading::Pinyin);
    let err = op.as_tonal().unwrap().tonal_entity("han", Some(Tone::Number(7))).unwrap_err();
    assert!(matches!(err, ReadingError::InvalidEntity(_)));
}
