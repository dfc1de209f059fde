use super::{convert, factory};
use crate::error::ReadingError;
use crate::options::{option_map, OptionMap, OptionValue};
use crate::reading::Reading;

#[test]
fn test_decompose_apostrophe_separated() {
    let d = factory()
        .decompose("tiān'ānmén", Reading::Pinyin, &OptionMap::new())
        .unwrap();
    assert_eq!(d.texts(), vec!["tiān", "'", "ān", "mén"]);
}

#[test]
fn test_pinyin_numbers_to_diacritics() {
    let out = convert(
        "han4zi4",
        Reading::Pinyin,
        &option_map([("toneMarkType", "numbers")]),
        Reading::Pinyin,
        &OptionMap::new(),
    )
    .unwrap();
    assert_eq!(out, "hànzì");
}

#[test]
fn test_jyutping_to_yale() {
    let out = convert(
        "gwong2jau1waa2",
        Reading::Jyutping,
        &OptionMap::new(),
        Reading::CantoneseYale,
        &OptionMap::new(),
    )
    .unwrap();
    assert_eq!(out, "gwóngyāuwá");
}

#[test]
fn test_braille_shared_final_is_ambiguous() {
    let err = convert(
        "⠍⠢",
        Reading::MandarinBraille,
        &OptionMap::new(),
        Reading::Pinyin,
        &OptionMap::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ReadingError::AmbiguousConversion(_)), "{err}");
}

#[test]
fn test_unsegmentable_pinyin_to_gr() {
    let strict = option_map([
        ("toneMarkType", OptionValue::from("numbers")),
        ("strictSegmentation", OptionValue::from(true)),
    ]);
    let err = convert("xiao3to1", Reading::Pinyin, &strict, Reading::Gr, &OptionMap::new())
        .unwrap_err();
    assert!(matches!(err, ReadingError::Decomposition(_)), "{err}");

    let lenient = option_map([("toneMarkType", "numbers")]);
    let entities = factory()
        .decompose("xiao3to1", Reading::Pinyin, &lenient)
        .unwrap()
        .into_texts();
    let converted = factory()
        .convert_entities(&entities, Reading::Pinyin, &lenient, Reading::Gr, &OptionMap::new())
        .unwrap();
    assert_eq!(converted, vec!["sheau", "to1"]);
    let err = convert("xiao3to1", Reading::Pinyin, &lenient, Reading::Gr, &OptionMap::new())
        .unwrap_err();
    assert!(matches!(err, ReadingError::Composition(_)), "{err}");
}

#[test]
fn test_bridge_matches_two_steps() {
    let text = "beeijing";
    let direct = convert(text, Reading::Gr, &OptionMap::new(), Reading::MandarinIpa, &OptionMap::new())
        .unwrap();
    let pinyin = convert(text, Reading::Gr, &OptionMap::new(), Reading::Pinyin, &OptionMap::new())
        .unwrap();
    let two_steps = convert(
        &pinyin,
        Reading::Pinyin,
        &OptionMap::new(),
        Reading::MandarinIpa,
        &OptionMap::new(),
    )
    .unwrap();
    assert_eq!(direct, two_steps);
    assert!(!direct.is_empty());
}

#[test]
fn test_missing_path_unsupported() {
    let err = convert("ᄒ", Reading::Hangul, &OptionMap::new(), Reading::Gr, &OptionMap::new())
        .unwrap_err();
    assert!(matches!(err, ReadingError::Unsupported(_)));
}
