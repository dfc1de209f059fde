use std::sync::Arc;

use super::{convert, factory};
use crate::converter::{
    Endpoints, FinalECoarticulation, PinyinIpaConverter, ReadingConverter,
};
use crate::error::ReadingError;
use crate::options::{option_map, OptionMap};
use crate::reading::Reading;
use crate::testutil::strings;

fn numbers() -> OptionMap {
    option_map([("toneMarkType", "numbers")])
}

#[test]
fn test_pinyin_to_ipa() {
    let out = convert("lao3shi1", Reading::Pinyin, &numbers(), Reading::MandarinIpa, &OptionMap::new())
        .unwrap();
    assert_eq!(out, "lau˨˩.ʂʅ˥˥");
}

#[test]
fn test_pinyin_to_ipa_without_sandhi() {
    let conv = factory()
        .converter(
            Reading::Pinyin,
            &numbers(),
            Reading::MandarinIpa,
            &OptionMap::new(),
            &option_map([("sandhiRule", "none")]),
        )
        .unwrap();
    assert_eq!(conv.convert("lao3shi1").unwrap(), "lau˨˩˦.ʂʅ˥˥");
}

#[test]
fn test_injected_coarticulation_rule() {
    let ends = Endpoints::new(
        factory().operator(Reading::Pinyin, &numbers()).unwrap(),
        factory().operator(Reading::MandarinIpa, &OptionMap::new()).unwrap(),
    );
    let plain = PinyinIpaConverter::new(ends.clone(), &OptionMap::new(), factory()).unwrap();
    assert_eq!(plain.convert("de5").unwrap(), "tɤ");
    let reduced = PinyinIpaConverter::new(ends, &OptionMap::new(), factory())
        .unwrap()
        .with_coarticulation_rule(Some(Arc::new(FinalECoarticulation)));
    assert_eq!(reduced.convert("de5").unwrap(), "tə");
}

#[test]
fn test_pinyin_to_braille() {
    let out = convert("lao3shi1", Reading::Pinyin, &numbers(), Reading::MandarinBraille, &OptionMap::new())
        .unwrap();
    assert_eq!(out, "⠇⠖⠄⠱⠁");
}

#[test]
fn test_braille_to_pinyin() {
    let out = convert("⠇⠖⠄⠱⠁", Reading::MandarinBraille, &OptionMap::new(), Reading::Pinyin, &numbers())
        .unwrap();
    assert_eq!(out, "lao3shi1");
}

#[test]
fn test_braille_punctuation_prefers_ascii() {
    let out = convert("⠇⠖⠄⠐", Reading::MandarinBraille, &OptionMap::new(), Reading::Pinyin, &numbers())
        .unwrap();
    assert_eq!(out, "lao3,");
}

#[test]
fn test_wade_giles_to_pinyin() {
    let out = convert("kuo³-yü²", Reading::WadeGiles, &OptionMap::new(), Reading::Pinyin, &OptionMap::new())
        .unwrap();
    assert_eq!(out, "guǒyú");
}

#[test]
fn test_pinyin_to_wade_giles() {
    let out = convert("guo3yu2", Reading::Pinyin, &numbers(), Reading::WadeGiles, &OptionMap::new())
        .unwrap();
    assert_eq!(out, "kuo³-yü²");
}

#[test]
fn test_wade_giles_lost_umlaut_recovered() {
    let source = option_map([("umlautU", "u"), ("toneMarkType", "numbers")]);
    let out = factory()
        .convert_entities(&strings(&["hsu3"]), Reading::WadeGiles, &source, Reading::WadeGiles, &numbers())
        .unwrap();
    assert_eq!(out, strings(&["hsü3"]));

    let err = factory()
        .convert_entities(&strings(&["lu4"]), Reading::WadeGiles, &source, Reading::WadeGiles, &numbers())
        .unwrap_err();
    assert!(
        matches!(&err, ReadingError::AmbiguousConversion(msg) if msg.ends_with("lu, lü")),
        "{err}"
    );
}

#[test]
fn test_wade_giles_lost_diacritics_to_pinyin() {
    let source = option_map([("diacriticE", "e"), ("zeroFinal", "u"), ("toneMarkType", "numbers")]);
    let out = convert("pen1-tzu3", Reading::WadeGiles, &source, Reading::Pinyin, &numbers()).unwrap();
    assert_eq!(out, "ben1zi3");
}

#[test]
fn test_case_carried_through_mapping() {
    let out = convert("Guo3yu2", Reading::Pinyin, &numbers(), Reading::WadeGiles, &OptionMap::new())
        .unwrap();
    assert_eq!(out, "Kuo³-yü²");
}

#[test]
fn test_erhua_spelled_out() {
    let out = convert(
        "huār",
        Reading::Pinyin,
        &option_map([("erhua", "oneSyllable")]),
        Reading::Pinyin,
        &option_map([("erhua", "ignore")]),
    )
    .unwrap();
    assert_eq!(out, "huā'er");
}

#[test]
fn test_pinyin_to_gr() {
    let out = convert("xiao3", Reading::Pinyin, &numbers(), Reading::Gr, &OptionMap::new()).unwrap();
    assert_eq!(out, "sheau");
}

#[test]
fn test_gr_to_pinyin() {
    let out = convert("sheau", Reading::Gr, &OptionMap::new(), Reading::Pinyin, &numbers()).unwrap();
    assert_eq!(out, "xiao3");
}

#[test]
fn test_neutral_tone_to_gr_ambiguous() {
    let err = convert("ma5", Reading::Pinyin, &numbers(), Reading::Gr, &OptionMap::new()).unwrap_err();
    assert!(matches!(err, ReadingError::AmbiguousConversion(_)), "{err}");
}

#[test]
fn test_bridge_splits_converter_options() {
    let conv = factory()
        .converter(
            Reading::Gr,
            &OptionMap::new(),
            Reading::MandarinIpa,
            &OptionMap::new(),
            &option_map([("sandhiRule", "none")]),
        )
        .unwrap();
    assert_eq!(conv.options()["sandhiRule"], "none".into());
    assert_eq!(conv.options()["grOptionalNeutralToneMapping"], "original".into());

    let err = factory()
        .converter(
            Reading::Gr,
            &OptionMap::new(),
            Reading::MandarinIpa,
            &OptionMap::new(),
            &option_map([("keepPinyinApostrophes", true)]),
        )
        .err()
        .unwrap();
    assert!(matches!(err, ReadingError::UnsupportedOption { .. }));
}

#[test]
fn test_unknown_converter_option_rejected() {
    let err = factory()
        .converter(
            Reading::Pinyin,
            &OptionMap::new(),
            Reading::Pinyin,
            &numbers(),
            &option_map([("sandhiRule", "none")]),
        )
        .err()
        .unwrap();
    assert!(matches!(err, ReadingError::UnsupportedOption { .. }));
}

fn gr_break_up(value: &str, target: &OptionMap) -> Arc<dyn ReadingConverter> {
    factory()
        .converter(
            Reading::Gr,
            &OptionMap::new(),
            Reading::Gr,
            target,
            &option_map([("breakUpAbbreviated", value)]),
        )
        .unwrap()
}

#[test]
fn test_gr_break_up_abbreviated() {
    let conv = gr_break_up("on", &OptionMap::new());
    assert_eq!(conv.convert_entities(&strings(&["sherm"])).unwrap(), strings(&["shern", ".me"]));
    assert_eq!(conv.convert_entities(&strings(&["Sherm"])).unwrap(), strings(&["Shern", ".me"]));

    let conv = gr_break_up("off", &OptionMap::new());
    assert_eq!(conv.convert_entities(&strings(&["sherm"])).unwrap(), strings(&["sherm"]));
}

#[test]
fn test_gr_break_up_follows_target_abbreviations() {
    let conv = gr_break_up("auto", &OptionMap::new());
    assert_eq!(conv.convert_entities(&strings(&["g"])).unwrap(), strings(&["g"]));

    let conv = gr_break_up("auto", &option_map([("abbreviations", false)]));
    assert_eq!(conv.convert_entities(&strings(&["g"])).unwrap(), strings(&[".geh"]));
}
