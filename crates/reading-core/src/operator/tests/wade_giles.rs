use crate::entity::Tone;
use crate::error::ReadingError;
use crate::operator::{PlainEntityCheck, ReadingOperator, VowelOption};
use crate::options::option_map;
use crate::reading::Reading;
use crate::testutil::{default_operator, operator, strings};

#[test]
fn test_decompose_hyphenated() {
    let op = default_operator(Reading::WadeGiles);
    let d = op.decompose("kuo³-yü²").unwrap();
    assert_eq!(d.texts(), vec!["kuo³", "-", "yü²"]);
    assert!(d.entities[0].is_reading());
    assert!(d.entities[2].is_reading());
}

#[test]
fn test_compose_hyphenates_syllables() {
    let op = default_operator(Reading::WadeGiles);
    assert_eq!(op.compose(&strings(&["kuo³", "yü²"])).unwrap(), "kuo³-yü²");
}

#[test]
fn test_superscript_tones() {
    let op = default_operator(Reading::WadeGiles);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.split_entity_tone("shih⁴").unwrap(), ("shih".to_string(), Some(Tone::Number(4))));
    assert_eq!(tonal.tonal_entity("kuo", Some(Tone::Number(3))).unwrap(), "kuo³");
}

#[test]
fn test_plain_number_tones() {
    let op = operator(Reading::WadeGiles, &option_map([("toneMarkType", "numbers")]));
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("kuo", Some(Tone::Number(3))).unwrap(), "kuo3");
    assert!(op.is_reading_entity("yü2"));
}

fn plain_vowels(option: &str) -> crate::operator::Operator {
    operator(Reading::WadeGiles, &option_map([(option, "u")]))
}

#[test]
fn test_check_plain_entity_recovers_lost_umlaut() {
    let op = plain_vowels("umlautU");
    let wg = op.as_wade_giles().unwrap();
    assert_eq!(wg.check_plain_entity("hsu", VowelOption::UmlautU).unwrap(), PlainEntityCheck::Lost);
    assert_eq!(wg.check_plain_entity("lu", VowelOption::UmlautU).unwrap(), PlainEntityCheck::Ambiguous);
    assert_eq!(wg.check_plain_entity("tu", VowelOption::UmlautU).unwrap(), PlainEntityCheck::Strict);
    assert!(wg.check_plain_entity("pa", VowelOption::UmlautU).is_err());
}

#[test]
fn test_convert_plain_entity_restores_diacritics() {
    let op = plain_vowels("umlautU");
    assert_eq!(op.as_wade_giles().unwrap().convert_plain_entity("Hsu", None).unwrap(), "Hsü");

    let op = operator(Reading::WadeGiles, &option_map([("diacriticE", "e")]));
    assert_eq!(op.as_wade_giles().unwrap().convert_plain_entity("pen", None).unwrap(), "pên");

    let op = plain_vowels("zeroFinal");
    assert_eq!(op.as_wade_giles().unwrap().convert_plain_entity("tzu", None).unwrap(), "tzŭ");
}

#[test]
fn test_convert_plain_entity_ambiguous_umlaut() {
    let op = plain_vowels("umlautU");
    let err = op.as_wade_giles().unwrap().convert_plain_entity("lu", None).unwrap_err();
    assert!(
        matches!(&err, ReadingError::AmbiguousConversion(msg) if msg.ends_with("lu, lü")),
        "{err}"
    );
}
