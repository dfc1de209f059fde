use crate::entity::Tone;
use crate::error::ReadingError;
use crate::operator::ReadingOperator;
use crate::options::option_map;
use crate::reading::Reading;
use crate::testutil::{default_operator, operator, strings};

#[test]
fn test_jyutping_decompose() {
    let op = default_operator(Reading::Jyutping);
    let d = op.decompose("gwong2jau1waa2").unwrap();
    assert_eq!(d.texts(), vec!["gwong2", "jau1", "waa2"]);
    assert!(d.entities.iter().all(|e| e.is_reading()));
}

#[test]
fn test_jyutping_stop_tones() {
    let op = default_operator(Reading::Jyutping);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("sik", Some(Tone::Number(6))).unwrap(), "sik6");
    let err = tonal.tonal_entity("sik", Some(Tone::Number(2))).unwrap_err();
    assert!(matches!(err, ReadingError::InvalidEntity(_)));
    assert!(!op.is_reading_entity("sik5"));
    assert!(op.is_reading_entity("si5"));
}

#[test]
fn test_jyutping_compose() {
    let op = default_operator(Reading::Jyutping);
    assert_eq!(op.compose(&strings(&["gwong2", "jau1"])).unwrap(), "gwong2jau1");
}

#[test]
fn test_jyutping_missing_tone_ignored() {
    let op = operator(Reading::Jyutping, &option_map([("missingToneMark", "ignore")]));
    assert!(op.as_tonal().unwrap().split_entity_tone("si").is_err());
    assert!(!op.is_reading_entity("si"));
}

#[test]
fn test_yale_diacritics() {
    let op = default_operator(Reading::CantoneseYale);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("gwong", Some(Tone::Named("2ndTone"))).unwrap(), "gwóng");
    assert_eq!(tonal.tonal_entity("si", Some(Tone::Named("4thTone"))).unwrap(), "sìh");
    assert_eq!(tonal.tonal_entity("sik", Some(Tone::Named("6thTone"))).unwrap(), "sihk");
    assert_eq!(
        tonal.split_entity_tone("sìh").unwrap(),
        ("si".to_string(), Some(Tone::Named("4thTone")))
    );
}

#[test]
fn test_yale_numbers() {
    let op = operator(Reading::CantoneseYale, &option_map([("toneMarkType", "numbers")]));
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("gwong", Some(Tone::Named("2ndTone"))).unwrap(), "gwong2");
    assert!(op.is_reading_entity("yau1"));
}
