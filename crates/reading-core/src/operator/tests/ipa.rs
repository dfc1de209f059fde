use crate::entity::Tone;
use crate::error::ReadingError;
use crate::operator::ReadingOperator;
use crate::options::option_map;
use crate::reading::Reading;
use crate::testutil::{default_operator, operator, strings};

#[test]
fn test_mandarin_tone_bars() {
    let op = default_operator(Reading::MandarinIpa);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("lau", Some(Tone::Named("3rdToneLow"))).unwrap(), "lau˨˩");
    assert_eq!(
        tonal.split_entity_tone("ʂʅ˥˥").unwrap(),
        ("ʂʅ".to_string(), Some(Tone::Named("1stTone")))
    );
    assert_eq!(
        tonal.split_entity_tone("lau˨˩˦").unwrap(),
        ("lau".to_string(), Some(Tone::Named("3rdToneRegular")))
    );
}

#[test]
fn test_mandarin_compose_and_decompose() {
    let op = default_operator(Reading::MandarinIpa);
    let text = op.compose(&strings(&["lau˨˩", "ʂʅ˥˥"])).unwrap();
    assert_eq!(text, "lau˨˩.ʂʅ˥˥");
    let d = op.decompose(&text).unwrap();
    assert_eq!(d.texts(), vec!["lau˨˩", ".", "ʂʅ˥˥"]);
    assert!(d.entities[0].is_reading());
    assert!(!d.entities[1].is_reading());
}

#[test]
fn test_mandarin_shared_number_mark() {
    let op = operator(Reading::MandarinIpa, &option_map([("toneMarkType", "numbers")]));
    let tonal = op.as_tonal().unwrap();
    assert_eq!(
        tonal.split_entity_tone("lau3").unwrap(),
        ("lau".to_string(), Some(Tone::Named("3rdToneRegular")))
    );
}

#[test]
fn test_cantonese_stop_syllables() {
    let op = default_operator(Reading::CantoneseIpa);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("siː", Some(Tone::Named("HighLevel"))).unwrap(), "siː˥˥");
    assert_eq!(tonal.tonal_entity("sɪk̚", Some(Tone::Named("HighLevel"))).unwrap(), "sɪk̚˥");
    assert_eq!(
        tonal.split_entity_tone("sɪk̚˥").unwrap(),
        ("sɪk̚".to_string(), Some(Tone::Named("HighLevel")))
    );
    let err = tonal.tonal_entity("sɪk̚", Some(Tone::Named("HighRising"))).unwrap_err();
    assert!(matches!(err, ReadingError::InvalidEntity(_)));
}

#[test]
fn test_cantonese_explicit_stop_tones() {
    let op = operator(Reading::CantoneseIpa, &option_map([("stopTones", "explicit")]));
    let tonal = op.as_tonal().unwrap();
    assert_eq!(
        tonal.split_entity_tone("sɪk̚˥").unwrap(),
        ("sɪk̚".to_string(), Some(Tone::Named("HighStopped_Short")))
    );
    assert!(tonal.tonal_entity("sɪk̚", Some(Tone::Named("HighStopped_Long"))).is_err());
    let general = operator(Reading::CantoneseIpa, &option_map([("stopTones", "general")]));
    assert_eq!(
        general.as_tonal().unwrap().split_entity_tone("sɪk̚˥").unwrap(),
        ("sɪk̚".to_string(), Some(Tone::Named("HighStopped")))
    );
}

#[test]
fn test_shanghainese_constraints() {
    let free = default_operator(Reading::ShanghaineseIpa);
    let tonal = free.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("ba", Some(Tone::Named("YinPing"))).unwrap(), "ba˥˧");

    let categories = operator(
        Reading::ShanghaineseIpa,
        &option_map([("constrainToneCategories", true)]),
    );
    let tonal = categories.as_tonal().unwrap();
    assert!(tonal.tonal_entity("ba", Some(Tone::Named("YinPing"))).is_err());
    assert!(tonal.tonal_entity("ba", Some(Tone::Named("YangQu"))).is_ok());

    let entering = operator(Reading::ShanghaineseIpa, &option_map([("constrainEntering", true)]));
    let tonal = entering.as_tonal().unwrap();
    assert!(tonal.tonal_entity("baʔ", Some(Tone::Named("YangRu"))).is_ok());
    assert!(tonal.tonal_entity("baʔ", Some(Tone::Named("YangQu"))).is_err());
    assert!(tonal.split_entity_tone("ba˩˨").is_err());
}
