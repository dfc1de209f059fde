use crate::entity::Tone;
use crate::operator::ReadingOperator;
use crate::reading::Reading;
use crate::testutil::{default_operator, strings};

#[test]
fn test_tonal_spelling() {
    let op = default_operator(Reading::Gr);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.tonal_entity("lau", Some(Tone::Named("3rdTone"))).unwrap(), "lao");
    assert_eq!(tonal.tonal_entity("shy", Some(Tone::Named("1stTone"))).unwrap(), "shy");
    assert_eq!(tonal.tonal_entity("Lau", Some(Tone::Named("3rdTone"))).unwrap(), "Lao");
}

#[test]
fn test_split_entity_tone() {
    let op = default_operator(Reading::Gr);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(
        tonal.split_entity_tone("lao").unwrap(),
        ("lau".to_string(), Some(Tone::Named("3rdTone")))
    );
    assert!(tonal.split_entity_tone("xyz").is_err());
}

#[test]
fn test_decompose_and_compose() {
    let op = default_operator(Reading::Gr);
    let d = op.decompose("laoshy").unwrap();
    assert_eq!(d.texts(), vec!["lao", "shy"]);
    assert_eq!(op.compose(&strings(&["lao", "shy"])).unwrap(), "laoshy");
}

#[test]
fn test_rhotacised_entity() {
    let op = default_operator(Reading::Gr);
    let gr = op.as_gr().unwrap();
    let dial = gr.rhotacised_tonal_entity("dian", Tone::Named("1stTone")).unwrap();
    assert_eq!(dial, "dial");
    assert!(gr.is_rhotacised_reading_entity(&dial));
    assert!(!gr.is_rhotacised_reading_entity("lao"));
}
