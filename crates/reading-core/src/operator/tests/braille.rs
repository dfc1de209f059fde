use crate::entity::Tone;
use crate::operator::ReadingOperator;
use crate::options::option_map;
use crate::reading::Reading;
use crate::testutil::{default_operator, operator, strings};

#[test]
fn test_decompose_syllables() {
    let op = default_operator(Reading::MandarinBraille);
    let d = op.decompose("⠇⠖⠄⠱⠁").unwrap();
    assert_eq!(d.texts(), vec!["⠇⠖⠄", "⠱⠁"]);
    assert!(d.entities.iter().all(|e| e.is_reading()));
}

#[test]
fn test_decompose_keeps_other_text() {
    let op = default_operator(Reading::MandarinBraille);
    let d = op.decompose("⠇⠖⠄ abc").unwrap();
    assert_eq!(d.texts(), vec!["⠇⠖⠄", " abc"]);
    assert!(!d.entities[1].is_reading());
}

#[test]
fn test_tone_cells() {
    let op = default_operator(Reading::MandarinBraille);
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.split_entity_tone("⠇⠖⠄").unwrap(), ("⠇⠖".to_string(), Some(Tone::Number(3))));
    assert_eq!(tonal.split_entity_tone("⠇⠖").unwrap(), ("⠇⠖".to_string(), Some(Tone::Number(5))));
    assert_eq!(tonal.tonal_entity("⠱", Some(Tone::Number(1))).unwrap(), "⠱⠁");
    assert_eq!(tonal.tonal_entity("⠇⠖", Some(Tone::Number(5))).unwrap(), "⠇⠖");
}

#[test]
fn test_onset_rhyme_of_single_cells() {
    let op = default_operator(Reading::MandarinBraille);
    let braille = op.as_braille().unwrap();
    assert_eq!(braille.onset_rhyme("⠱").unwrap(), ("⠱".to_string(), String::new()));
    assert_eq!(braille.onset_rhyme("⠔").unwrap(), (String::new(), "⠔".to_string()));
    assert!(braille.onset_rhyme("⠇⠖⠖").is_err());
}

#[test]
fn test_space_separated_entities() {
    let op = default_operator(Reading::MandarinBraille);
    let spaced = op
        .as_braille()
        .unwrap()
        .space_separated_entities(&strings(&["⠇⠖⠄", "⠱⠁", "!"]));
    assert_eq!(spaced, strings(&["⠇⠖⠄", " ", "⠱⠁", "!"]));
}

#[test]
fn test_without_tone_marks() {
    let op = operator(Reading::MandarinBraille, &option_map([("toneMarkType", "none")]));
    let tonal = op.as_tonal().unwrap();
    assert_eq!(tonal.split_entity_tone("⠇⠖").unwrap(), ("⠇⠖".to_string(), None));
}
