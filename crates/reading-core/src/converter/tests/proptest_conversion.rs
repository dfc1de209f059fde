//! Property-based checks over generated syllable sequences.

use proptest::prelude::*;

use super::{convert, factory};
use crate::operator::RomanisationOperator;
use crate::options::{option_map, OptionMap};
use crate::reading::Reading;

const PINYIN: [&str; 14] = [
    "han", "zi", "guo", "yu", "lao", "shi", "zhong", "wen", "ma", "bei", "jing", "xiao", "shuo",
    "hua",
];

const JYUTPING_OPEN: [&str; 4] = ["gwong", "jau", "waa", "si"];
/// Stop-final syllables take tones 1, 3 and 6 only; 6 is left to the
/// Cantonese scenarios.
const JYUTPING_STOP: [&str; 1] = ["sik"];

fn numbers() -> OptionMap {
    option_map([("toneMarkType", "numbers")])
}

fn arb_pinyin() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (prop::sample::select(PINYIN.to_vec()), 1u8..=4).prop_map(|(s, t)| format!("{s}{t}")),
        1..8,
    )
}

fn arb_jyutping_syllable() -> impl Strategy<Value = String> {
    prop_oneof![
        (prop::sample::select(JYUTPING_OPEN.to_vec()), 1u8..=3),
        (prop::sample::select(JYUTPING_STOP.to_vec()), prop::sample::select(vec![1u8, 3])),
    ]
    .prop_map(|(s, t)| format!("{s}{t}"))
}

fn arb_jyutping() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_jyutping_syllable(), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn composed_pinyin_decomposes_back(entities in arb_pinyin()) {
        let text = factory().compose(&entities, Reading::Pinyin, &numbers()).unwrap();
        let back = factory().decompose(&text, Reading::Pinyin, &numbers()).unwrap();
        prop_assert_eq!(back.into_texts(), entities);
    }

    #[test]
    fn pinyin_tone_marks_survive_diacritics(entities in arb_pinyin()) {
        let text = entities.concat();
        let marked = convert(&text, Reading::Pinyin, &numbers(), Reading::Pinyin, &OptionMap::new()).unwrap();
        let back = convert(&marked, Reading::Pinyin, &OptionMap::new(), Reading::Pinyin, &numbers()).unwrap();
        prop_assert_eq!(back, text);
    }

    #[test]
    fn identity_dialect_is_idempotent(entities in arb_pinyin()) {
        let text = entities.concat();
        let once = convert(&text, Reading::Pinyin, &numbers(), Reading::Pinyin, &numbers()).unwrap();
        prop_assert_eq!(&once, &text);
    }

    #[test]
    fn at_most_one_strict_decomposition(entities in arb_pinyin()) {
        let text = convert(&entities.concat(), Reading::Pinyin, &numbers(), Reading::Pinyin, &OptionMap::new()).unwrap();
        let op = factory().operator(Reading::Pinyin, &OptionMap::new()).unwrap();
        let pinyin = op.as_pinyin().unwrap();
        let strict = factory()
            .get_decompositions(&text, Reading::Pinyin, &OptionMap::new())
            .unwrap()
            .into_iter()
            .filter(|d| pinyin.is_strict_decomposition(&d.texts()))
            .count();
        prop_assert!(strict <= 1, "{} has {} strict decompositions", text, strict);
    }

    #[test]
    fn generated_jyutping_is_valid(entities in arb_jyutping()) {
        for entity in &entities {
            prop_assert!(
                factory().is_reading_entity(entity, Reading::Jyutping, &OptionMap::new()).unwrap(),
                "{}", entity
            );
        }
    }

    #[test]
    fn jyutping_survives_yale(entities in arb_jyutping()) {
        let text = entities.concat();
        let yale = convert(&text, Reading::Jyutping, &OptionMap::new(), Reading::CantoneseYale, &OptionMap::new()).unwrap();
        let back = convert(&yale, Reading::CantoneseYale, &OptionMap::new(), Reading::Jyutping, &OptionMap::new()).unwrap();
        prop_assert_eq!(back, text);
    }
}
