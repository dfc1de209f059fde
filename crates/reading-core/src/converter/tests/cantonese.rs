use super::{convert, factory};
use crate::error::ReadingError;
use crate::options::{option_map, OptionMap};
use crate::reading::Reading;

#[test]
fn test_jyutping_tones_to_yale() {
    let out = convert(
        "si1si2si3si4si5si6sik1sik3sik6",
        Reading::Jyutping,
        &OptionMap::new(),
        Reading::CantoneseYale,
        &OptionMap::new(),
    )
    .unwrap();
    assert_eq!(out, "sīsísisìhsíhsihsīksiksihk");
}

#[test]
fn test_yale_to_jyutping() {
    let out = convert(
        "gwóngyāuwá",
        Reading::CantoneseYale,
        &OptionMap::new(),
        Reading::Jyutping,
        &OptionMap::new(),
    )
    .unwrap();
    assert_eq!(out, "gwong2jau1waa2");
}

#[test]
fn test_yale_first_tone_falling() {
    let conv = factory()
        .converter(
            Reading::Jyutping,
            &OptionMap::new(),
            Reading::CantoneseYale,
            &OptionMap::new(),
            &option_map([("yaleFirstTone", "1stToneFalling")]),
        )
        .unwrap();
    assert_eq!(conv.convert("gwong2jau1waa2").unwrap(), "gwóngyàuwá");
    assert_eq!(conv.options()["yaleFirstTone"], "1stToneFalling".into());
}

#[test]
fn test_yale_first_tone_rejects_other_values() {
    let err = factory()
        .converter(
            Reading::Jyutping,
            &OptionMap::new(),
            Reading::CantoneseYale,
            &OptionMap::new(),
            &option_map([("yaleFirstTone", "2ndTone")]),
        )
        .err()
        .unwrap();
    assert!(matches!(err, ReadingError::UnsupportedOption { .. }));
}
