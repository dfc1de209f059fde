//! Serde-facing API of the engine.
//!
//! Readings are addressed by their canonical names, errors flatten to
//! [`ApiError`] and results are plain records, so every call maps directly
//! onto JSON.

mod engine;
mod types;

pub use engine::ReadingEngine;
pub use types::{
    ApiError, ConversionRecord, ConversionRequest, DecompositionRecord, EntityRecord, ErrorKind,
    Reply,
};

pub fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The embedded settings file, as a starting point for custom settings.
pub fn settings_default_config() -> String {
    reading_core::settings::default_toml().to_string()
}

#[cfg(test)]
mod tests {
    use reading_core::options::option_map;
    use reading_core::OptionMap;

    use super::*;

    fn request(text: &str, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            text: text.into(),
            from: from.into(),
            to: to.into(),
            from_options: OptionMap::new(),
            to_options: OptionMap::new(),
            converter_options: OptionMap::new(),
        }
    }

    #[test]
    fn test_decompose_record() {
        let engine = ReadingEngine::new();
        let record = engine.decompose("tiān'ānmén", "Pinyin", &OptionMap::new()).unwrap();
        let texts: Vec<&str> = record.entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["tiān", "'", "ān", "mén"]);
        assert_eq!(record.entities[1].kind, "formatting");
        assert_eq!(record.entities[0].start, 0);
        assert_eq!(record.entities[1].start, record.entities[0].end);
    }

    #[test]
    fn test_convert_record() {
        let engine = ReadingEngine::new();
        let mut req = request("han4zi4", "Pinyin", "Pinyin");
        req.from_options = option_map([("toneMarkType", "numbers")]);
        let record = engine.convert(&req).unwrap();
        assert_eq!(record.text, "hànzì");
        assert_eq!(record.from, "Pinyin");
    }

    #[test]
    fn test_unknown_reading() {
        let engine = ReadingEngine::new();
        let err = engine.decompose("a", "Klingon", &OptionMap::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);
    }

    #[test]
    fn test_error_kinds_carried() {
        let engine = ReadingEngine::new();
        let err = engine.convert(&request("⠍⠢", "MandarinBraille", "Pinyin")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousConversion);
        let err = engine
            .decompose("ni3", "Pinyin", &option_map([("toneMarks", "numbers")]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOption);
    }

    #[test]
    fn test_convert_json() {
        let engine = ReadingEngine::new();
        let reply = engine.convert_json(
            r#"{"text":"gwong2jau1waa2","from":"Jyutping","to":"CantoneseYale"}"#,
        );
        let reply: Reply<ConversionRecord> = serde_json::from_str(&reply).unwrap();
        match reply {
            Reply::Ok(record) => assert_eq!(record.text, "gwóngyāuwá"),
            Reply::Err(e) => panic!("unexpected error: {e}"),
        }

        let reply = engine.convert_json(r#"{"text":"x"}"#);
        let reply: Reply<ConversionRecord> = serde_json::from_str(&reply).unwrap();
        assert!(matches!(reply, Reply::Err(ApiError { kind: ErrorKind::InvalidRequest, .. })));
    }

    #[test]
    fn test_settings_from_toml() {
        let engine = ReadingEngine::from_settings_toml(
            r#"
[segmentation]
best_effort = "longest_match"

[defaults.Pinyin]
toneMarkType = "numbers"
"#,
        )
        .unwrap();
        let defaults = engine.default_options("Pinyin").unwrap();
        assert_eq!(defaults["toneMarkType"], "numbers".into());
        assert!(!engine.is_conversion_supported("Hangul", "Pinyin").unwrap());

        let err = ReadingEngine::from_settings_toml("segmentation = 3").err().unwrap();
        assert_eq!(err.kind, ErrorKind::Settings);
    }

    #[test]
    fn test_readings_listed() {
        let engine = ReadingEngine::new();
        let readings = engine.readings();
        assert!(readings.iter().any(|r| r == "GR"));
        assert_eq!(readings.len(), 13);
        assert!(settings_default_config().contains("[segmentation]"));
        assert!(!engine_version().is_empty());
    }
}
