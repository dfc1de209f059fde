//! Engine settings loaded from TOML.
//!
//! - `parse_settings_toml(toml_content)` parses and validates custom settings
//! - `Settings::default()` parses the embedded `default_settings.toml`
//! - Settings are handed to `ReadingFactory::with_settings`; nothing is global

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use crate::options::OptionMap;
use crate::reading::Reading;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub segmentation: SegmentationSettings,
    #[serde(default)]
    bridge: Vec<BridgeSettings>,
    #[serde(default)]
    defaults: BTreeMap<String, OptionMap>,
    /// Parsed bridge table: (from, via, to).
    #[serde(skip)]
    bridges_parsed: Vec<(Reading, Reading, Reading)>,
    #[serde(skip)]
    defaults_parsed: HashMap<Reading, OptionMap>,
}

impl Settings {
    pub fn bridges(&self) -> &[(Reading, Reading, Reading)] {
        &self.bridges_parsed
    }

    /// Bridge reading configured for `from -> to`.
    pub fn bridge_for(&self, from: Reading, to: Reading) -> Option<Reading> {
        self.bridges_parsed
            .iter()
            .find(|(f, _, t)| *f == from && *t == to)
            .map(|(_, via, _)| *via)
    }

    /// Option overrides configured for a reading.
    pub fn defaults_for(&self, reading: Reading) -> Option<&OptionMap> {
        self.defaults_parsed.get(&reading)
    }
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationSettings {
    pub best_effort: BestEffort,
}

/// What to do with an ambiguous run that has no strict segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestEffort {
    #[default]
    LongestMatch,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
struct BridgeSettings {
    from: String,
    via: String,
    to: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    s.bridges_parsed = parse_bridges(&s.bridge)?;
    s.defaults_parsed = parse_defaults(&s.defaults)?;
    Ok(s)
}

fn parse_reading(field: String, name: &str) -> Result<Reading, SettingsError> {
    name.parse().map_err(|_| SettingsError::InvalidValue {
        field,
        reason: format!("unknown reading '{name}'"),
    })
}

fn parse_bridges(
    raw: &[BridgeSettings],
) -> Result<Vec<(Reading, Reading, Reading)>, SettingsError> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(raw.len());
    for (i, b) in raw.iter().enumerate() {
        let field = |name: &str| format!("bridge[{i}].{name}");
        let from = parse_reading(field("from"), &b.from)?;
        let via = parse_reading(field("via"), &b.via)?;
        let to = parse_reading(field("to"), &b.to)?;
        if via == from || via == to || from == to {
            return Err(SettingsError::InvalidValue {
                field: format!("bridge[{i}]"),
                reason: "from, via and to must be distinct".to_string(),
            });
        }
        if !seen.insert((from, to)) {
            return Err(SettingsError::InvalidValue {
                field: format!("bridge[{i}]"),
                reason: format!("duplicate bridge {from} -> {to}"),
            });
        }
        result.push((from, via, to));
    }
    Ok(result)
}

fn parse_defaults(
    raw: &BTreeMap<String, OptionMap>,
) -> Result<HashMap<Reading, OptionMap>, SettingsError> {
    raw.iter()
        .map(|(name, opts)| Ok((parse_reading(format!("defaults.{name}"), name)?, opts.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.segmentation.best_effort, BestEffort::LongestMatch);
        assert_eq!(s.bridges().len(), 9);
        assert_eq!(
            s.bridge_for(Reading::Gr, Reading::MandarinIpa),
            Some(Reading::Pinyin)
        );
        assert_eq!(s.bridge_for(Reading::Pinyin, Reading::Gr), None);
    }

    #[test]
    fn default_matches_embedded() {
        let s = Settings::default();
        assert_eq!(s.bridges().len(), 9);
        assert!(s.defaults_for(Reading::Pinyin).is_none());
    }

    #[test]
    fn parse_defaults_section() {
        let toml = r#"
[segmentation]
best_effort = "error"

[defaults.Pinyin]
toneMarkType = "numbers"
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.segmentation.best_effort, BestEffort::Error);
        assert!(s.bridges().is_empty());
        let d = s.defaults_for(Reading::Pinyin).unwrap();
        assert_eq!(d["toneMarkType"], OptionValue::from("numbers"));
    }

    #[test]
    fn error_unknown_reading() {
        let toml = r#"
[segmentation]
best_effort = "longest_match"

[[bridge]]
from = "Zhuyin"
via = "Pinyin"
to = "GR"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "bridge[0].from"));
    }

    #[test]
    fn error_degenerate_bridge() {
        let toml = r#"
[segmentation]
best_effort = "longest_match"

[[bridge]]
from = "GR"
via = "GR"
to = "Pinyin"
"#;
        assert!(matches!(
            parse_settings_toml(toml),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn error_duplicate_bridge() {
        let toml = r#"
[segmentation]
best_effort = "longest_match"

[[bridge]]
from = "GR"
via = "Pinyin"
to = "WadeGiles"

[[bridge]]
from = "GR"
via = "MandarinIPA"
to = "WadeGiles"
"#;
        assert!(parse_settings_toml(toml).is_err());
    }

    #[test]
    fn error_unknown_tie_break() {
        let toml = "[segmentation]\nbest_effort = \"shortest\"\n";
        assert!(matches!(
            parse_settings_toml(toml),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
