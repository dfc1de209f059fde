//! Option maps and their validation.
//!
//! Every operator and converter reads its options through an [`OptionReader`],
//! which fills in defaults and rejects unknown names or values. The resolved
//! map (defaults included) is what the factory uses as a cache key, so `{}`
//! and an explicit map of all defaults address the same instance.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReadingError, Result};

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            OptionValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

pub type OptionMap = BTreeMap<String, OptionValue>;

/// Build an option map from `(name, value)` pairs.
pub fn option_map<K, V, I>(pairs: I) -> OptionMap
where
    K: Into<String>,
    V: Into<OptionValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// `over` layered on top of `base`.
pub(crate) fn merged(base: &OptionMap, over: &OptionMap) -> OptionMap {
    let mut out = base.clone();
    out.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
    out
}

/// An enum-valued option with a fixed set of spellings.
pub(crate) trait Choice: Copy + PartialEq + 'static {
    const NAMES: &'static [(&'static str, Self)];

    fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or_default()
    }
}

/// Declare an enum together with its [`Choice`] spellings.
macro_rules! option_choice {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::options::Choice for $name {
            const NAMES: &'static [(&'static str, Self)] = &[$(($text, $name::$variant)),+];
        }
    };
}
pub(crate) use option_choice;

option_choice! {
    /// Letter case accepted by a romanisation.
    pub enum Case {
        Both => "both",
        Lower => "lower",
    }
}

option_choice! {
    /// Tone inferred for an entity written without a tone mark.
    pub enum MissingToneMark {
        Fifth => "fifth",
        NoInfo => "noinfo",
        Ignore => "ignore",
        Extended => "extended",
    }
}

/// Reads options for one reading, recording the resolved value of every
/// option it is asked about.
pub(crate) struct OptionReader<'a> {
    owner: String,
    given: &'a OptionMap,
    resolved: OptionMap,
}

impl<'a> OptionReader<'a> {
    pub fn new(owner: impl fmt::Display, given: &'a OptionMap) -> Self {
        Self {
            owner: owner.to_string(),
            given,
            resolved: OptionMap::new(),
        }
    }

    fn unsupported(&self, name: &str, value: &OptionValue) -> ReadingError {
        ReadingError::UnsupportedOption {
            reading: self.owner.clone(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn bool(&mut self, name: &str, default: bool) -> Result<bool> {
        let value = match self.given.get(name) {
            None => default,
            Some(OptionValue::Bool(b)) => *b,
            Some(other) => return Err(self.unsupported(name, other)),
        };
        self.resolved.insert(name.to_string(), value.into());
        Ok(value)
    }

    pub fn choice<T: Choice>(&mut self, name: &str, default: T) -> Result<T> {
        let all: Vec<T> = T::NAMES.iter().map(|(_, v)| *v).collect();
        self.choice_among(name, default, &all)
    }

    /// Like [`choice`](Self::choice), restricted to a subset of the spellings.
    pub fn choice_among<T: Choice>(&mut self, name: &str, default: T, allowed: &[T]) -> Result<T> {
        let value = match self.given.get(name) {
            None => default,
            Some(given) => given
                .as_str()
                .and_then(|s| T::NAMES.iter().find(|(n, _)| *n == s))
                .map(|(_, v)| *v)
                .filter(|v| allowed.contains(v))
                .ok_or_else(|| self.unsupported(name, given))?,
        };
        self.resolved.insert(name.to_string(), value.name().into());
        Ok(value)
    }

    /// A free-form string option; `accept` validates a caller-supplied value.
    pub fn string(
        &mut self,
        name: &str,
        default: &str,
        accept: impl FnOnce(&str) -> bool,
    ) -> Result<String> {
        let value = match self.given.get(name) {
            None => default.to_string(),
            Some(given) => match given.as_str() {
                Some(s) if accept(s) => s.to_string(),
                _ => return Err(self.unsupported(name, given)),
            },
        };
        self.resolved.insert(name.to_string(), value.as_str().into());
        Ok(value)
    }

    /// Reject any given option nobody asked for and return the resolved map.
    pub fn finish(self) -> Result<OptionMap> {
        if let Some((name, value)) = self
            .given
            .iter()
            .find(|(k, _)| !self.resolved.contains_key(k.as_str()))
        {
            return Err(self.unsupported(name, value));
        }
        Ok(self.resolved)
    }
}

/// Options shared by all romanisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RomanisationOptions {
    pub strict_segmentation: bool,
    pub case: Case,
}

impl RomanisationOptions {
    pub fn read(reader: &mut OptionReader<'_>) -> Result<Self> {
        Ok(Self {
            strict_segmentation: reader.bool("strictSegmentation", false)?,
            case: reader.choice("case", Case::Both)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_resolved() {
        let given = OptionMap::new();
        let mut reader = OptionReader::new("Pinyin", &given);
        let opts = RomanisationOptions::read(&mut reader).unwrap();
        assert!(!opts.strict_segmentation);
        assert_eq!(opts.case, Case::Both);
        let resolved = reader.finish().unwrap();
        assert_eq!(resolved["case"], OptionValue::from("both"));
        assert_eq!(resolved["strictSegmentation"], OptionValue::Bool(false));
    }

    #[test]
    fn test_explicit_defaults_resolve_identically() {
        let empty = OptionMap::new();
        let explicit = option_map([("case", "both")]);
        let resolve = |given: &OptionMap| {
            let mut reader = OptionReader::new("Pinyin", given);
            RomanisationOptions::read(&mut reader).unwrap();
            reader.finish().unwrap()
        };
        assert_eq!(resolve(&empty), resolve(&explicit));
    }

    #[test]
    fn test_unknown_name_rejected() {
        let given = option_map([("colour", "red")]);
        let mut reader = OptionReader::new("Pinyin", &given);
        RomanisationOptions::read(&mut reader).unwrap();
        let err = reader.finish().unwrap_err();
        assert!(matches!(err, ReadingError::UnsupportedOption { ref name, .. } if name == "colour"));
    }

    #[test]
    fn test_bad_value_rejected() {
        let given = option_map([("case", "upper")]);
        let mut reader = OptionReader::new("Pinyin", &given);
        assert!(RomanisationOptions::read(&mut reader).is_err());

        let given = option_map([("strictSegmentation", "yes")]);
        let mut reader = OptionReader::new("Pinyin", &given);
        assert!(reader.bool("strictSegmentation", false).is_err());
    }

    #[test]
    fn test_choice_among_subset() {
        let given = option_map([("missingToneMark", "fifth")]);
        let mut reader = OptionReader::new("Jyutping", &given);
        let err = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::NoInfo, MissingToneMark::Ignore],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_string_validation() {
        let given = option_map([("pinyinApostrophe", "")]);
        let mut reader = OptionReader::new("Pinyin", &given);
        assert!(reader.string("pinyinApostrophe", "'", |s| !s.is_empty()).is_err());
    }

    #[test]
    fn test_merged_prefers_override() {
        let base = option_map([("a", "1"), ("b", "2")]);
        let over = option_map([("b", "3")]);
        let m = merged(&base, &over);
        assert_eq!(m["a"], OptionValue::from("1"));
        assert_eq!(m["b"], OptionValue::from("3"));
    }

    #[test]
    fn test_option_value_serde_untagged() {
        let m: OptionMap = toml::from_str("erhua = \"ignore\"\nshortenedLetters = true").unwrap();
        assert_eq!(m["erhua"], OptionValue::from("ignore"));
        assert_eq!(m["shortenedLetters"], OptionValue::Bool(true));
    }
}
