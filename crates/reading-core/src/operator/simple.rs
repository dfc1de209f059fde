//! Scripts whose entities are single characters: Hangul and the kana.

use super::ReadingOperator;
use crate::entity::{Decomposition, EntityKind};
use crate::error::{ReadingError, Result};
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::unicode::{is_hangul, is_hiragana, is_katakana};

pub struct SimpleEntityOperator {
    reading: Reading,
    options: OptionMap,
    is_entity_char: fn(char) -> bool,
}

fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

impl SimpleEntityOperator {
    pub fn new(reading: Reading, given: &OptionMap) -> Result<Self> {
        let is_entity_char: fn(char) -> bool = match reading {
            Reading::Hangul => is_hangul,
            Reading::Hiragana => is_hiragana,
            Reading::Katakana => is_katakana,
            Reading::Kana => is_kana,
            other => {
                return Err(ReadingError::Unsupported(format!(
                    "{other} is not a single character script"
                )))
            }
        };
        let options = OptionReader::new(reading, given).finish()?;
        Ok(Self {
            reading,
            options,
            is_entity_char,
        })
    }
}

impl ReadingOperator for SimpleEntityOperator {
    fn reading(&self) -> Reading {
        self.reading
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    /// Every script character is its own entity; anything in between is
    /// kept together.
    fn decompose(&self, text: &str) -> Result<Decomposition> {
        let mut parts: Vec<(String, EntityKind)> = Vec::new();
        for c in text.chars() {
            if (self.is_entity_char)(c) {
                parts.push((c.to_string(), EntityKind::Reading));
            } else if let Some((run, EntityKind::Other)) = parts.last_mut() {
                run.push(c);
            } else {
                parts.push((c.to_string(), EntityKind::Other));
            }
        }
        Ok(Decomposition::from_parts(parts, true))
    }

    fn compose(&self, entities: &[String]) -> Result<String> {
        Ok(entities.concat())
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        let mut chars = entity.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if (self.is_entity_char)(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangul_entities() {
        let op = SimpleEntityOperator::new(Reading::Hangul, &OptionMap::new()).unwrap();
        let d = op.decompose("한국어, 좋아").unwrap();
        assert_eq!(d.texts(), vec!["한", "국", "어", ", ", "좋", "아"]);
        assert!(d.strict);
    }

    #[test]
    fn test_kana_covers_both_syllabaries() {
        let op = SimpleEntityOperator::new(Reading::Kana, &OptionMap::new()).unwrap();
        assert!(op.is_reading_entity("か"));
        assert!(op.is_reading_entity("カ"));
        assert!(!op.is_reading_entity("かな"));
        let hiragana = SimpleEntityOperator::new(Reading::Hiragana, &OptionMap::new()).unwrap();
        assert!(!hiragana.is_reading_entity("カ"));
    }

    #[test]
    fn test_rejects_non_script_reading() {
        assert!(SimpleEntityOperator::new(Reading::Pinyin, &OptionMap::new()).is_err());
    }
}
