//! Conversion between Pinyin dialects.

use super::{converter_name, variant, Endpoints, ReadingConverter};
use crate::entity::Tone;
use crate::error::{ReadingError, Result};
use crate::operator::{Erhua, Operator, PinyinOperator, ReadingOperator, TonalOperator};
use crate::options::{option_choice, Case, OptionMap, OptionReader};
use crate::reading::Reading;
use crate::unicode::is_upper;

option_choice! {
    /// Whether rhotacised syllables are split into base syllable and `er`.
    pub enum BreakUpErhua {
        On => "on",
        Auto => "auto",
        Off => "off",
    }
}

/// Syllables that do not take a rhotacised suffix.
const NO_ERHUA: [&str; 9] = ["e", "er", "r", "n", "ng", "hng", "hm", "m", "ê"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErhuaStep {
    TwoSyllables,
    OneSyllable,
    Reject,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Syllable(String, Option<Tone>),
    Other(String),
}

pub struct PinyinDialectConverter {
    ends: Endpoints,
    options: OptionMap,
    keep_apostrophes: bool,
    /// Write a lone `r` syllable as `er`.
    spell_out_r: bool,
    erhua_step: ErhuaStep,
}

impl PinyinDialectConverter {
    pub fn new(ends: Endpoints, given: &OptionMap) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(Reading::Pinyin, Reading::Pinyin), given);
        let keep_apostrophes = reader.bool("keepPinyinApostrophes", false)?;
        let break_up = reader.choice("breakUpErhua", BreakUpErhua::Auto)?;
        let options = reader.finish()?;

        let from = variant(&ends.source, Operator::as_pinyin)?.erhua();
        let to = variant(&ends.target, Operator::as_pinyin)?.erhua();
        let spell_out_r =
            break_up == BreakUpErhua::On || (break_up == BreakUpErhua::Auto && to == Erhua::Ignore);
        let erhua_step = if spell_out_r || (to == Erhua::TwoSyllables && from == Erhua::OneSyllable) {
            ErhuaStep::TwoSyllables
        } else if to == Erhua::OneSyllable && from != Erhua::OneSyllable {
            ErhuaStep::OneSyllable
        } else if from != Erhua::Ignore && to == Erhua::Ignore {
            ErhuaStep::Reject
        } else {
            ErhuaStep::Keep
        };
        Ok(Self {
            ends,
            options,
            keep_apostrophes,
            spell_out_r,
            erhua_step,
        })
    }

    fn operators(&self) -> Result<(&PinyinOperator, &PinyinOperator)> {
        Ok((
            variant(&self.ends.source, Operator::as_pinyin)?,
            variant(&self.ends.target, Operator::as_pinyin)?,
        ))
    }
}

fn two_syllables(items: Vec<Item>) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Syllable(plain, tone) => {
                let lower = plain.to_lowercase();
                if lower.ends_with('r') && lower != "er" && lower != "r" {
                    let (base, r) = plain.split_at(plain.len() - 1);
                    out.push(Item::Syllable(base.to_string(), tone));
                    out.push(Item::Syllable(r.to_string(), Some(Tone::Number(5))));
                } else {
                    out.push(Item::Syllable(plain, tone));
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn one_syllable(items: Vec<Item>) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut last: Option<Item> = None;
    for item in items {
        match (last.take(), item) {
            (Some(Item::Syllable(base, tone)), Item::Syllable(plain, next_tone)) => {
                if plain.to_lowercase() == "r" && !NO_ERHUA.contains(&base.to_lowercase().as_str()) {
                    out.push(Item::Syllable(base + &plain, tone));
                } else {
                    out.push(Item::Syllable(base, tone));
                    last = Some(Item::Syllable(plain, next_tone));
                }
            }
            (previous, item) => {
                out.extend(previous);
                last = Some(item);
            }
        }
    }
    out.extend(last);
    out
}

fn reject_erhua(items: &[Item]) -> Result<()> {
    for item in items {
        if let Item::Syllable(plain, _) = item {
            if plain.ends_with('r') && plain != "er" {
                return Err(ReadingError::Conversion(format!(
                    "cannot convert Erhua form in syllable '{plain}'"
                )));
            }
        }
    }
    Ok(())
}

impl ReadingConverter for PinyinDialectConverter {
    fn source(&self) -> &Operator {
        &self.ends.source
    }

    fn target(&self) -> &Operator {
        &self.ends.target
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    fn convert_entities(&self, entities: &[String]) -> Result<Vec<String>> {
        let (from, to) = self.operators()?;
        let entities = if self.keep_apostrophes {
            entities.to_vec()
        } else {
            from.remove_apostrophes(entities)
        };

        let mut items = Vec::with_capacity(entities.len());
        for entity in entities {
            if from.is_reading_entity(&entity) {
                let (plain, tone) = from.split_entity_tone(&entity)?;
                items.push(Item::Syllable(plain, tone));
            } else {
                items.push(Item::Other(entity));
            }
        }
        let items = match self.erhua_step {
            ErhuaStep::TwoSyllables => two_syllables(items),
            ErhuaStep::OneSyllable => one_syllable(items),
            ErhuaStep::Reject => {
                reject_erhua(&items)?;
                items
            }
            ErhuaStep::Keep => items,
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Item::Syllable(plain, tone) => {
                    if !to.tones().contains(&tone) {
                        return Err(ReadingError::AmbiguousConversion(
                            "target reading does not support missing tone information".to_string(),
                        ));
                    }
                    let mut plain = from.convert_plain_entity(&plain, Some(to));
                    if self.spell_out_r && plain.to_lowercase() == "r" {
                        plain = if is_upper(&plain) { "ER" } else { "er" }.to_string();
                    }
                    if to.case() == Case::Lower {
                        plain = plain.to_lowercase();
                    }
                    out.push(
                        to.tonal_entity(&plain, tone)
                            .map_err(ReadingError::into_conversion)?,
                    );
                }
                Item::Other(entity) if entity == from.apostrophe() => {
                    out.push(to.apostrophe().to_string());
                }
                Item::Other(entity) => out.push(entity),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syllable(plain: &str, tone: u8) -> Item {
        Item::Syllable(plain.to_string(), Some(Tone::Number(tone)))
    }

    #[test]
    fn test_two_syllables_splits_suffix() {
        let items = two_syllables(vec![syllable("huar", 1), syllable("er", 2)]);
        assert_eq!(items, vec![syllable("hua", 1), syllable("r", 5), syllable("er", 2)]);
    }

    #[test]
    fn test_one_syllable_merges_suffix() {
        let items = one_syllable(vec![
            syllable("hua", 1),
            syllable("r", 5),
            Item::Other(" ".to_string()),
            syllable("e", 4),
            syllable("r", 5),
        ]);
        assert_eq!(
            items,
            vec![
                syllable("huar", 1),
                Item::Other(" ".to_string()),
                syllable("e", 4),
                syllable("r", 5),
            ]
        );
    }

    #[test]
    fn test_reject_erhua() {
        assert!(reject_erhua(&[syllable("er", 2), syllable("hua", 1)]).is_ok());
        let err = reject_erhua(&[syllable("huar", 1)]).unwrap_err();
        assert!(matches!(err, ReadingError::Conversion(_)));
    }
}
