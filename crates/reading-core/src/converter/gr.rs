//! Gwoyeu Romatzyh: conversion between GR dialects, and between GR and
//! Pinyin.
//!
//! GR writes tone in the spelling of the syllable, so the mapping to Pinyin
//! goes through the plain syllable table and carries tones by number. Erlhuah
//! forms of GR and rhotacised Pinyin syllables are mapped onto each other.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::trace;

use super::{
    converter_name, not_supported, render, split, variant, ConversionPolicy, ConverterKind,
    DialectSupport, Endpoints, OperatorSource, ReadingConverter, TieBreak,
};
use crate::entity::{tone_label, Tone};
use crate::error::{ReadingError, Result};
use crate::operator::{
    gr_tone, tone_class, GrOperator, Operator, ReadingOperator, RomanisationOperator, TonalOperator,
    ToneClass,
};
use crate::options::{option_choice, Case, OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::{EntityTable, TableId};
use crate::unicode::{is_title, is_upper, to_title};

option_choice! {
    /// Whether abbreviated spellings and repetition markers are written out.
    pub enum BreakUpAbbreviated {
        On => "on",
        Auto => "auto",
        Off => "off",
    }
}

option_choice! {
    /// Pinyin tone for GR optional neutral tones.
    pub enum OptionalNeutralToneMapping {
        Original => "original",
        Neutral => "neutral",
    }
}

pub struct GrDialectConverter {
    ends: Endpoints,
    options: OptionMap,
    keep_apostrophes: bool,
    break_up: bool,
    abbreviated: HashSet<Vec<String>>,
    longest_form: usize,
}

impl GrDialectConverter {
    pub fn new(ends: Endpoints, given: &OptionMap) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(Reading::Gr, Reading::Gr), given);
        let keep_apostrophes = reader.bool("keepGRApostrophes", false)?;
        let break_up = reader.choice("breakUpAbbreviated", BreakUpAbbreviated::Auto)?;
        let options = reader.finish()?;

        let from = variant(&ends.source, Operator::as_gr)?;
        let to = variant(&ends.target, Operator::as_gr)?;
        let break_up = break_up == BreakUpAbbreviated::On
            || (break_up == BreakUpAbbreviated::Auto && !to.abbreviations_enabled());
        let abbreviated: HashSet<Vec<String>> = from.abbreviated_forms().map(<[String]>::to_vec).collect();
        let longest_form = abbreviated.iter().map(Vec::len).max().unwrap_or(0);
        Ok(Self {
            ends,
            options,
            keep_apostrophes,
            break_up,
            abbreviated,
            longest_form,
        })
    }

    /// Replace the repetition markers `x` (repeat the last syllable) and `v`
    /// (repeat the second last) by the syllables they stand for. A `vx`
    /// pair repeats everything between the two targets.
    fn expand_repetitions(&self, gr: &GrOperator, entities: &[String]) -> Result<Vec<String>> {
        let marker = gr.neutral_tone_marker();
        let repeat_last = ["x".to_string(), ".x".to_string(), format!("{marker}x")];
        let repeat_second_last = ["v".to_string(), ".v".to_string(), format!("{marker}v")];
        let is_marker = |e: &str| repeat_last.iter().chain(&repeat_second_last).any(|m| m == e);

        let find = |start: Option<usize>| -> Option<usize> {
            let mut idx = start?;
            loop {
                if gr.is_reading_entity(&entities[idx]) {
                    return Some(idx);
                }
                idx = idx.checked_sub(1)?;
            }
        };
        let repeated = |marker_entity: &str, target: &str| -> Result<String> {
            if is_marker(target) {
                return Err(ReadingError::Conversion(
                    "cluster of more than two repetition markers not supported".to_string(),
                ));
            }
            let (plain, tone) = gr.split_entity_tone(target).map_err(|e| {
                ReadingError::Conversion(format!("unable to repeat '{target}': {e}"))
            })?;
            let tone = tone.ok_or_else(|| not_supported(target))?;
            let tone = if marker_entity.starts_with('.') {
                gr_tone(gr.base_tone(tone)?, ToneClass::Etymological)
            } else if marker_entity.starts_with(marker) {
                gr_tone(gr.base_tone(tone)?, ToneClass::Optional)
            } else {
                Some(tone)
            };
            gr.tonal_entity(&plain, tone).map_err(ReadingError::into_conversion)
        };
        let missing = |m: &str, idx: usize| {
            ReadingError::Conversion(format!("no target syllable for repetition marker '{m}' at {idx}"))
        };

        let mut out = Vec::with_capacity(entities.len());
        for idx in (0..entities.len()).rev() {
            let entity = &entities[idx];
            if repeat_last.contains(entity) {
                let mut target = find(idx.checked_sub(1)).ok_or_else(|| missing(entity, idx))?;
                let mut v_marker = None;
                if repeat_second_last.contains(&entities[target]) {
                    v_marker = Some(target);
                    target = find(target.checked_sub(1)).ok_or_else(|| missing("vx", idx))?;
                }
                out.push(repeated(entity, &entities[target])?);
                if v_marker.is_some_and(|v| v + 1 == idx) {
                    let lower = find(target.checked_sub(1)).map_or(0, |t| t + 1);
                    out.extend(entities[lower..target].iter().rev().cloned());
                }
            } else if repeat_second_last.contains(entity) {
                let target = find(idx.checked_sub(1))
                    .and_then(|last| find(last.checked_sub(1)))
                    .ok_or_else(|| missing(entity, idx))?;
                out.push(repeated(entity, &entities[target])?);
            } else {
                out.push(entity.clone());
            }
        }
        out.reverse();
        Ok(out)
    }

    /// Write abbreviated spellings out in full, longest match first.
    fn expand_abbreviations(&self, gr: &GrOperator, entities: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(entities.len());
        let mut i = 0;
        'entities: while i < entities.len() {
            let longest = self.longest_form.min(entities.len() - i);
            for count in (1..=longest).rev() {
                let original = &entities[i..i + count];
                let key: Vec<String> = original.iter().map(|e| e.to_lowercase()).collect();
                if !self.abbreviated.contains(&key) {
                    continue;
                }
                let full: BTreeSet<&Vec<String>> = gr
                    .abbreviated_form_data(&key)?
                    .iter()
                    .filter(|form| !form.has_flag('F') && !form.has_flag('I'))
                    .map(|form| &form.full)
                    .collect();
                if full.len() > 1 {
                    let forms: Vec<String> = full.iter().map(|f| f.join(" ")).collect();
                    return Err(ReadingError::AmbiguousConversion(format!(
                        "conversion for entities '{}' is ambiguous: {}",
                        key.join(" "),
                        forms.join(", ")
                    )));
                }
                let Some(full) = full.into_iter().next() else {
                    continue;
                };
                let mut expanded = full.clone();
                let joined = original.concat();
                if is_upper(&joined) {
                    expanded = expanded.iter().map(|e| e.to_uppercase()).collect();
                } else if is_title(&joined) {
                    if let Some(first) = expanded.first_mut() {
                        *first = to_title(first);
                    }
                }
                trace!(from = %joined, to = ?expanded, "expanded abbreviation");
                out.extend(expanded);
                i += count;
                continue 'entities;
            }
            out.push(entities[i].clone());
            i += 1;
        }
        Ok(out)
    }
}

impl ReadingConverter for GrDialectConverter {
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
        let from = variant(&self.ends.source, Operator::as_gr)?;
        let to = variant(&self.ends.target, Operator::as_gr)?;

        let mut entities = entities.to_vec();
        if self.break_up {
            entities = self.expand_repetitions(from, &entities)?;
            entities = self.expand_abbreviations(from, &entities)?;
        }

        if !self.keep_apostrophes {
            entities = from.remove_apostrophes(&entities);
        } else if from.separator() != to.separator() {
            for entity in &mut entities {
                if entity == from.separator() {
                    *entity = to.separator().to_string();
                }
            }
        }

        if to.romanisation().case() == Case::Lower {
            for entity in &mut entities {
                *entity = entity.to_lowercase();
            }
        }

        if from.rhotacised_apostrophe() != to.rhotacised_apostrophe() {
            for entity in &mut entities {
                *entity = entity.replace(from.rhotacised_apostrophe(), to.rhotacised_apostrophe());
            }
        }

        let (from_marker, to_marker) = (from.neutral_tone_marker(), to.neutral_tone_marker());
        if from_marker != to_marker {
            for entity in &mut entities {
                if entity.starts_with(from_marker) && from.is_reading_entity(entity) {
                    *entity = entity.replacen(from_marker, &to_marker.to_string(), 1);
                }
            }
        }
        Ok(entities)
    }
}

/// Maps syllables through the GR syllable table, keyed by Pinyin.
pub struct GrPinyinConverter {
    ends: Endpoints,
    options: OptionMap,
    neutral_optional: bool,
    dialects: DialectSupport,
    tables: Arc<dyn EntityTable>,
}

impl GrPinyinConverter {
    pub fn new(ends: Endpoints, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(ends.from_reading(), ends.to_reading()), given);
        let mapping = reader.choice("grOptionalNeutralToneMapping", OptionalNeutralToneMapping::Original)?;
        let policy = ConversionPolicy::read(&mut reader)?;
        let options = reader.finish()?;
        let dialects = DialectSupport::new(ConverterKind::GrPinyin, &ends, policy, env)?;
        Ok(Self {
            ends,
            options,
            neutral_optional: mapping == OptionalNeutralToneMapping::Neutral,
            dialects,
            tables: env.tables(),
        })
    }

    /// Pinyin tone number of a GR tone.
    fn pinyin_tone(&self, tone: Tone) -> Result<Tone> {
        if self.neutral_optional && tone_class(tone) == Some(ToneClass::Optional) {
            return Ok(Tone::Number(5));
        }
        tone.name()
            .and_then(|name| name.chars().next())
            .and_then(|c| c.to_digit(10))
            .map(|d| Tone::Number(d as u8))
            .ok_or_else(|| ReadingError::Conversion(format!("invalid GR tone '{tone}'")))
    }

    fn full_gr_tone(&self, plain: &str, tone: Option<Tone>) -> Result<Tone> {
        match tone.and_then(Tone::number) {
            Some(n @ 1..=4) => gr_tone(n, ToneClass::Full),
            _ => None,
        }
        .ok_or_else(|| {
            ReadingError::AmbiguousConversion(format!(
                "conversion for entity '{plain}' with tone '{}' is ambiguous",
                tone_label(tone)
            ))
        })
    }

    fn convert_basic(&self, entity: &str) -> Result<String> {
        let source = &self.dialects.source_default;
        let mut erlhuah = false;
        let (plain, tone) = match source.as_gr() {
            Some(gr) if gr.is_rhotacised_reading_entity(entity) => {
                let bases = gr.base_entities_for_rhotacised(entity)?;
                if bases.len() > 1 && self.dialects.policy.tie_break == TieBreak::None {
                    return Err(ReadingError::AmbiguousConversion(format!(
                        "conversion for entity '{entity}' is ambiguous (Erlhuah)"
                    )));
                }
                let (plain, tone) = bases.into_iter().next().ok_or_else(|| not_supported(entity))?;
                erlhuah = true;
                (plain, Some(tone))
            }
            _ => split(source, entity)?,
        };

        let (converted, tone) = if self.ends.from_reading() == Reading::Gr {
            let candidates = self
                .tables
                .mapping(TableId::GrSyllables, 0, &plain)
                .iter()
                .map(|s| s.to_string())
                .collect();
            let pinyin = self.dialects.policy.choose(&plain, candidates)?;
            let tone = tone.map(|t| self.pinyin_tone(t)).transpose()?;
            (pinyin, tone)
        } else {
            let mut plain = plain;
            if plain != "er" && plain.ends_with('r') {
                plain.pop();
                erlhuah = true;
            }
            let gr = self
                .tables
                .entity_data(TableId::GrSyllables, &plain)
                .and_then(|row| row.first())
                .cloned()
                .ok_or_else(|| not_supported(&plain))?;
            (gr, Some(self.full_gr_tone(&plain, tone)?))
        };

        let target = &self.dialects.target_default;
        match (target.as_gr(), tone) {
            (Some(gr), Some(tone)) if erlhuah => {
                gr.rhotacised_tonal_entity(&converted, tone).map_err(|e| match e {
                    ReadingError::Unsupported(msg) => ReadingError::Conversion(msg),
                    other => other.into_conversion(),
                })
            }
            (None, _) if erlhuah => render(target, &format!("{converted}r"), tone),
            _ => render(target, &converted, tone),
        }
    }
}

impl ReadingConverter for GrPinyinConverter {
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
        self.dialects.convert(&self.ends.source, entities, |sequence| {
            self.dialects
                .romanisation_step(sequence, |entity| self.convert_basic(entity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::option_map;
    use crate::testutil::{operator, strings};

    fn dialect(source: OptionMap, target: OptionMap) -> GrDialectConverter {
        let ends = Endpoints::new(
            Arc::new(operator(Reading::Gr, &source)),
            Arc::new(operator(Reading::Gr, &target)),
        );
        GrDialectConverter::new(ends, &OptionMap::new()).unwrap()
    }

    #[test]
    fn test_repetition_marker_repeats_last_syllable() {
        let conv = dialect(OptionMap::new(), option_map([("abbreviations", false)]));
        let out = conv.convert_entities(&strings(&["shie", "x"])).unwrap();
        assert_eq!(out, strings(&["shie", "shie"]));
    }

    #[test]
    fn test_marker_without_target_fails() {
        let conv = dialect(OptionMap::new(), option_map([("abbreviations", false)]));
        let err = conv.convert_entities(&strings(&["x"])).unwrap_err();
        assert!(matches!(err, ReadingError::Conversion(_)));
    }

    #[test]
    fn test_neutral_marker_replaced() {
        let conv = dialect(
            OptionMap::new(),
            option_map([("optionalNeutralToneMarker", "₀")]),
        );
        let source = conv.source();
        let entities = source.decompose("˳shie").unwrap().into_texts();
        let out = conv.convert_entities(&entities).unwrap();
        assert_eq!(out, strings(&["₀shie"]));
    }
}
