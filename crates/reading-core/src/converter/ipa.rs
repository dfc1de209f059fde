//! Pinyin to Mandarin IPA.
//!
//! Syllables are looked up in the IPA table, keyed by Pinyin. Tone sandhi and
//! coarticulation are pluggable: a [`SandhiRule`] rewrites the tones of a run
//! of syllables after lookup, and a [`CoarticulationRule`] may replace the
//! lookup of a single syllable given its neighbours.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::{
    converter_name, map_runs, not_supported, render, split, variant, ConversionPolicy,
    ConverterKind, DialectSupport, Endpoints, OperatorSource, ReadingConverter, Segment,
};
use crate::entity::Tone;
use crate::error::Result;
use crate::operator::{IpaToneMarks, Operator, PinyinOperator, ReadingOperator};
use crate::options::{option_choice, OptionMap, OptionReader};
use crate::table::{EntityTable, TableId};

option_choice! {
    pub enum SandhiRuleName {
        LowThirdAndNeutralTone => "lowThirdAndNeutralTone",
        None => "none",
    }
}

option_choice! {
    pub enum CoarticulationRuleName {
        None => "none",
        FinalE => "finalE",
    }
}

/// An IPA syllable and the name of its tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpaSyllable {
    pub plain: String,
    pub tone: Option<&'static str>,
}

impl IpaSyllable {
    pub fn new(plain: impl Into<String>, tone: Option<&'static str>) -> Self {
        Self {
            plain: plain.into(),
            tone,
        }
    }
}

/// Rewrites the tones of consecutive syllables.
pub trait SandhiRule: Send + Sync {
    fn apply(&self, syllables: Vec<IpaSyllable>) -> Vec<IpaSyllable>;
}

/// A third tone followed by another syllable is realised low; a neutral
/// tone takes its pitch from the tone before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowThirdAndNeutralToneRule;

fn neutral_after(tone: &str) -> Option<&'static str> {
    Some(match tone {
        "1stTone" => "5thToneHalfLow",
        "2ndTone" => "5thToneMiddle",
        "3rdToneRegular" | "3rdToneLow" => "5thToneHalfHigh",
        "4thTone" => "5thToneLow",
        "5thTone" => "5thTone",
        "5thToneHalfHigh" => "5thToneHalfHigh",
        "5thToneMiddle" => "5thToneMiddle",
        "5thToneHalfLow" => "5thToneHalfLow",
        "5thToneLow" => "5thToneLow",
        _ => return None,
    })
}

impl SandhiRule for LowThirdAndNeutralToneRule {
    fn apply(&self, mut syllables: Vec<IpaSyllable>) -> Vec<IpaSyllable> {
        if syllables.len() <= 1 {
            return syllables;
        }
        let last = syllables.len() - 1;
        let mut previous: Option<&'static str> = None;
        for (idx, syllable) in syllables.iter_mut().enumerate() {
            let original = syllable.tone;
            match original {
                Some("5thTone") => {
                    if let Some(tone) = previous.and_then(neutral_after) {
                        syllable.tone = Some(tone);
                    }
                }
                Some("3rdToneRegular") if idx < last => syllable.tone = Some("3rdToneLow"),
                _ => {}
            }
            previous = original;
        }
        syllables
    }
}

/// What a coarticulation rule sees of a syllable's surroundings.
pub struct CoarticulationContext<'a> {
    pub pinyin: &'a PinyinOperator,
    /// Entities of the run before the syllable.
    pub left: &'a [String],
    /// Entities of the run after the syllable.
    pub right: &'a [String],
    fifth_tone: &'a HashMap<String, String>,
}

impl CoarticulationContext<'_> {
    /// IPA form of a Pinyin syllable in its reduced neutral tone form.
    pub fn fifth_tone_form(&self, plain: &str) -> Option<&str> {
        self.fifth_tone.get(plain).map(String::as_str)
    }
}

/// Replaces the table lookup for a single syllable.
pub trait CoarticulationRule: Send + Sync {
    /// `None` leaves the syllable to the table.
    fn apply(
        &self,
        ctx: &CoarticulationContext<'_>,
        plain: &str,
        tone: Option<Tone>,
    ) -> Result<Option<IpaSyllable>>;
}

/// Neutral tone syllables with the final `e` are reduced to a schwa.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalECoarticulation;

impl CoarticulationRule for FinalECoarticulation {
    fn apply(
        &self,
        ctx: &CoarticulationContext<'_>,
        plain: &str,
        tone: Option<Tone>,
    ) -> Result<Option<IpaSyllable>> {
        if tone != Some(Tone::Number(5)) {
            return Ok(None);
        }
        let (_, final_) = ctx.pinyin.onset_rhyme(plain)?;
        if final_ != "e" {
            return Ok(None);
        }
        let form = ctx.fifth_tone_form(&plain.to_lowercase()).ok_or_else(|| not_supported(plain))?;
        Ok(Some(IpaSyllable::new(form, Some("5thTone"))))
    }
}

fn ipa_tone(tone: Option<Tone>) -> Option<&'static str> {
    match tone?.number()? {
        1 => Some("1stTone"),
        2 => Some("2ndTone"),
        3 => Some("3rdToneRegular"),
        4 => Some("4thTone"),
        5 => Some("5thTone"),
        _ => None,
    }
}

fn joined_rows(tables: &dyn EntityTable, table: TableId) -> HashMap<String, String> {
    tables
        .entities(table)
        .into_iter()
        .filter_map(|pinyin| {
            let row = tables.entity_data(table, pinyin)?;
            Some((pinyin.to_string(), row.concat()))
        })
        .collect()
}

pub struct PinyinIpaConverter {
    ends: Endpoints,
    options: OptionMap,
    dialects: DialectSupport,
    syllables: HashMap<String, String>,
    fifth_tone: HashMap<String, String>,
    sandhi: Option<Arc<dyn SandhiRule>>,
    coarticulation: Option<Arc<dyn CoarticulationRule>>,
}

impl PinyinIpaConverter {
    pub fn new(ends: Endpoints, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(ends.from_reading(), ends.to_reading()), given);
        let sandhi = reader.choice("sandhiRule", SandhiRuleName::LowThirdAndNeutralTone)?;
        let coarticulation = reader.choice("coarticulationRule", CoarticulationRuleName::None)?;
        let policy = ConversionPolicy::read(&mut reader)?;
        let options = reader.finish()?;

        let dialects = DialectSupport::new(ConverterKind::PinyinIpa, &ends, policy, env)?;
        let tables = env.tables();
        Ok(Self {
            ends,
            options,
            dialects,
            syllables: joined_rows(tables.as_ref(), TableId::MandarinIpa),
            fifth_tone: joined_rows(tables.as_ref(), TableId::MandarinIpaFifthTone),
            sandhi: match sandhi {
                SandhiRuleName::LowThirdAndNeutralTone => Some(Arc::new(LowThirdAndNeutralToneRule)),
                SandhiRuleName::None => None,
            },
            coarticulation: match coarticulation {
                CoarticulationRuleName::FinalE => Some(Arc::new(FinalECoarticulation)),
                CoarticulationRuleName::None => None,
            },
        })
    }

    /// Replace the tone sandhi rule; `None` disables sandhi.
    pub fn with_sandhi_rule(mut self, rule: Option<Arc<dyn SandhiRule>>) -> Self {
        self.sandhi = rule;
        self
    }

    /// Replace the coarticulation rule; `None` uses the table for every
    /// syllable.
    pub fn with_coarticulation_rule(mut self, rule: Option<Arc<dyn CoarticulationRule>>) -> Self {
        self.coarticulation = rule;
        self
    }

    fn lookup(&self, plain: &str, tone: Option<Tone>) -> Result<IpaSyllable> {
        let ipa = self.syllables.get(&plain.to_lowercase()).ok_or_else(|| not_supported(plain))?;
        Ok(IpaSyllable::new(ipa.clone(), ipa_tone(tone)))
    }

    /// Cut syllables missing from the IPA table out of their run, so sandhi
    /// and coarticulation only see convertible neighbours.
    fn drop_unmapped(&self, segments: Vec<Segment>) -> Result<Vec<Segment>> {
        let source = &self.dialects.source_default;
        self.dialects.entity_step(
            segments,
            |entity| source.is_reading_entity(entity),
            |entity| {
                let (plain, _) = split(source, entity)?;
                if self.syllables.contains_key(&plain.to_lowercase()) {
                    Ok(entity.to_string())
                } else {
                    Err(not_supported(&plain))
                }
            },
        )
    }

    fn convert_run(&self, pinyin: &PinyinOperator, run: &[String]) -> Result<Vec<String>> {
        let source = &self.dialects.source_default;
        let mut syllables = Vec::with_capacity(run.len());
        for (idx, entity) in run.iter().enumerate() {
            if source.is_formatting_entity(entity) {
                continue;
            }
            let (plain, tone) = split(source, entity)?;
            let reduced = match &self.coarticulation {
                Some(rule) => {
                    let ctx = CoarticulationContext {
                        pinyin,
                        left: &run[..idx],
                        right: &run[idx + 1..],
                        fifth_tone: &self.fifth_tone,
                    };
                    rule.apply(&ctx, &plain, tone)?
                }
                None => None,
            };
            syllables.push(match reduced {
                Some(syllable) => syllable,
                None => self.lookup(&plain, tone)?,
            });
        }

        let target = &self.ends.target;
        let marked = variant(target, Operator::as_mandarin_ipa)?.tone_mark_type() != IpaToneMarks::None;
        if let Some(rule) = self.sandhi.as_ref().filter(|_| marked) {
            syllables = rule.apply(syllables);
        }
        trace!(syllables = syllables.len(), "mapped run to IPA");
        syllables
            .into_iter()
            .map(|s| render(target, &s.plain, s.tone.map(Tone::Named)))
            .collect()
    }
}

impl ReadingConverter for PinyinIpaConverter {
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
        let pinyin = variant(&self.dialects.source_default, Operator::as_pinyin)?;
        self.dialects.convert(&self.ends.source, entities, |sequence| {
            let sequence = self.drop_unmapped(sequence)?;
            map_runs(sequence, |run| self.convert_run(pinyin, run))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syllables(tones: &[&'static str]) -> Vec<IpaSyllable> {
        tones.iter().map(|t| IpaSyllable::new("a", Some(*t))).collect()
    }

    fn tones(syllables: &[IpaSyllable]) -> Vec<Option<&'static str>> {
        syllables.iter().map(|s| s.tone).collect()
    }

    #[test]
    fn test_single_syllable_unchanged() {
        let out = LowThirdAndNeutralToneRule.apply(syllables(&["3rdToneRegular"]));
        assert_eq!(tones(&out), vec![Some("3rdToneRegular")]);
    }

    #[test]
    fn test_low_third_before_other_syllable() {
        let out = LowThirdAndNeutralToneRule.apply(syllables(&["3rdToneRegular", "1stTone", "3rdToneRegular"]));
        assert_eq!(tones(&out), vec![Some("3rdToneLow"), Some("1stTone"), Some("3rdToneRegular")]);
    }

    #[test]
    fn test_neutral_tone_follows_preceding_tone() {
        let out = LowThirdAndNeutralToneRule.apply(syllables(&["1stTone", "5thTone", "4thTone", "5thTone"]));
        assert_eq!(
            tones(&out),
            vec![Some("1stTone"), Some("5thToneHalfLow"), Some("4thTone"), Some("5thToneLow")]
        );
        let out = LowThirdAndNeutralToneRule.apply(syllables(&["3rdToneRegular", "5thTone"]));
        assert_eq!(tones(&out), vec![Some("3rdToneLow"), Some("5thToneHalfHigh")]);
    }

    #[test]
    fn test_pinyin_tone_names() {
        assert_eq!(ipa_tone(Some(Tone::Number(3))), Some("3rdToneRegular"));
        assert_eq!(ipa_tone(None), None);
    }
}
