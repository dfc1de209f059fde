//! Jyutping, the LSHK romanisation of Cantonese.

use std::collections::{HashMap, HashSet};

use super::romanisation::{self, fused_entity, undelimitable, Romanisation, RomanisationOperator};
use super::{compile, invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, MissingToneMark, OptionMap, OptionReader, RomanisationOptions};
use crate::reading::Reading;
use crate::table::TableId;

option_choice! {
    pub enum JyutpingToneMarks {
        Numbers => "numbers",
        None => "none",
    }
}

/// Tones a syllable with a stop coda (`-p`, `-t`, `-k`) can carry.
const STOP_TONES: [Option<Tone>; 4] = [
    Some(Tone::Number(1)),
    Some(Tone::Number(3)),
    Some(Tone::Number(6)),
    None,
];

pub struct JyutpingOperator {
    options: OptionMap,
    romanisation: Romanisation,
    tone_marks: JyutpingToneMarks,
    missing_tone_mark: MissingToneMark,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    syllables: HashMap<String, (String, String)>,
}

impl JyutpingOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::Jyutping, given);
        let rom = RomanisationOptions::read(&mut reader)?;
        let tone_marks = reader.choice("toneMarkType", JyutpingToneMarks::Numbers)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::NoInfo, MissingToneMark::Ignore],
        )?;
        let options = reader.finish()?;

        let mut tones: Vec<Option<Tone>> = (1..=6).map(|n| Some(Tone::Number(n))).collect();
        if missing_tone_mark != MissingToneMark::Ignore || tone_marks == JyutpingToneMarks::None {
            tones.push(None);
        }

        let syllables: HashMap<String, (String, String)> = ctx
            .tables
            .entities(TableId::JyutpingSyllables)
            .into_iter()
            .filter_map(|s| match ctx.tables.entity_data(TableId::JyutpingSyllables, s)? {
                [initial, final_] => Some((s.to_string(), (initial.clone(), final_.clone()))),
                _ => None,
            })
            .collect();
        let plain = syllables.keys().cloned().collect();

        let run = compile("([A-Za-z]+[123456]?)")?;
        let romanisation = Romanisation::new(rom, ctx.best_effort, run, Vec::<String>::new());
        let mut op = Self {
            options,
            romanisation,
            tone_marks,
            missing_tone_mark,
            tones,
            plain,
            syllables,
        };
        let entities = super::tonal_reading_entities(&op);
        op.romanisation.set_reading_entities(entities);
        Ok(op)
    }

    pub fn tone_mark_type(&self) -> JyutpingToneMarks {
        self.tone_marks
    }

    /// Initial and final of a plain syllable.
    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        self.syllables
            .get(&plain.to_lowercase())
            .cloned()
            .ok_or_else(|| ReadingError::InvalidEntity(format!("'{plain}' not a valid plain Jyutping syllable")))
    }

    /// Whether the final ends in an unreleased stop.
    pub fn has_stop_tone(&self, plain: &str) -> Result<bool> {
        let (_, final_) = self.onset_rhyme(plain)?;
        Ok(final_.ends_with(['p', 't', 'k']))
    }

    fn check_tone(&self, plain: &str, tone: Option<Tone>) -> Result<()> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        if self.has_stop_tone(plain)? && !STOP_TONES.contains(&tone) {
            return Err(ReadingError::InvalidEntity(format!(
                "syllable '{plain}' can not occur with tone '{}'",
                crate::entity::tone_label(tone)
            )));
        }
        Ok(())
    }
}

impl ReadingOperator for JyutpingOperator {
    fn reading(&self) -> Reading {
        Reading::Jyutping
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    fn decompose(&self, text: &str) -> Result<Decomposition> {
        romanisation::decompose(self, text)
    }

    fn decompositions(&self, text: &str) -> Result<Vec<Decomposition>> {
        romanisation::decompositions(self, text)
    }

    fn compose(&self, entities: &[String]) -> Result<String> {
        let is_reading_char = |c: char| c.is_ascii_lowercase() || ('1'..='6').contains(&c);
        let mut preceding: Option<&str> = None;
        for entity in entities {
            if let Some(prev) = preceding.filter(|p| !p.is_empty() && !entity.is_empty()) {
                if let Some(offending) = fused_entity(self, prev, entity, is_reading_char, "12345") {
                    return Err(undelimitable(offending));
                }
            }
            preceding = Some(entity);
        }
        Ok(entities.concat())
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        tonal_is_reading_entity(self, entity)
    }
}

impl TonalOperator for JyutpingOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        self.check_tone(plain, tone)?;
        match tone {
            Some(Tone::Number(n)) if self.tone_marks == JyutpingToneMarks::Numbers => Ok(format!("{plain}{n}")),
            _ => Ok(plain.to_string()),
        }
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        if self.tone_marks == JyutpingToneMarks::None {
            return Ok((entity.to_string(), None));
        }
        let digit = entity
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .filter(|d| (1..=6).contains(d));
        match digit {
            Some(d) => {
                let plain = &entity[..entity.len() - 1];
                let tone = Some(Tone::Number(d as u8));
                self.check_tone(plain, tone)?;
                Ok((plain.to_string(), tone))
            }
            None if self.missing_tone_mark == MissingToneMark::Ignore => Err(ReadingError::InvalidEntity(
                format!("no tone information given for '{entity}'"),
            )),
            None => Ok((entity.to_string(), None)),
        }
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.plain.contains(&entity.to_lowercase())
    }
}

impl RomanisationOperator for JyutpingOperator {
    fn romanisation(&self) -> &Romanisation {
        &self.romanisation
    }
}
