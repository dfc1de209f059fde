//! Mainland Chinese Braille for Mandarin.
//!
//! A syllable is an initial cell, a final cell or both, optionally followed
//! by a tone cell. Neutral tone syllables carry no tone cell, so a syllable
//! without one reads as fifth tone.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::{compile, invalid_tone, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, EntityKind, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, MissingToneMark, OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::TableId;
use crate::unicode::is_braille;

/// Tone cells for tones one to four.
const TONE_MARKS: [char; 4] = ['⠁', '⠂', '⠄', '⠆'];

option_choice! {
    pub enum BrailleToneMarks {
        Braille => "braille",
        None => "none",
    }
}

pub struct MandarinBrailleOperator {
    options: OptionMap,
    tone_marks: BrailleToneMarks,
    tones: Vec<Option<Tone>>,
    initials: HashSet<String>,
    finals: HashSet<String>,
    plain: HashSet<String>,
    syllable: Regex,
}

fn cell_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new("[⠀-⣿]+|[^⠀-⣿]+").expect("static pattern"))
}

impl MandarinBrailleOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::MandarinBraille, given);
        let tone_marks = reader.choice("toneMarkType", BrailleToneMarks::Braille)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::Extended,
            &[MissingToneMark::Fifth, MissingToneMark::Extended],
        )?;
        let options = reader.finish()?;

        let mut tones: Vec<Option<Tone>> = (1..=5).map(|n| Some(Tone::Number(n))).collect();
        if missing_tone_mark == MissingToneMark::Extended || tone_marks == BrailleToneMarks::None {
            tones.push(None);
        }

        let cells = |table: TableId| -> HashSet<String> {
            ctx.tables
                .entities(table)
                .into_iter()
                .filter_map(|key| ctx.tables.entity_data(table, key)?.first().cloned())
                .collect()
        };
        let initials = cells(TableId::BrailleInitials);
        let finals = cells(TableId::BrailleFinals);

        let mut plain: HashSet<String> = initials.iter().chain(&finals).cloned().collect();
        for initial in &initials {
            for final_ in &finals {
                plain.insert(format!("{initial}{final_}"));
            }
        }

        let class = |set: &HashSet<String>| {
            let mut chars: Vec<&str> = set.iter().map(String::as_str).collect();
            chars.sort_unstable();
            regex::escape(&chars.concat())
        };
        let marks: String = TONE_MARKS.iter().collect();
        let syllable = compile(&format!(
            "(?:[{i}][{f}]?|[{f}])[{m}]?",
            i = class(&initials),
            f = class(&finals),
            m = regex::escape(&marks),
        ))?;

        Ok(Self {
            options,
            tone_marks,
            tones,
            initials,
            finals,
            plain,
            syllable,
        })
    }

    pub fn tone_mark_type(&self) -> BrailleToneMarks {
        self.tone_marks
    }

    /// Initial and final cell of a plain syllable. A lone cell is a final if
    /// it is one, otherwise an initial.
    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        let mut chars = plain.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(c), None, None) if self.finals.contains(plain) => Ok((String::new(), c.to_string())),
            (Some(c), None, None) => Ok((c.to_string(), String::new())),
            (Some(i), Some(f), None) => Ok((i.to_string(), f.to_string())),
            _ => Err(ReadingError::InvalidEntity(format!("invalid plain entity given with '{plain}'"))),
        }
    }

    /// Put a space between adjacent syllables, as written in running text.
    pub fn space_separated_entities(&self, entities: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(entities.len());
        let mut last_braille = false;
        for entity in entities {
            let braille = entity.chars().next().is_some_and(is_braille);
            if last_braille && braille {
                out.push(" ".to_string());
            }
            out.push(entity.clone());
            last_braille = braille;
        }
        out
    }

    fn push_runs(&self, text: &str, parts: &mut Vec<(String, EntityKind)>) {
        for run in cell_runs().find_iter(text) {
            let kind = if self.is_reading_entity(run.as_str()) {
                EntityKind::Reading
            } else {
                EntityKind::Other
            };
            parts.push((run.as_str().to_string(), kind));
        }
    }
}

impl ReadingOperator for MandarinBrailleOperator {
    fn reading(&self) -> Reading {
        Reading::MandarinBraille
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    fn decompose(&self, text: &str) -> Result<Decomposition> {
        let mut parts = Vec::new();
        let mut last = 0;
        for m in self.syllable.find_iter(text) {
            self.push_runs(&text[last..m.start()], &mut parts);
            parts.push((m.as_str().to_string(), EntityKind::Reading));
            last = m.end();
        }
        self.push_runs(&text[last..], &mut parts);
        trace!(entities = parts.len(), "split Braille text");
        Ok(Decomposition::from_parts(parts, true))
    }

    fn compose(&self, entities: &[String]) -> Result<String> {
        Ok(entities.concat())
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        let Ok((plain, _)) = self.split_entity_tone(entity) else {
            return false;
        };
        if plain.is_empty() {
            return false;
        }
        match self.onset_rhyme(&plain) {
            Ok((initial, final_)) => {
                (final_.is_empty() || self.finals.contains(&final_))
                    && (initial.is_empty() || self.initials.contains(&initial))
            }
            Err(_) => false,
        }
    }
}

impl TonalOperator for MandarinBrailleOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        let mark = match (self.tone_marks, tone) {
            (BrailleToneMarks::Braille, Some(Tone::Number(n @ 1..=4))) => TONE_MARKS.get(usize::from(n) - 1),
            _ => None,
        };
        let mut entity = plain.to_string();
        entity.extend(mark);
        Ok(entity)
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        if self.tone_marks == BrailleToneMarks::None {
            return Ok((entity.to_string(), None));
        }
        let last = entity.chars().last();
        match last.and_then(|c| TONE_MARKS.iter().position(|m| *m == c)) {
            Some(i) => {
                let plain = &entity[..entity.len() - TONE_MARKS[i].len_utf8()];
                Ok((plain.to_string(), Some(Tone::Number(i as u8 + 1))))
            }
            None => Ok((entity.to_string(), Some(Tone::Number(5)))),
        }
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }
}
