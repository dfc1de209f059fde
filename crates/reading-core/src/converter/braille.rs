//! Pinyin to and from Mainland Chinese Braille.
//!
//! Braille writes a syllable as initial and final cell, so the conversion
//! splits Pinyin syllables into initial and final and maps both. Several
//! Pinyin initials and finals share a cell; the reverse direction keeps the
//! combinations that form a Pinyin syllable and reports the rest as
//! ambiguous. Punctuation outside syllables is mapped as well.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;

use super::{
    compile_alternatives, converter_name, not_supported, render, split, variant, ConversionPolicy,
    ConverterKind, DialectSupport, Endpoints, OperatorSource, ReadingConverter, Segment,
};
use crate::error::{ReadingError, Result};
use crate::operator::{MandarinBrailleOperator, Operator, PinyinOperator, ReadingOperator, TonalOperator};
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::{EntityTable, TableId};

/// Syllables written with the initial cell alone.
const INITIAL_ONLY: [&str; 7] = ["zi", "ci", "si", "zhi", "chi", "shi", "ri"];

fn scalar_rows(tables: &dyn EntityTable, table: TableId) -> BTreeMap<String, String> {
    tables
        .entities(table)
        .into_iter()
        .filter_map(|key| Some((key.to_string(), tables.entity_data(table, key)?.first()?.clone())))
        .collect()
}

fn invert(map: &BTreeMap<String, String>) -> HashMap<String, BTreeSet<String>> {
    let mut out: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (pinyin, cell) in map {
        out.entry(cell.clone()).or_default().insert(pinyin.clone());
    }
    out
}

/// Cells to punctuation. ASCII punctuation is preferred over full width
/// forms; cells shared by two ASCII signs map to `None`.
fn reverse_punctuation(punctuation: &BTreeMap<String, String>) -> HashMap<String, Option<String>> {
    let mut out: HashMap<String, Option<String>> = HashMap::new();
    for (sign, cells) in punctuation {
        match out.get_mut(cells) {
            None => {
                out.insert(cells.clone(), Some(sign.clone()));
            }
            Some(slot) => {
                let current_ascii = slot.as_deref().is_some_and(|s| s.is_ascii());
                match (current_ascii, sign.is_ascii()) {
                    (false, true) => *slot = Some(sign.clone()),
                    (true, false) => {}
                    _ => *slot = None,
                }
            }
        }
    }
    out
}

pub struct PinyinBrailleConverter {
    ends: Endpoints,
    options: OptionMap,
    dialects: DialectSupport,
    initials: BTreeMap<String, String>,
    finals: BTreeMap<String, String>,
    braille_initials: HashMap<String, BTreeSet<String>>,
    braille_finals: HashMap<String, BTreeSet<String>>,
    /// Pinyin syllable by (initial, final).
    syllables: HashMap<(String, String), String>,
    punctuation: BTreeMap<String, String>,
    braille_punctuation: HashMap<String, Option<String>>,
    punctuation_pattern: Regex,
}

impl PinyinBrailleConverter {
    pub fn new(ends: Endpoints, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(ends.from_reading(), ends.to_reading()), given);
        let policy = ConversionPolicy::read(&mut reader)?;
        let options = reader.finish()?;
        let dialects = DialectSupport::new(ConverterKind::PinyinBraille, &ends, policy, env)?;
        let tables = env.tables();
        let tables = tables.as_ref();

        let initials = scalar_rows(tables, TableId::BrailleInitials);
        let finals = scalar_rows(tables, TableId::BrailleFinals);
        let mut braille_initials = invert(&initials);
        braille_initials.insert(String::new(), BTreeSet::from([String::new()]));
        let mut braille_finals = invert(&finals);

        let mut syllables = HashMap::new();
        for syllable in tables.entities(TableId::PinyinSyllables) {
            if let Some([initial, final_]) = tables.entity_data(TableId::PinyinSyllables, syllable) {
                syllables.insert((initial.clone(), final_.clone()), syllable.to_string());
                if INITIAL_ONLY.contains(&syllable) {
                    braille_finals.entry(String::new()).or_default().insert(final_.clone());
                }
            }
        }

        let punctuation = scalar_rows(tables, TableId::BraillePunctuation);
        let braille_punctuation = reverse_punctuation(&punctuation);
        let punctuation_pattern = compile_alternatives(braille_punctuation.keys())?;
        Ok(Self {
            ends,
            options,
            dialects,
            initials,
            finals,
            braille_initials,
            braille_finals,
            syllables,
            punctuation,
            braille_punctuation,
            punctuation_pattern,
        })
    }

    fn to_braille(&self, pinyin: &PinyinOperator, entity: &str) -> Result<String> {
        let (plain, tone) = split(&self.dialects.source_default, entity)?;
        let (initial, final_) = pinyin.onset_rhyme(&plain).map_err(ReadingError::into_conversion)?;
        let initial_cell = self.initials.get(&initial).map(String::as_str);
        let cells = if INITIAL_ONLY.contains(&plain.to_lowercase().as_str()) {
            initial_cell.map(str::to_string)
        } else {
            let initial_cell = if initial.is_empty() { Some("") } else { initial_cell };
            initial_cell.zip(self.finals.get(&final_)).map(|(i, f)| format!("{i}{f}"))
        };
        let cells = cells.ok_or_else(|| not_supported(&plain))?;
        render(&self.ends.target, &cells, tone)
    }

    fn from_braille(&self, braille: &MandarinBrailleOperator, entity: &str) -> Result<String> {
        let (plain, tone) = braille.split_entity_tone(entity)?;
        let (initial, final_) = braille.onset_rhyme(&plain)?;
        let empty = BTreeSet::new();
        let initials = self.braille_initials.get(&initial).unwrap_or(&empty);
        let finals = self.braille_finals.get(&final_).unwrap_or(&empty);

        let mut forms: BTreeSet<&str> = BTreeSet::new();
        for i in initials {
            for f in finals {
                if let Some(syllable) = self.syllables.get(&(i.clone(), f.clone())) {
                    forms.insert(syllable.as_str());
                }
            }
        }
        let target = &self.dialects.target_default;
        if forms.len() > 1 {
            let tonal = target.tonal()?;
            forms.retain(|form| tonal.is_plain_reading_entity(form));
        }
        let form = self
            .dialects
            .policy
            .choose(&plain, forms.into_iter().map(str::to_string).collect())?;
        render(target, &form, tone)
    }

    /// Punctuation and other characters between Pinyin syllables.
    fn punctuation_to_braille(&self, text: &str) -> Vec<String> {
        text.chars()
            .map(|c| {
                let c = c.to_string();
                self.punctuation.get(&c).cloned().unwrap_or(c)
            })
            .collect()
    }

    fn punctuation_from_braille(&self, text: &str) -> Result<Vec<String>> {
        self.punctuation_pattern
            .find_iter(text)
            .map(|m| match self.braille_punctuation.get(m.as_str()) {
                Some(Some(sign)) => Ok(sign.clone()),
                Some(None) => Err(ReadingError::AmbiguousConversion(format!(
                    "conversion for punctuation '{}' is ambiguous",
                    m.as_str()
                ))),
                None => Ok(m.as_str().to_string()),
            })
            .collect()
    }
}

impl ReadingConverter for PinyinBrailleConverter {
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
        let to_braille = self.ends.from_reading() == Reading::Pinyin;
        self.dialects.convert(&self.ends.source, entities, |sequence| {
            let mut marked = Vec::with_capacity(sequence.len());
            for segment in sequence {
                match segment {
                    Segment::Other(text) if to_braille => {
                        marked.extend(self.punctuation_to_braille(&text).into_iter().map(Segment::Other));
                    }
                    Segment::Other(text) => {
                        marked.extend(self.punctuation_from_braille(&text)?.into_iter().map(Segment::Other));
                    }
                    run => marked.push(run),
                }
            }

            // Entities left unconverted come out as `Other` and skip punctuation.
            if to_braille {
                let pinyin = variant(&self.dialects.source_default, Operator::as_pinyin)?;
                self.dialects
                    .romanisation_step(marked, |e| self.to_braille(pinyin, e))
            } else {
                let braille = variant(&self.ends.source, Operator::as_braille)?;
                self.dialects.entity_step(
                    marked,
                    |e| braille.is_reading_entity(e),
                    |e| self.from_braille(braille, e),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_punctuation_prefers_ascii() {
        let punctuation: BTreeMap<String, String> = [("，", "⠐"), (",", "⠐"), ("。", "⠐⠆"), ("[", "⠰⠆"), ("]", "⠰⠆")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        let reverse = reverse_punctuation(&punctuation);
        assert_eq!(reverse["⠐"], Some(",".to_string()));
        assert_eq!(reverse["⠐⠆"], Some("。".to_string()));
        assert_eq!(reverse["⠰⠆"], None);
    }
}
