//! Machinery shared by the IPA readings.
//!
//! IPA entities are a plain syllable followed by a tone mark. Entities are
//! separated by `.` or whitespace, so decomposition is a plain split and
//! composition inserts `.` between adjacent syllables.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::ReadingOperator;
use crate::entity::{Decomposition, EntityKind, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, Choice, MissingToneMark, OptionMap, OptionReader};
use crate::unicode::{nfc, nfd};

option_choice! {
    pub enum IpaToneMarks {
        Numbers => "numbers",
        SuperscriptNumbers => "superscriptNumbers",
        ChaoDigits => "chaoDigits",
        SuperscriptChaoDigits => "superscriptChaoDigits",
        IpaToneBar => "ipaToneBar",
        Diacritics => "diacritics",
        None => "none",
    }
}

const SUPERSCRIPT_DIGITS: &str = "⁰¹²³⁴⁵⁶⁷⁸⁹";
const CHAO_DIGITS: &str = "12345";
const SUPERSCRIPT_CHAO_DIGITS: &str = "¹²³⁴⁵";
const TONE_BARS: &str = "˥˦˧˨˩꜈꜉꜊꜋꜌";
const DIACRITICS: &str = "\u{0300}\u{0301}\u{0302}\u{0303}\u{030C}";

/// Mark types checked when guessing, in order of preference on a tie.
const GUESS_ORDER: [IpaToneMarks; 6] = [
    IpaToneMarks::IpaToneBar,
    IpaToneMarks::Diacritics,
    IpaToneMarks::Numbers,
    IpaToneMarks::SuperscriptNumbers,
    IpaToneMarks::ChaoDigits,
    IpaToneMarks::SuperscriptChaoDigits,
];

/// Tone name to tone mark, per mark type.
pub(crate) type MarkTable = &'static [(&'static str, &'static str)];

/// Byte range of the tone mark in an NFD entity.
fn find_tone_mark(marks: IpaToneMarks, entity: &str) -> Option<Range<usize>> {
    let single = |set: &dyn Fn(char) -> bool| {
        let mut rev = entity.char_indices().rev();
        let (i, last) = rev.next()?;
        let preceded = rev.next().is_some_and(|(_, c)| set(c));
        (set(last) && !preceded).then(|| i..entity.len())
    };
    let trailing_run = |set: &str| {
        let start = entity
            .char_indices()
            .rev()
            .take_while(|(_, c)| set.contains(*c))
            .last()
            .map(|(i, _)| i)?;
        Some(start..entity.len())
    };
    match marks {
        IpaToneMarks::Numbers => single(&|c: char| c.is_ascii_digit()),
        IpaToneMarks::SuperscriptNumbers => single(&|c: char| SUPERSCRIPT_DIGITS.contains(c)),
        IpaToneMarks::ChaoDigits => trailing_run(CHAO_DIGITS),
        IpaToneMarks::SuperscriptChaoDigits => trailing_run(SUPERSCRIPT_CHAO_DIGITS),
        IpaToneMarks::IpaToneBar => trailing_run(TONE_BARS),
        IpaToneMarks::Diacritics => {
            let start = entity.find(|c| DIACRITICS.contains(c))?;
            let len: usize = entity[start..]
                .chars()
                .take_while(|c| DIACRITICS.contains(*c))
                .map(char::len_utf8)
                .sum();
            Some(start..start + len)
        }
        IpaToneMarks::None => None,
    }
}

/// Tone mark handling for one IPA operator.
#[derive(Debug)]
pub(crate) struct IpaMarks {
    marks: IpaToneMarks,
    missing_tone_mark: MissingToneMark,
    table: MarkTable,
    lookup: HashMap<&'static str, &'static str>,
}

impl IpaMarks {
    /// Read `toneMarkType` and `missingToneMark`. `tables` lists the mark
    /// types the reading supports; `prefer` resolves marks shared by several
    /// tones.
    pub fn read(
        reader: &mut OptionReader<'_>,
        default: IpaToneMarks,
        tables: &[(IpaToneMarks, MarkTable)],
        prefer: &[(IpaToneMarks, MarkTable)],
    ) -> Result<Self> {
        let mut allowed: Vec<IpaToneMarks> = tables.iter().map(|(m, _)| *m).collect();
        allowed.push(IpaToneMarks::None);
        let marks = reader.choice_among("toneMarkType", default, &allowed)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::NoInfo, MissingToneMark::Ignore],
        )?;
        let find = |list: &[(IpaToneMarks, MarkTable)]| -> MarkTable {
            list.iter().find(|(m, _)| *m == marks).map(|(_, t)| *t).unwrap_or(&[])
        };
        let table = find(tables);
        let preferred = find(prefer);
        let mut lookup = HashMap::new();
        for &(tone, mark) in table {
            let favoured = preferred.iter().any(|&(m, t)| m == mark && t == tone);
            if favoured || !lookup.contains_key(mark) {
                lookup.insert(mark, tone);
            }
        }
        Ok(Self {
            marks,
            missing_tone_mark,
            table,
            lookup,
        })
    }

    pub fn marks(&self) -> IpaToneMarks {
        self.marks
    }

    /// Whether entities without tonal information are accepted.
    pub fn allows_no_tone(&self) -> bool {
        self.missing_tone_mark == MissingToneMark::NoInfo || self.marks == IpaToneMarks::None
    }

    pub fn mark_for(&self, tone: &str) -> Option<&'static str> {
        self.table.iter().find(|(t, _)| *t == tone).map(|(_, m)| *m)
    }

    pub fn tone_for_mark(&self, mark: &str) -> Result<Option<&'static str>> {
        match self.lookup.get(mark) {
            Some(tone) => Ok(Some(*tone)),
            None if mark.is_empty() && self.missing_tone_mark == MissingToneMark::NoInfo => Ok(None),
            None => Err(ReadingError::InvalidEntity(format!("invalid tone mark given with '{mark}'"))),
        }
    }

    /// `plain` followed by the mark of `tone`.
    pub fn apply(&self, plain: &str, tone: Option<&str>) -> String {
        match tone.filter(|_| self.marks != IpaToneMarks::None) {
            Some(tone) => nfc(&format!("{plain}{}", self.mark_for(tone).unwrap_or(""))),
            None => nfc(plain),
        }
    }

    /// Split off the tone mark and name the tone it stands for.
    pub fn split(&self, entity: &str) -> Result<(String, Option<&'static str>)> {
        let entity = nfd(entity);
        if self.marks == IpaToneMarks::None {
            return Ok((nfc(&entity), None));
        }
        let range = find_tone_mark(self.marks, &entity).unwrap_or(entity.len()..entity.len());
        let tone = self.tone_for_mark(&entity[range.clone()])?;
        let mut plain = entity;
        plain.replace_range(range, "");
        Ok((nfc(&plain), tone))
    }
}

/// `Tone::Named` for an optional tone name.
pub(crate) fn named(tone: Option<&'static str>) -> Option<Tone> {
    tone.map(Tone::Named)
}

fn split_regex() -> &'static Regex {
    static SPLIT: OnceLock<Regex> = OnceLock::new();
    SPLIT.get_or_init(|| Regex::new(r"[.\s]+").expect("static pattern"))
}

pub(crate) fn is_separator(entity: &str) -> bool {
    !entity.is_empty() && entity.chars().all(|c| c == '.' || c.is_whitespace())
}

/// Split on runs of `.` and whitespace, keeping the separators.
pub(crate) fn decompose<R: ReadingOperator + ?Sized>(op: &R, text: &str) -> Decomposition {
    let kind = |s: &str| {
        if is_separator(s) {
            EntityKind::Formatting
        } else if op.is_reading_entity(s) {
            EntityKind::Reading
        } else {
            EntityKind::Other
        }
    };
    let mut parts = Vec::new();
    let mut last = 0;
    for sep in split_regex().find_iter(text) {
        if sep.start() > last {
            let piece = &text[last..sep.start()];
            parts.push((piece.to_string(), kind(piece)));
        }
        parts.push((sep.as_str().to_string(), EntityKind::Formatting));
        last = sep.end();
    }
    if last < text.len() {
        let piece = &text[last..];
        parts.push((piece.to_string(), kind(piece)));
    }
    trace!(reading = %op.reading(), entities = parts.len(), "split IPA text");
    Decomposition::from_parts(parts, true)
}

/// Join entities, putting `.` between two adjacent syllables.
pub(crate) fn compose<R: ReadingOperator + ?Sized>(op: &R, entities: &[String]) -> String {
    let mut out = String::new();
    let mut last_reading = false;
    for (i, entity) in entities.iter().enumerate() {
        let reading = op.is_reading_entity(entity);
        if i > 0 && last_reading && reading {
            out.push('.');
        }
        out.push_str(entity);
        last_reading = reading;
    }
    out
}

/// Guess the tone mark type from the marks found on each syllable.
pub(crate) fn guess_reading_dialect(text: &str) -> OptionMap {
    let text = nfc(text);
    let mut counts = [0usize; GUESS_ORDER.len()];
    for entity in text.split([' ', '.']) {
        let entity = nfd(entity);
        for (count, marks) in counts.iter_mut().zip(GUESS_ORDER) {
            if find_tone_mark(marks, &entity).is_some() {
                *count += 1;
            }
        }
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    let marks = GUESS_ORDER
        .iter()
        .zip(counts)
        .find(|(_, c)| *c == max)
        .map_or(IpaToneMarks::IpaToneBar, |(m, _)| *m);
    let mut map = OptionMap::new();
    map.insert("toneMarkType".into(), marks.name().into());
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;

    #[test]
    fn test_find_tone_mark() {
        assert_eq!(find_tone_mark(IpaToneMarks::IpaToneBar, "ma˥˩"), Some(2..6));
        assert_eq!(find_tone_mark(IpaToneMarks::ChaoDigits, "ma214"), Some(2..5));
        assert_eq!(find_tone_mark(IpaToneMarks::Numbers, "ma3"), Some(2..3));
        assert_eq!(find_tone_mark(IpaToneMarks::Numbers, "ma13"), None);
        assert_eq!(find_tone_mark(IpaToneMarks::IpaToneBar, "ma"), None);
    }

    #[test]
    fn test_is_separator() {
        assert!(is_separator("."));
        assert!(is_separator(" . "));
        assert!(!is_separator(""));
        assert!(!is_separator("a."));
    }

    #[test]
    fn test_guess_prefers_tone_bars() {
        let guess = guess_reading_dialect("lau˨˩.ʂʅ˥˥");
        assert_eq!(guess["toneMarkType"], OptionValue::from("ipaToneBar"));
        let guess = guess_reading_dialect("lau214 ʂʅ55");
        assert_eq!(guess["toneMarkType"], OptionValue::from("chaoDigits"));
    }
}
