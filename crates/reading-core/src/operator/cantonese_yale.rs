//! Cantonese Yale.
//!
//! Tones are written with diacritics on the first vowel plus an `h` after the
//! nucleus for the low register (4th to 6th tone), or with digits. The
//! `internal` mark type keeps the `h` and appends a digit, with `0` for the
//! high level tone, so both first-tone variants survive a round trip.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::romanisation::{self, fused_entity, prefix_table, undelimitable, Romanisation, RomanisationOperator};
use super::{compile, invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, Choice, MissingToneMark, OptionMap, OptionReader, RomanisationOptions};
use crate::reading::Reading;
use crate::table::TableId;
use crate::unicode::{is_upper, nfc, nfd};

pub(crate) const TONES: [&str; 7] = [
    "1stToneLevel",
    "1stToneFalling",
    "2ndTone",
    "3rdTone",
    "4thTone",
    "5thTone",
    "6thTone",
];

const MACRON: char = '\u{0304}';
const GRAVE: char = '\u{0300}';
const ACUTE: char = '\u{0301}';
const DIACRITICS: [char; 3] = [MACRON, GRAVE, ACUTE];

option_choice! {
    pub enum YaleToneMarks {
        Diacritics => "diacritics",
        Numbers => "numbers",
        None => "none",
        Internal => "internal",
    }
}

/// Tone mark and `h` marker for `tone` under `marks`.
fn tone_marks(marks: YaleToneMarks, tone: Option<&str>) -> Option<(&'static str, &'static str)> {
    let pair = match (marks, tone?) {
        (YaleToneMarks::Numbers, "1stToneLevel" | "1stToneFalling") => ("1", ""),
        (YaleToneMarks::Numbers, "2ndTone") => ("2", ""),
        (YaleToneMarks::Numbers, "3rdTone") => ("3", ""),
        (YaleToneMarks::Numbers, "4thTone") => ("4", ""),
        (YaleToneMarks::Numbers, "5thTone") => ("5", ""),
        (YaleToneMarks::Numbers, "6thTone") => ("6", ""),
        (YaleToneMarks::Diacritics, "1stToneLevel") => ("\u{0304}", ""),
        (YaleToneMarks::Diacritics, "1stToneFalling") => ("\u{0300}", ""),
        (YaleToneMarks::Diacritics, "2ndTone") => ("\u{0301}", ""),
        (YaleToneMarks::Diacritics, "3rdTone") => ("", ""),
        (YaleToneMarks::Diacritics, "4thTone") => ("\u{0300}", "h"),
        (YaleToneMarks::Diacritics, "5thTone") => ("\u{0301}", "h"),
        (YaleToneMarks::Diacritics, "6thTone") => ("", "h"),
        (YaleToneMarks::Internal, "1stToneLevel") => ("0", ""),
        (YaleToneMarks::Internal, "1stToneFalling") => ("1", ""),
        (YaleToneMarks::Internal, "2ndTone") => ("2", ""),
        (YaleToneMarks::Internal, "3rdTone") => ("3", ""),
        (YaleToneMarks::Internal, "4thTone") => ("4", "h"),
        (YaleToneMarks::Internal, "5thTone") => ("5", "h"),
        (YaleToneMarks::Internal, "6thTone") => ("6", "h"),
        _ => return None,
    };
    Some(pair)
}

/// Marks and `h` for an optional tone; no tonal information is unmarked.
fn marks_for(marks: YaleToneMarks, tone: Option<Tone>) -> Option<(&'static str, &'static str)> {
    match tone {
        None if marks != YaleToneMarks::Diacritics => Some(("", "")),
        None => None,
        Some(t) => tone_marks(marks, t.name()),
    }
}

/// NFC forms of each nucleus letter carrying each diacritic.
fn diacritic_vowels() -> Vec<String> {
    let mut out: Vec<String> = "aeioumnh"
        .chars()
        .flat_map(|c| DIACRITICS.iter().map(move |m| nfc(&format!("{c}{m}"))))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

pub struct CantoneseYaleOperator {
    options: OptionMap,
    romanisation: Romanisation,
    tone_marks: YaleToneMarks,
    strict_diacritic_placement: bool,
    tones: Vec<Option<Tone>>,
    mark_lookup: HashMap<(String, String), Option<Tone>>,
    primary_tone_regex: Option<Regex>,
    plain: HashSet<String>,
    plain_prefixes: HashSet<String>,
    reading_chars: HashSet<char>,
    syllables: HashMap<String, (String, String, String)>,
}

impl CantoneseYaleOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::CantoneseYale, given);
        let rom = RomanisationOptions::read(&mut reader)?;
        let tone_marks = reader.choice("toneMarkType", YaleToneMarks::Diacritics)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::NoInfo, MissingToneMark::Ignore],
        )?;
        let strict_diacritic_placement = reader.bool("strictDiacriticPlacement", false)?;
        let first_tone = reader.string("yaleFirstTone", TONES[0], |s| s == TONES[0] || s == TONES[1])?;
        let options = reader.finish()?;
        let first_tone = Tone::Named(if first_tone == TONES[1] { TONES[1] } else { TONES[0] });

        let mut tones: Vec<Option<Tone>> = TONES.iter().map(|t| Some(Tone::Named(t))).collect();
        if (missing_tone_mark == MissingToneMark::NoInfo
            && matches!(tone_marks, YaleToneMarks::Numbers | YaleToneMarks::Internal))
            || tone_marks == YaleToneMarks::None
        {
            tones.push(None);
        }

        let mut mark_lookup = HashMap::new();
        let mut primary_tone_regex = None;
        if tone_marks != YaleToneMarks::None {
            for &tone in &tones {
                if let Some((mark, h)) = marks_for(tone_marks, tone) {
                    mark_lookup.insert((mark.to_string(), h.to_string()), tone);
                }
            }
            if tone_marks == YaleToneMarks::Numbers {
                mark_lookup.insert(("1".to_string(), String::new()), Some(first_tone));
            }
            let class: String = TONES
                .iter()
                .filter_map(|t| tone_marks_for_class(tone_marks, t))
                .collect::<HashSet<_>>()
                .into_iter()
                .map(|m| regex::escape(m))
                .collect();
            primary_tone_regex = Some(compile(&format!("(?i)^[a-z]+([{class}]?)"))?);
        }

        let mut syllables = HashMap::new();
        for jyutping in ctx.tables.entities(TableId::JyutpingYale) {
            if let Some([yale, initial, nucleus, coda]) = ctx.tables.entity_data(TableId::JyutpingYale, jyutping) {
                syllables.insert(yale.clone(), (initial.clone(), nucleus.clone(), coda.clone()));
            }
        }
        let plain: HashSet<String> = syllables.keys().cloned().collect();

        let vowels = diacritic_vowels();
        let mut reading_chars: HashSet<char> = ('a'..='z').chain(DIACRITICS).chain('0'..='6').collect();
        for v in &vowels {
            let mut chars = v.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                reading_chars.insert(c);
            }
        }
        let alternation: Vec<String> = vowels.iter().map(|v| regex::escape(v)).collect();
        let run = compile(&format!("(?i)((?:{}|[a-z])+[0123456]?)", alternation.join("|")))?;
        let romanisation = Romanisation::new(rom, ctx.best_effort, run, Vec::<String>::new());

        let mut op = Self {
            options,
            romanisation,
            tone_marks,
            strict_diacritic_placement,
            tones,
            mark_lookup,
            primary_tone_regex,
            plain,
            plain_prefixes: HashSet::new(),
            reading_chars,
            syllables,
        };
        if tone_marks == YaleToneMarks::Diacritics {
            let sixth = Some(Tone::Named(TONES[6]));
            let mut forms: Vec<String> = op.plain.iter().cloned().collect();
            forms.extend(op.plain.iter().filter_map(|p| op.tonal_entity(p, sixth).ok()));
            op.plain_prefixes = prefix_table(forms.iter());
        }
        let entities = super::tonal_reading_entities(&op);
        op.romanisation.set_reading_entities(entities);
        Ok(op)
    }

    pub fn tone_mark_type(&self) -> YaleToneMarks {
        self.tone_marks
    }

    /// Initial, nucleus and coda of a plain syllable.
    pub fn onset_nucleus_coda(&self, plain: &str) -> Result<(String, String, String)> {
        self.syllables.get(&plain.to_lowercase()).cloned().ok_or_else(|| {
            ReadingError::InvalidEntity(format!("'{plain}' not a valid plain Cantonese Yale syllable"))
        })
    }

    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        let (onset, nucleus, coda) = self.onset_nucleus_coda(plain)?;
        Ok((onset, nucleus + &coda))
    }

    pub fn has_stop_tone(&self, plain: &str) -> Result<bool> {
        let (_, _, coda) = self.onset_nucleus_coda(plain)?;
        Ok(matches!(coda.as_str(), "p" | "t" | "k"))
    }

    fn check_tone(&self, plain: &str, tone: Option<Tone>) -> Result<()> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        let stop_tone = matches!(tone.and_then(Tone::name), None | Some("1stToneLevel" | "3rdTone" | "6thTone"));
        if self.has_stop_tone(plain)? && !stop_tone {
            return Err(ReadingError::InvalidEntity(format!(
                "syllable '{plain}' can not occur with tone '{}'",
                crate::entity::tone_label(tone)
            )));
        }
        Ok(())
    }
}

/// Tone marks that may follow the letters of an entity.
fn tone_marks_for_class(marks: YaleToneMarks, tone: &str) -> Option<&'static str> {
    tone_marks(marks, Some(tone)).map(|(m, _)| m).filter(|m| !m.is_empty())
}

fn syllable_structure_regex() -> &'static Regex {
    static STRUCTURE: OnceLock<Regex> = OnceLock::new();
    STRUCTURE.get_or_init(|| Regex::new(r"(?i)^([^aeiou]*?)([aeiou]*)([^haeiou]*)$").expect("static pattern"))
}

fn h_char_regex() -> &'static Regex {
    static H: OnceLock<Regex> = OnceLock::new();
    H.get_or_init(|| Regex::new(r"(?i)^.*(?:[aeiou]|m|ng)(h)").expect("static pattern"))
}

/// Insert `mark` after the first character of `s`, then `h`.
fn marked(s: &str, mark: &str, h: &str) -> String {
    let mut chars = s.chars();
    let first: String = chars.next().into_iter().collect();
    nfc(&format!("{first}{mark}{}{h}", chars.as_str()))
}

impl ReadingOperator for CantoneseYaleOperator {
    fn reading(&self) -> Reading {
        Reading::CantoneseYale
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
        let is_reading_char = |c: char| self.reading_chars.contains(&c);
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

impl TonalOperator for CantoneseYaleOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        self.check_tone(plain, tone)?;
        if self.tone_marks == YaleToneMarks::None {
            return Ok(plain.to_string());
        }
        let (mark, h) = marks_for(self.tone_marks, tone).ok_or_else(|| invalid_tone(plain, tone))?;
        if h.is_empty() && self.tone_marks != YaleToneMarks::Diacritics {
            return Ok(format!("{plain}{mark}"));
        }
        let caps = syllable_structure_regex()
            .captures(plain)
            .ok_or_else(|| ReadingError::InvalidEntity(format!("invalid entity given for '{plain}'")))?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let (onset, vowels, coda) = (group(1), group(2), group(3));
        let h = if is_upper(plain) { h.to_uppercase() } else { h.to_string() };
        if self.tone_marks == YaleToneMarks::Diacritics {
            if vowels.is_empty() {
                Ok(format!("{onset}{}", marked(coda, mark, &h)))
            } else {
                Ok(format!("{onset}{}{coda}", marked(vowels, mark, &h)))
            }
        } else if vowels.is_empty() {
            Ok(format!("{onset}{coda}{h}{mark}"))
        } else {
            Ok(format!("{onset}{vowels}{h}{coda}{mark}"))
        }
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let decomposed = nfd(entity);
        let Some(primary) = self.primary_tone_regex.as_ref() else {
            return Ok((nfc(&decomposed), None));
        };
        let no_info = || ReadingError::InvalidEntity(format!("invalid entity or no tone information given for '{entity}'"));
        let caps = primary.captures(&decomposed).ok_or_else(no_info)?;
        let mark = caps.get(1).ok_or_else(no_info)?;
        let mut plain = format!("{}{}", &decomposed[..mark.start()], &decomposed[mark.end()..]);
        let mut h = String::new();
        if let Some(found) = h_char_regex().captures(&plain).and_then(|c| c.get(1)) {
            h = found.as_str().to_lowercase();
            plain = format!("{}{}", &plain[..found.start()], &plain[found.end()..]);
        }
        let plain = nfc(&plain);
        let mut tone = *self
            .mark_lookup
            .get(&(mark.as_str().to_string(), h))
            .ok_or_else(no_info)?;
        if self.tone_marks == YaleToneMarks::Numbers
            && tone == Some(Tone::Named(TONES[1]))
            && self.has_stop_tone(&plain)?
        {
            tone = Some(Tone::Named(TONES[0]));
        }
        if self.strict_diacritic_placement && nfc(entity) != self.tonal_entity(&plain, tone)? {
            return Err(ReadingError::InvalidEntity(format!(
                "wrong placement of diacritic for '{entity}' while strict checking enforced"
            )));
        }
        self.check_tone(&plain, tone)?;
        Ok((plain, tone))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.plain.contains(&entity.to_lowercase())
    }
}

impl RomanisationOperator for CantoneseYaleOperator {
    fn romanisation(&self) -> &Romanisation {
        &self.romanisation
    }

    fn has_entity_substring(&self, lower: &str) -> bool {
        if self.tone_marks != YaleToneMarks::Diacritics {
            return self.romanisation.has_prefix(lower);
        }
        let mut decomposed = nfd(lower);
        if let Some(pos) = decomposed.find(DIACRITICS) {
            decomposed.remove(pos);
        }
        self.plain_prefixes.contains(&nfc(&decomposed))
    }
}

fn guess_syllable_regex() -> &'static Regex {
    static SYLLABLE: OnceLock<Regex> = OnceLock::new();
    SYLLABLE.get_or_init(|| {
        Regex::new(
            "((?:m|ng|h|(?:[bcdfghjklmnpqrstvwxyz]*(?:(?:[aeiou]|[\u{0304}\u{0301}\u{0300}])+|yu[\u{0304}\u{0301}\u{0300}]?)))(h)?(?:[mnptk]|ng)?[0123456]?)",
        )
        .expect("static pattern")
    })
}

/// Syllable-like chunks of a decomposed, lowercased text. An `h` directly
/// followed by a vowel starts the next syllable instead of closing this one.
fn guess_entities(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(caps) = guess_syllable_regex().captures_at(text, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let end = match caps.get(2) {
            Some(h) => {
                let rest = &text[h.end()..];
                if rest.starts_with(['a', 'e', 'i', 'o', 'u']) || rest.starts_with("yu") {
                    h.start()
                } else {
                    whole.end()
                }
            }
            None => whole.end(),
        };
        out.push(&text[whole.start()..end]);
        pos = end;
    }
    out
}

/// Guess the tone mark type from a text.
pub(crate) fn guess_reading_dialect(text: &str) -> OptionMap {
    let text = nfd(&text.to_lowercase());
    let mut diacritic_count = 0;
    let mut number_count = 0;
    for entity in guess_entities(&text) {
        if entity.ends_with(['1', '2', '3', '4', '5', '6']) {
            number_count += 1;
        } else if entity.chars().skip(1).any(|c| c == 'h') || entity.contains(DIACRITICS) {
            diacritic_count += 1;
        }
    }
    let marks = if diacritic_count > number_count {
        YaleToneMarks::Diacritics
    } else {
        YaleToneMarks::Numbers
    };
    let mut map = OptionMap::new();
    map.insert("toneMarkType".into(), marks.name().into());
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;

    #[test]
    fn test_guess_entities_leave_onset_h() {
        let text = nfd("sihai");
        assert_eq!(guess_entities(&text), vec!["si", "h", "ai"]);
        let text = nfd("sih");
        assert_eq!(guess_entities(&text), vec!["sih"]);
    }

    #[test]
    fn test_marked_places_diacritic_on_first_letter() {
        assert_eq!(marked("eu", "\u{0300}", "h"), "èuh");
        assert_eq!(marked("ng", "\u{0301}", ""), "ńg");
    }

    #[test]
    fn test_guess_reading_dialect() {
        let guess = guess_reading_dialect("gwóngjàuwá");
        assert_eq!(guess["toneMarkType"], OptionValue::from("diacritics"));
        let guess = guess_reading_dialect("gwong2jau1waa2");
        assert_eq!(guess["toneMarkType"], OptionValue::from("numbers"));
    }
}
