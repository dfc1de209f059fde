//! Gwoyeu Romatzyh.
//!
//! GR spells tones into the syllable itself ("tonal spelling"): the four
//! base tones alter vowels and finals, the neutral tone is prefixed with a
//! dot, and an optional neutral tone with a marker such as `˳`. Rhotacised
//! (Erlhuah) forms replace the final and are kept in their own table.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::romanisation::{self, undelimitable, Romanisation, RomanisationOperator};
use super::{compile, invalid_tone, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{OptionMap, OptionReader, RomanisationOptions};
use crate::reading::Reading;
use crate::table::TableId;
use crate::unicode::{is_title, is_upper, nfc, to_title};

pub(crate) const TONES: [&str; 12] = [
    "1stTone",
    "2ndTone",
    "3rdTone",
    "4thTone",
    "5thToneEtymological1st",
    "5thToneEtymological2nd",
    "5thToneEtymological3rd",
    "5thToneEtymological4th",
    "1stToneOptional5th",
    "2ndToneOptional5th",
    "3rdToneOptional5th",
    "4thToneOptional5th",
];

/// Apostrophe used in the rhotacised finals table.
const TABLE_APOSTROPHE: &str = "'";
const APOSTROPHE_LIST: [&str; 9] = ["'", "’", "´", "‘", "`", "ʼ", "ˈ", "′", "ʻ"];
const OPTIONAL_NEUTRAL_TONE_MARKERS: [char; 5] = ['˳', '｡', '￮', '₀', 'ₒ'];
/// Column of the rhotacised table for tones 3 and 4 of zero-initial syllables
/// starting in `i` or `u`.
const ZERO_INITIAL_COLUMN_OFFSET: usize = 2;
/// Base tone stored in each column of the rhotacised table.
const COLUMN_TONES: [u8; 6] = [1, 2, 3, 4, 3, 4];
const SONORANTS: [&str; 4] = ["m", "n", "l", "r"];

/// How a GR tone relates to its base tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneClass {
    /// One of the four full tones.
    Full,
    /// Neutral tone, written with a leading dot.
    Etymological,
    /// Optionally neutral, written with the neutral tone marker.
    Optional,
}

/// The GR tone with base tone `base` (1-4) and class `class`.
pub(crate) fn gr_tone(base: u8, class: ToneClass) -> Option<Tone> {
    let offset = match class {
        ToneClass::Full => 0,
        ToneClass::Etymological => 4,
        ToneClass::Optional => 8,
    };
    let index = usize::from(base.checked_sub(1)?);
    (index < 4).then(|| Tone::Named(TONES[offset + index]))
}

pub(crate) fn tone_class(tone: Tone) -> Option<ToneClass> {
    let index = TONES.iter().position(|t| Some(*t) == tone.name())?;
    Some(match index / 4 {
        0 => ToneClass::Full,
        1 => ToneClass::Etymological,
        _ => ToneClass::Optional,
    })
}

/// An abbreviated spelling and what it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviatedForm {
    pub chars: String,
    pub full: Vec<String>,
    /// Flags from the table, plus `F` when the abbreviated spelling is made
    /// of full reading entities.
    pub flags: String,
}

impl AbbreviatedForm {
    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }
}

pub struct GrOperator {
    options: OptionMap,
    romanisation: Romanisation,
    abbreviations: bool,
    rhotacised_apostrophe: String,
    separator: String,
    neutral_tone_marker: char,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    reading_chars: HashSet<char>,
    /// Rhotacised finals by table column, keyed by the plain final.
    rhotacised: Vec<HashMap<String, String>>,
    tonal_lookup: HashMap<String, (String, Tone)>,
    full: HashSet<String>,
    abbreviated: HashSet<String>,
    abbreviated_lookup: HashMap<Vec<String>, Vec<AbbreviatedForm>>,
}

impl GrOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::Gr, given);
        let rom = RomanisationOptions::read(&mut reader)?;
        let abbreviations = reader.bool("abbreviations", true)?;
        let non_empty = |s: &str| !s.is_empty();
        let rhotacised_apostrophe = reader.string("grRhotacisedFinalApostrophe", "’", non_empty)?;
        let separator = reader.string("grSyllableSeparatorApostrophe", "’", non_empty)?;
        let marker = reader.string("optionalNeutralToneMarker", "˳", |s| {
            let mut chars = s.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if OPTIONAL_NEUTRAL_TONE_MARKERS.contains(&c))
        })?;
        let options = reader.finish()?;
        let neutral_tone_marker = marker.chars().next().unwrap_or('˳');

        let plain: HashSet<String> = ctx
            .tables
            .entities(TableId::GrSyllables)
            .into_iter()
            .filter_map(|s| ctx.tables.entity_data(TableId::GrSyllables, s)?.first().cloned())
            .collect();

        let mut rhotacised = vec![HashMap::new(); COLUMN_TONES.len()];
        for final_ in ctx.tables.entities(TableId::GrRhotacised) {
            let Some(row) = ctx.tables.entity_data(TableId::GrRhotacised, final_) else {
                continue;
            };
            for (column, form) in row.iter().enumerate().filter(|(_, f)| !f.is_empty()) {
                if let Some(map) = rhotacised.get_mut(column) {
                    map.insert(final_.to_string(), form.clone());
                }
            }
        }

        let mut reading_chars: HashSet<char> = ('a'..='z').collect();
        reading_chars.insert('.');
        reading_chars.insert(neutral_tone_marker);
        reading_chars.extend(rhotacised_apostrophe.chars());

        let run = compile(&format!(
            "( |{}|[.{}]?(?:{}|[A-Za-z])+)",
            regex::escape(&separator),
            regex::escape(&marker),
            regex::escape(&rhotacised_apostrophe),
        ))?;
        let romanisation = Romanisation::new(rom, ctx.best_effort, run, [separator.clone(), " ".to_string()]);

        let mut op = Self {
            options,
            romanisation,
            abbreviations,
            rhotacised_apostrophe,
            separator,
            neutral_tone_marker,
            tones: TONES.iter().map(|t| Some(Tone::Named(t))).collect(),
            plain,
            reading_chars,
            rhotacised,
            tonal_lookup: HashMap::new(),
            full: HashSet::new(),
            abbreviated: HashSet::new(),
            abbreviated_lookup: HashMap::new(),
        };

        let mut tonal_lookup = HashMap::new();
        let mut full = HashSet::new();
        for plain in &op.plain {
            for tone in TONES.iter().map(|t| Tone::Named(t)) {
                if let Ok(entity) = op.tonal_entity(plain, Some(tone)) {
                    full.insert(entity.clone());
                    tonal_lookup.insert(entity, (plain.clone(), tone));
                }
                if let Ok(entity) = op.rhotacised_tonal_entity(plain, tone) {
                    full.insert(entity);
                }
            }
        }

        let mut abbreviated_lookup: HashMap<Vec<String>, Vec<AbbreviatedForm>> = HashMap::new();
        let mut abbreviated = HashSet::new();
        for row in ctx.tables.abbreviations() {
            let key: Vec<String> = row.abbreviated.split(' ').map(str::to_string).collect();
            let mut flags = row.flags.clone();
            if key.iter().all(|e| full.contains(e)) {
                flags.push('F');
            }
            abbreviated.extend(key.iter().filter(|e| !full.contains(*e)).cloned());
            abbreviated_lookup.entry(key).or_default().push(AbbreviatedForm {
                chars: row.chars.clone(),
                full: row.full_entities().into_iter().map(str::to_string).collect(),
                flags,
            });
        }
        for repetition in ["x", "v"] {
            abbreviated.insert(repetition.to_string());
            abbreviated.insert(format!(".{repetition}"));
            abbreviated.insert(format!("{neutral_tone_marker}{repetition}"));
        }

        let mut reading = full.clone();
        if op.abbreviations {
            reading.extend(abbreviated.iter().cloned());
        }
        op.tonal_lookup = tonal_lookup;
        op.full = full;
        op.abbreviated = abbreviated;
        op.abbreviated_lookup = abbreviated_lookup;
        op.romanisation.set_reading_entities(reading);
        Ok(op)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn rhotacised_apostrophe(&self) -> &str {
        &self.rhotacised_apostrophe
    }

    pub fn neutral_tone_marker(&self) -> char {
        self.neutral_tone_marker
    }

    pub fn abbreviations_enabled(&self) -> bool {
        self.abbreviations
    }

    /// Tonal and rhotacised forms, without abbreviations.
    pub fn full_reading_entities(&self) -> &HashSet<String> {
        &self.full
    }

    /// Base tone 1-4 of a GR tone.
    pub fn base_tone(&self, tone: Tone) -> Result<u8> {
        let name = tone
            .name()
            .filter(|n| TONES.contains(n))
            .ok_or_else(|| ReadingError::InvalidEntity(format!("invalid tone information given: '{tone}'")))?;
        let digit = match name.strip_prefix("5thToneEtymological") {
            Some(rest) => rest.chars().next(),
            None => name.chars().next(),
        };
        digit
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .ok_or_else(|| ReadingError::InvalidEntity(format!("invalid tone information given: '{tone}'")))
    }

    /// Drop separator apostrophes standing between two reading entities.
    pub fn remove_apostrophes(&self, entities: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(entities.len());
        let mut i = 0;
        while i < entities.len() {
            out.push(entities[i].clone());
            if i + 2 < entities.len()
                && entities[i + 1] == self.separator
                && self.is_reading_entity(&entities[i])
                && self.is_reading_entity(&entities[i + 2])
            {
                i += 2;
            } else {
                i += 1;
            }
        }
        out
    }

    pub fn is_rhotacised_reading_entity(&self, entity: &str) -> bool {
        entity.ends_with('l')
            && !["el", "erl", "eel", "ell"].contains(&entity)
            && self.is_reading_entity(entity)
    }

    fn neutral_prefix(&self, tone: Tone) -> Option<char> {
        match tone_class(tone)? {
            ToneClass::Full => None,
            ToneClass::Etymological => Some('.'),
            ToneClass::Optional => Some(self.neutral_tone_marker),
        }
    }

    /// The Erlhuah form of `plain` in `tone`.
    pub fn rhotacised_tonal_entity(&self, plain: &str, tone: Tone) -> Result<String> {
        if !self.tones.contains(&Some(tone)) {
            return Err(invalid_tone(plain, Some(tone)));
        }
        if plain == "e" || plain == "el" {
            return Err(ReadingError::Unsupported(format!("no Erlhuah form for '{plain}'")));
        }
        let (mut c1, v, c2) = split_cvc(plain)?;
        let mut base = self.base_tone(tone)?;
        if SONORANTS.contains(&c1.as_str()) {
            if base == 1 {
                c1.push('h');
            } else if base == 2 {
                base = 1;
            }
        }
        let mut column = usize::from(base - 1);
        if c1.is_empty() && (v.starts_with('i') || v.starts_with('u')) && base >= 3 {
            column += ZERO_INITIAL_COLUMN_OFFSET;
        }
        let final_ = format!("{v}{c2}");
        let form = self.rhotacised[column].get(&final_).ok_or_else(|| {
            ReadingError::Unsupported(format!("no Erlhuah form for '{plain}' and tone '{tone}'"))
        })?;
        let mut entity = String::new();
        entity.extend(self.neutral_prefix(tone));
        entity.push_str(&c1);
        entity.push_str(&form.replace(TABLE_APOSTROPHE, &self.rhotacised_apostrophe));
        Ok(entity)
    }

    /// Plain entities and tones a rhotacised form may stand for.
    pub fn base_entities_for_rhotacised(&self, tonal: &str) -> Result<HashSet<(String, Tone)>> {
        let (class, rest) = if let Some(rest) = tonal.strip_prefix('.') {
            (ToneClass::Etymological, rest)
        } else if let Some(rest) = tonal.strip_prefix(self.neutral_tone_marker) {
            (ToneClass::Optional, rest)
        } else {
            (ToneClass::Full, tonal)
        };
        let rest = rest.replace(&self.rhotacised_apostrophe, TABLE_APOSTROPHE);
        let invalid = || ReadingError::InvalidEntity(format!("invalid rhotacised entity given for '{tonal}'"));
        let caps = rhotacised_structure_regex().captures(&rest).ok_or_else(invalid)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let (initial, h, final_) = (group(1), group(2), group(3));

        let mut matched = false;
        let mut out = HashSet::new();
        let mut finals: Vec<&String> = self.rhotacised.iter().flat_map(|m| m.keys()).collect();
        finals.sort_unstable();
        finals.dedup();
        for plain_final in finals {
            let Some(column) = self
                .rhotacised
                .iter()
                .position(|m| m.get(plain_final).is_some_and(|f| f == final_))
            else {
                continue;
            };
            matched = true;
            let mut base = COLUMN_TONES[column];
            if SONORANTS.contains(&initial) && base == 1 && h.is_empty() {
                base = 2;
            }
            let plain = format!("{initial}{plain_final}");
            if let Some(tone) = gr_tone(base, class).filter(|_| self.is_plain_reading_entity(&plain)) {
                out.insert((plain, tone));
            }
        }
        if !matched {
            return Err(invalid());
        }
        Ok(out)
    }

    pub fn is_abbreviated_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.abbreviated.contains(&entity.to_lowercase())
    }

    /// Abbreviated entities that are not also full reading entities.
    pub fn abbreviated_entities(&self) -> &HashSet<String> {
        &self.abbreviated
    }

    /// Entity sequences that have an abbreviation table entry.
    pub fn abbreviated_forms(&self) -> impl Iterator<Item = &[String]> {
        self.abbreviated_lookup.keys().map(Vec::as_slice)
    }

    pub fn abbreviated_form_data(&self, entities: &[String]) -> Result<&[AbbreviatedForm]> {
        let key: Vec<String> = entities.iter().map(|e| e.to_lowercase()).collect();
        self.abbreviated_lookup
            .get(&key)
            .map(Vec::as_slice)
            .ok_or_else(|| ReadingError::InvalidEntity(format!("not an abbreviated form: {entities:?}")))
    }
}

fn syllable_structure_regex() -> &'static Regex {
    static CVC: OnceLock<Regex> = OnceLock::new();
    CVC.get_or_init(|| {
        Regex::new(r"^((?:tz|ts|ch|sh|[bpmfdtnlsjrgkh])?)([aeiouy]+)((?:ngl|ng|n|l)?)$").expect("static pattern")
    })
}

fn rhotacised_structure_regex() -> &'static Regex {
    static STRUCTURE: OnceLock<Regex> = OnceLock::new();
    STRUCTURE.get_or_init(|| Regex::new(r"^((?:[mnlr])|h|(?:[^wyaeiou]*))(h?)(.*)$").expect("static pattern"))
}

/// Initial, vowels and final consonants of a plain syllable.
fn split_cvc(plain: &str) -> Result<(String, String, String)> {
    let caps = syllable_structure_regex()
        .captures(plain)
        .ok_or_else(|| ReadingError::InvalidEntity(format!("invalid entity given for '{plain}'")))?;
    let group = |i: usize| caps.get(i).map_or(String::new(), |m| m.as_str().to_string());
    Ok((group(1), group(2), group(3)))
}

fn tonal_spelling(c1: &str, v: &str, c2: &str, base: u8) -> String {
    let sonorant = SONORANTS.contains(&c1);
    let first = v.chars().next();
    let tail = v.get(1..).unwrap_or("");
    match base {
        1 if sonorant => format!("{c1}h{v}{c2}"),
        2 if !sonorant => match first {
            Some('i') if v == "i" && c2.is_empty() => format!("{c1}y{v}"),
            Some('i') => format!("{c1}y{tail}{c2}"),
            Some('u') if v == "u" && c2.is_empty() => format!("{c1}w{v}"),
            Some('u') => format!("{c1}w{tail}{c2}"),
            _ => format!("{c1}{v}r{c2}"),
        },
        3 => {
            let spelled = if v.chars().count() == 1 {
                format!("{c1}{v}{v}{c2}")
            } else if v == "ie" || v == "ei" || v == "ou" || v == "uo" {
                let (a, b) = v.split_at(1);
                let doubled = if v == "ie" || v == "ei" { 'e' } else { 'o' };
                format!("{c1}{a}{doubled}{b}{c2}")
            } else if first == Some('i') {
                format!("{c1}e{tail}{c2}")
            } else if first == Some('u') {
                format!("{c1}o{tail}{c2}")
            } else {
                format!("{c1}{}{c2}", v.replacen('i', "e", 1).replacen('u', "o", 1))
            };
            if !c1.is_empty() {
                return spelled;
            }
            match (spelled.as_str(), first) {
                ("iee", _) => "yee".to_string(),
                ("uoo", _) => "woo".to_string(),
                (_, Some('i')) => format!("y{spelled}"),
                (_, Some('u')) => format!("w{spelled}"),
                _ => spelled,
            }
        }
        4 => {
            let spelled = match c2 {
                "" if v == "i" || v == "iu" || v == "u" => format!("{c1}{v}h"),
                "" if v.ends_with('i') => format!("{c1}{}y", &v[..v.len() - 1]),
                "" if v.ends_with('u') => format!("{c1}{}w", &v[..v.len() - 1]),
                "" => format!("{c1}{v}h"),
                "n" => format!("{c1}{v}nn"),
                "ng" => format!("{c1}{v}nq"),
                "l" => format!("{c1}{v}ll"),
                _ => format!("{c1}{v}{c2}"),
            };
            if !c1.is_empty() {
                return spelled;
            }
            match spelled.as_str() {
                "ih" => "yih".to_string(),
                "uh" => "wuh".to_string(),
                "inn" => "yinn".to_string(),
                "inq" => "yinq".to_string(),
                _ if first == Some('i') => format!("y{}", &spelled[1..]),
                _ if first == Some('u') => format!("w{}", &spelled[1..]),
                _ => spelled,
            }
        }
        _ => format!("{c1}{v}{c2}"),
    }
}

impl ReadingOperator for GrOperator {
    fn reading(&self) -> Reading {
        Reading::Gr
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
        let is_reading_char = |c: Option<char>| c.is_some_and(|c| self.reading_chars.contains(&c));
        let mut out = String::new();
        let mut preceding: Option<&str> = None;
        for entity in entities {
            if let Some(prev) = preceding.filter(|p| !p.is_empty() && !entity.is_empty()) {
                let prev_reading = self.is_reading_entity(prev);
                let entity_reading = self.is_reading_entity(entity);
                let first = entity.chars().next();
                let vowel_onset = first.is_some_and(|c| "aeiou".contains(c.to_ascii_lowercase()));
                if prev_reading && entity_reading && (vowel_onset || (entity == "g" && prev.ends_with('n'))) {
                    out.push_str(&self.separator);
                } else if (prev_reading && !entity_reading && is_reading_char(first) && *entity != self.separator)
                    || (!prev_reading
                        && entity_reading
                        && is_reading_char(prev.chars().last())
                        && prev != self.separator)
                    || (prev == self.rhotacised_apostrophe && !entity_reading && first == Some('l'))
                {
                    return Err(undelimitable(if prev_reading { entity } else { prev }));
                }
            }
            out.push_str(entity);
            preceding = Some(entity);
        }
        Ok(out)
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.reading_entities().contains(&entity.to_lowercase())
    }

    fn is_formatting_entity(&self, entity: &str) -> bool {
        self.romanisation.is_formatting_entity(entity)
    }
}

impl TonalOperator for GrOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        let tone = match tone {
            Some(t) if self.tones.contains(&Some(t)) => t,
            _ => return Err(invalid_tone(plain, tone)),
        };
        if self.is_rhotacised_reading_entity(plain) {
            return Err(ReadingError::Unsupported(format!("not supported for '{plain}'")));
        }
        let (c1, v, c2) = split_cvc(&plain.to_lowercase())?;
        let base = self.base_tone(tone)?;
        let mut entity = String::new();
        entity.extend(self.neutral_prefix(tone));
        entity.push_str(&tonal_spelling(&c1, &v, &c2, base));
        Ok(if is_upper(plain) {
            entity.to_uppercase()
        } else if is_title(plain) {
            to_title(&entity)
        } else {
            entity
        })
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let Some((plain, tone)) = self.tonal_lookup.get(&entity.to_lowercase()) else {
            return Err(if self.is_reading_entity(entity) {
                ReadingError::Unsupported(format!("not supported for '{entity}'"))
            } else {
                ReadingError::InvalidEntity(format!("invalid entity given for '{entity}'"))
            });
        };
        let plain = if is_upper(entity) {
            plain.to_uppercase()
        } else if is_title(entity) {
            to_title(plain)
        } else {
            plain.clone()
        };
        Ok((plain, Some(*tone)))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.plain.contains(&entity.to_lowercase())
    }
}

impl RomanisationOperator for GrOperator {
    fn romanisation(&self) -> &Romanisation {
        &self.romanisation
    }

    fn is_strict_decomposition(&self, entities: &[&str]) -> bool {
        entities.windows(2).all(|pair| {
            let vowel_onset = pair[1]
                .chars()
                .next()
                .is_some_and(|c| "aeiou".contains(c.to_ascii_lowercase()));
            !(vowel_onset && self.is_reading_entity(pair[0]) && self.is_reading_entity(pair[1]))
        })
    }
}

/// Guess apostrophes and the optional neutral tone marker.
pub(crate) fn guess_reading_dialect(text: &str) -> OptionMap {
    let text = nfc(text);
    let apostrophe = APOSTROPHE_LIST
        .into_iter()
        .find(|a| text.contains(a))
        .unwrap_or(TABLE_APOSTROPHE);
    let marker = OPTIONAL_NEUTRAL_TONE_MARKERS
        .into_iter()
        .find(|m| text.contains(*m))
        .unwrap_or('˳');
    let mut map = OptionMap::new();
    map.insert("grRhotacisedFinalApostrophe".into(), apostrophe.into());
    map.insert("grSyllableSeparatorApostrophe".into(), apostrophe.into());
    map.insert("optionalNeutralToneMarker".into(), marker.to_string().into());
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tonal_spelling_rules() {
        assert_eq!(tonal_spelling("", "a", "", 1), "a");
        assert_eq!(tonal_spelling("m", "a", "", 1), "mha");
        assert_eq!(tonal_spelling("b", "a", "", 2), "bar");
        assert_eq!(tonal_spelling("h", "uan", "", 2), "hwan");
        assert_eq!(tonal_spelling("j", "i", "", 2), "jyi");
        assert_eq!(tonal_spelling("h", "au", "", 3), "hao");
        assert_eq!(tonal_spelling("", "ie", "", 3), "yee");
        assert_eq!(tonal_spelling("", "uo", "", 3), "woo");
        assert_eq!(tonal_spelling("sh", "i", "", 4), "shih");
        assert_eq!(tonal_spelling("", "i", "ng", 4), "yinq");
        assert_eq!(tonal_spelling("h", "ai", "", 4), "hay");
    }

    #[test]
    fn test_gr_tone_classes() {
        assert_eq!(gr_tone(3, ToneClass::Etymological), Some(Tone::Named("5thToneEtymological3rd")));
        assert_eq!(gr_tone(5, ToneClass::Full), None);
        assert_eq!(tone_class(Tone::Named("2ndToneOptional5th")), Some(ToneClass::Optional));
        assert_eq!(tone_class(Tone::Number(2)), None);
    }

    #[test]
    fn test_split_cvc() {
        assert_eq!(
            split_cvc("jiang").unwrap(),
            ("j".to_string(), "ia".to_string(), "ng".to_string())
        );
        assert!(split_cvc("xyz").is_err());
    }
}
