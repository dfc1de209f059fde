//! Hanyu Pinyin.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::romanisation::{self, fused_entity, undelimitable, Romanisation, RomanisationOperator};
use super::{compile, invalid_tone, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, Case, Choice, MissingToneMark, OptionMap, OptionReader, RomanisationOptions};
use crate::reading::Reading;
use crate::table::TableId;
use crate::unicode::{is_title, is_upper, nfc, nfd};

const TONEMARK_VOWELS: [char; 11] = ['a', 'e', 'i', 'o', 'u', 'ü', 'n', 'm', 'r', 'ê', 'ŋ'];
const DEFAULT_DIACRITICS: &str = "\u{0304}\u{0301}\u{030C}\u{0300}";
/// Marks seen in the wild for each tone, preferred first.
const DIACRITICS_LIST: [&[char]; 4] = [
    &['\u{0304}'],
    &['\u{0301}'],
    &['\u{030C}', '\u{0306}', '\u{0302}'],
    &['\u{0300}'],
];
const Y_VOWEL_LIST: [&str; 4] = ["ü", "v", "u:", "uu"];
const APOSTROPHE_LIST: [char; 9] = ['\'', '’', '´', '‘', '`', 'ʼ', 'ˈ', '′', 'ʻ'];

/// Syllabic consonants and interjections whose first letter carries the mark.
const SYLLABIC_NUCLEUS_FIRST: [&str; 11] = ["n", "ng", "m", "r", "ê", "nr", "ngr", "mr", "êr", "ŋ", "ŋr"];
const SYLLABIC_NUCLEUS_SECOND: [&str; 6] = ["hm", "hng", "hmr", "hngr", "hŋ", "hŋr"];

option_choice! {
    pub enum PinyinToneMarks {
        Diacritics => "diacritics",
        Numbers => "numbers",
        None => "none",
    }
}

option_choice! {
    /// Treatment of the rhotacised (erhua) suffix.
    pub enum Erhua {
        Ignore => "ignore",
        TwoSyllables => "twoSyllables",
        OneSyllable => "oneSyllable",
    }
}

/// Decides where an apostrophe separates two syllables.
pub trait ApostropheRule: Send + Sync {
    fn needs_apostrophe(&self, op: &PinyinOperator, preceding: Option<&str>, following: &str) -> bool;
}

/// The standard rule: an apostrophe precedes a syllable starting with a, e
/// or o, and the syllabic nasals.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeoApostropheRule;

impl ApostropheRule for AeoApostropheRule {
    fn needs_apostrophe(&self, op: &PinyinOperator, preceding: Option<&str>, following: &str) -> bool {
        let Some(preceding) = preceding.filter(|p| !p.is_empty()) else {
            return false;
        };
        if !op.is_reading_entity(preceding) || !op.is_reading_entity(following) {
            return false;
        }
        let Ok((plain, _)) = op.split_entity_tone(following) else {
            return false;
        };
        let plain = plain.to_lowercase();
        if plain == "r" {
            return op
                .split_entity_tone(preceding)
                .is_ok_and(|(p, _)| p.to_lowercase() == "e");
        }
        plain.starts_with(['a', 'e', 'o'])
            || ["n", "ng", "nr", "ngr", "ê", "ŋ", "ŋr"].contains(&plain.as_str())
    }
}

pub struct PinyinOperator {
    options: OptionMap,
    romanisation: Romanisation,
    tone_marks: PinyinToneMarks,
    missing_tone_mark: MissingToneMark,
    strict_diacritic_placement: bool,
    diacritics: [char; 4],
    y_vowel: String,
    shortened_letters: bool,
    apostrophe: String,
    erhua: Erhua,
    apostrophe_rule: Arc<dyn ApostropheRule>,
    tone_mark_regex: Regex,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    plain_prefixes: HashSet<String>,
    reading_chars: HashSet<char>,
    syllables: HashMap<String, (String, String)>,
}

impl PinyinOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::Pinyin, given);
        let rom = RomanisationOptions::read(&mut reader)?;
        let tone_marks = reader.choice("toneMarkType", PinyinToneMarks::Diacritics)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::Fifth, MissingToneMark::NoInfo, MissingToneMark::Ignore],
        )?;
        let strict_diacritic_placement = reader.bool("strictDiacriticPlacement", false)?;
        let diacritics_str = reader.string("pinyinDiacritics", DEFAULT_DIACRITICS, |s| {
            let chars: HashSet<char> = s.chars().collect();
            s.chars().count() == 4 && chars.len() == 4
        })?;
        let y_vowel = reader
            .string("yVowel", "ü", |s| !s.is_empty())?
            .to_lowercase();
        let shortened_letters = reader.bool("shortenedLetters", false)?;
        let apostrophe = reader.string("pinyinApostrophe", "'", |s| !s.is_empty())?;
        let erhua = reader.choice("erhua", Erhua::TwoSyllables)?;
        let options = reader.finish()?;

        if tone_marks == PinyinToneMarks::Diacritics && y_vowel != "ü" {
            return Err(ReadingError::UnsupportedOption {
                reading: Reading::Pinyin.to_string(),
                name: "yVowel".to_string(),
                value: y_vowel,
            });
        }

        let mut diacritics = ['\0'; 4];
        for (slot, c) in diacritics.iter_mut().zip(diacritics_str.chars()) {
            *slot = c;
        }

        let mut tones: Vec<Option<Tone>> = (1..=5).map(|n| Some(Tone::Number(n))).collect();
        if tone_marks == PinyinToneMarks::None
            || (tone_marks == PinyinToneMarks::Numbers && missing_tone_mark == MissingToneMark::NoInfo)
        {
            tones.push(None);
        }

        let plain = plain_entities(ctx, &diacritics, erhua, &y_vowel, shortened_letters)?;
        let plain_prefixes = romanisation::prefix_table(plain.iter());
        let syllables = ctx
            .tables
            .entities(TableId::PinyinSyllables)
            .into_iter()
            .filter_map(|s| {
                let row = ctx.tables.entity_data(TableId::PinyinSyllables, s)?;
                Some((s.to_string(), (row.first()?.clone(), row.get(1)?.clone())))
            })
            .collect();

        let diacritic_vowels = diacritic_vowels(&diacritics);
        let run = compile(&format!(
            "(?i)((?:{}|{}|[a-zêüŋẑĉŝ])+[12345]?)",
            alternation(diacritic_vowels.iter().map(String::as_str)),
            regex::escape(&y_vowel),
        ))?;
        let romanisation = Romanisation::new(rom, ctx.best_effort, run, [apostrophe.clone()]);

        let mut op = Self {
            options,
            romanisation,
            tone_marks,
            missing_tone_mark,
            strict_diacritic_placement,
            tone_mark_regex: tone_mark_regex(&diacritics)?,
            reading_chars: reading_chars(&y_vowel, &diacritics, &diacritic_vowels),
            diacritics,
            y_vowel,
            shortened_letters,
            apostrophe,
            erhua,
            apostrophe_rule: Arc::new(AeoApostropheRule),
            tones,
            plain,
            plain_prefixes,
            syllables,
        };
        let entities = op.tonal_forms();
        op.romanisation.set_reading_entities(entities);
        Ok(op)
    }

    /// Replace the rule deciding where `compose` inserts apostrophes.
    pub fn with_apostrophe_rule(mut self, rule: Arc<dyn ApostropheRule>) -> Self {
        self.apostrophe_rule = rule;
        self
    }

    pub fn tone_mark_type(&self) -> PinyinToneMarks {
        self.tone_marks
    }

    pub fn missing_tone_mark(&self) -> MissingToneMark {
        self.missing_tone_mark
    }

    pub fn erhua(&self) -> Erhua {
        self.erhua
    }

    pub fn apostrophe(&self) -> &str {
        &self.apostrophe
    }

    pub fn y_vowel(&self) -> &str {
        &self.y_vowel
    }

    pub fn shortened_letters(&self) -> bool {
        self.shortened_letters
    }

    pub fn case(&self) -> Case {
        self.romanisation.case()
    }

    /// The syllable `r` only stands alone in the neutral tone.
    fn tonal_forms(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        for plain in &self.plain {
            for &tone in &self.tones {
                if plain == "r" && !matches!(tone, None | Some(Tone::Number(5))) {
                    continue;
                }
                if let Ok(entity) = self.tonal_entity(plain, tone) {
                    out.insert(entity);
                }
            }
        }
        out
    }

    fn strip_first_tone_mark(&self, nfd_text: &str) -> String {
        self.tone_mark_regex.replacen(nfd_text, 1, "$1").into_owned()
    }

    fn is_reading_char(&self, c: char) -> bool {
        self.reading_chars.contains(&c)
    }

    /// Drop apostrophes standing between two reading entities.
    pub fn remove_apostrophes(&self, entities: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(entities.len());
        let mut i = 0;
        while i < entities.len() {
            out.push(entities[i].clone());
            if i + 2 < entities.len()
                && entities[i + 1] == self.apostrophe
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

    /// Rewrite a plain entity for the letter conventions of `target`
    /// (shortened letters and the ü substitute); `None` means the defaults.
    pub fn convert_plain_entity(&self, plain: &str, target: Option<&PinyinOperator>) -> String {
        let to_shortened = target.is_some_and(|t| t.shortened_letters);
        let to_y_vowel = target.map_or("ü", |t| t.y_vowel.as_str());
        let mut entity = plain.to_string();

        if self.shortened_letters && !to_shortened {
            entity = entity.replace('ŋ', "ng");
            entity = if is_title(&entity) {
                entity.replace('Ŋ', "Ng")
            } else {
                entity.replace('Ŋ', "NG")
            };
            let first = entity.chars().next().map(|c| c.to_lowercase().collect::<String>());
            if let Some(full) = first.as_deref().and_then(expand_initial) {
                let short = first.unwrap_or_default();
                entity = entity.replace(&short, full);
                let short_upper = short.to_uppercase();
                if is_upper(&entity) {
                    entity = entity.replace(&short_upper, &full.to_uppercase());
                } else if is_title(&entity) {
                    entity = entity.replace(&short_upper, &crate::unicode::to_title(full));
                }
            }
        } else if !self.shortened_letters && to_shortened {
            if let Some(m) = ng_regex().find(&entity) {
                let form = m.as_str().to_string();
                let upper = is_upper(&entity) || (is_title(&entity) && entity.starts_with(&form));
                entity = entity.replace(&form, if upper { "Ŋ" } else { "ŋ" });
            }
            if let Some(m) = retroflex_regex().find(&entity) {
                let form = m.as_str().to_string();
                let short = match form.to_lowercase().as_str() {
                    "zh" => 'ẑ',
                    "ch" => 'ĉ',
                    _ => 'ŝ',
                };
                let short: String = if is_upper(&entity) || is_title(&entity) {
                    short.to_uppercase().collect()
                } else {
                    short.to_string()
                };
                entity = entity.replace(&form, &short);
            }
        }

        if self.y_vowel != to_y_vowel {
            entity = entity
                .replace(&self.y_vowel, to_y_vowel)
                .replace(&self.y_vowel.to_uppercase(), &to_y_vowel.to_uppercase());
        }
        entity
    }

    /// Initial and final of a plain syllable. Under `erhua = oneSyllable`
    /// the final of a rhotacised syllable ends in `r`.
    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        let mut standard = plain.to_lowercase();
        let mut rhotacised = false;
        if self.erhua == Erhua::OneSyllable && standard.ends_with('r') && standard != "er" {
            standard.pop();
            rhotacised = true;
        } else if standard == "r" && self.erhua == Erhua::TwoSyllables {
            return Err(ReadingError::Unsupported(format!("onset/rhyme of '{plain}'")));
        }
        let standard = self.convert_plain_entity(&standard, None);
        let (initial, final_) = self.syllables.get(&standard).ok_or_else(|| {
            ReadingError::InvalidEntity(format!("'{plain}' not a valid plain Pinyin syllable"))
        })?;
        if rhotacised {
            Ok((initial.clone(), format!("{final_}r")))
        } else {
            Ok((initial.clone(), final_.clone()))
        }
    }

    fn place_tone_mark(&self, nucleus: &str, tone: u8) -> String {
        if tone == 5 {
            return nfc(nucleus);
        }
        let mark = self.diacritics[usize::from(tone - 1)];
        let chars: Vec<char> = nucleus.chars().collect();
        let split = if chars.len() == 1 || matches!(chars[0].to_lowercase().next(), Some('a' | 'e' | 'o')) {
            1
        } else {
            2
        };
        let mut out: String = chars[..split].iter().collect();
        out.push(mark);
        out.extend(&chars[split..]);
        nfc(&out)
    }
}

fn expand_initial(short: &str) -> Option<&'static str> {
    match short {
        "ẑ" => Some("zh"),
        "ĉ" => Some("ch"),
        "ŝ" => Some("sh"),
        _ => None,
    }
}

fn ng_regex() -> &'static Regex {
    static NG: OnceLock<Regex> = OnceLock::new();
    NG.get_or_init(|| Regex::new("(?i)ng").expect("static pattern"))
}

fn retroflex_regex() -> &'static Regex {
    static RETROFLEX: OnceLock<Regex> = OnceLock::new();
    RETROFLEX.get_or_init(|| Regex::new("(?i)^[zcs]h").expect("static pattern"))
}

fn sound_regex() -> &'static Regex {
    static SOUND: OnceLock<Regex> = OnceLock::new();
    SOUND.get_or_init(|| {
        Regex::new("(?i)^([^aeiuoü]*)([aeiuoü]*)([^aeiuoü]*)$").expect("static pattern")
    })
}

fn alternation<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(regex::escape).collect::<Vec<_>>().join("|")
}

/// Every tone-mark vowel combined with every configured diacritic, NFC.
fn diacritic_vowels(diacritics: &[char; 4]) -> Vec<String> {
    let mut out = Vec::new();
    for vowel in TONEMARK_VOWELS {
        for mark in diacritics {
            out.push(nfc(&format!("{vowel}{mark}")));
        }
    }
    out
}

/// Matches a vowel run followed by one of the diacritics, in NFD.
fn tone_mark_regex(diacritics: &[char; 4]) -> Result<Regex> {
    let mut vowels: Vec<String> = TONEMARK_VOWELS
        .iter()
        .filter(|&&v| !(v == 'ê' && diacritics.contains(&'\u{0302}')))
        .map(|v| nfd(&v.to_string()))
        .collect();
    vowels.sort_unstable_by(|a, b| b.cmp(a));
    let mut marks: Vec<String> = diacritics.iter().map(char::to_string).collect();
    marks.sort_unstable_by(|a, b| b.cmp(a));
    compile(&format!(
        "(?i)((?:{})+)({})",
        alternation(vowels.iter().map(String::as_str)),
        alternation(marks.iter().map(String::as_str)),
    ))
}

fn reading_chars(y_vowel: &str, diacritics: &[char; 4], diacritic_vowels: &[String]) -> HashSet<char> {
    let mut chars: HashSet<char> = ('a'..='z').chain("üêŋẑĉŝ".chars()).collect();
    chars.extend(y_vowel.chars());
    for c in "üêŋẑĉŝ".chars() {
        chars.extend(nfd(&c.to_string()).chars());
    }
    chars.extend(nfd(y_vowel).chars());
    for vowel in diacritic_vowels {
        chars.extend(vowel.chars());
    }
    chars.extend('1'..='5');
    chars.extend(diacritics.iter().copied());
    chars
}

fn plain_entities(
    ctx: &BuildContext,
    diacritics: &[char; 4],
    erhua: Erhua,
    y_vowel: &str,
    shortened: bool,
) -> Result<HashSet<String>> {
    let mut syllables: HashSet<String> = ctx
        .tables
        .entities(TableId::PinyinSyllables)
        .into_iter()
        .map(str::to_string)
        .collect();
    if diacritics.contains(&'\u{0302}') {
        syllables.remove("ê");
    }
    match erhua {
        Erhua::TwoSyllables => {
            syllables.insert("r".to_string());
        }
        Erhua::OneSyllable => {
            let rhotacised: Vec<String> = syllables
                .iter()
                .filter(|s| *s != "e" && *s != "er")
                .map(|s| format!("{s}r"))
                .collect();
            syllables.extend(rhotacised);
        }
        Erhua::Ignore => {}
    }
    if y_vowel != "ü" {
        let mut translated = HashSet::with_capacity(syllables.len());
        for syllable in syllables {
            let syllable = syllable.replace('ü', y_vowel);
            if !translated.insert(syllable.clone()) {
                return Err(ReadingError::UnsupportedOption {
                    reading: Reading::Pinyin.to_string(),
                    name: "yVowel".to_string(),
                    value: format!("{y_vowel} (collides in '{syllable}')"),
                });
            }
        }
        syllables = translated;
    }
    if shortened {
        syllables = syllables
            .into_iter()
            .map(|s| {
                let s = s.replace("ng", "ŋ");
                match s.get(..2) {
                    Some("zh") => format!("ẑ{}", &s[2..]),
                    Some("ch") => format!("ĉ{}", &s[2..]),
                    Some("sh") => format!("ŝ{}", &s[2..]),
                    _ => s,
                }
            })
            .collect();
    }
    Ok(syllables)
}

impl ReadingOperator for PinyinOperator {
    fn reading(&self) -> Reading {
        Reading::Pinyin
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
        let mut out = String::new();
        let mut preceding: Option<&str> = None;
        for entity in entities {
            if self.apostrophe_rule.needs_apostrophe(self, preceding, entity) {
                out.push_str(&self.apostrophe);
            } else if let Some(prev) = preceding {
                if let Some(offending) =
                    fused_entity(self, prev, entity, |c| self.is_reading_char(c), "12345")
                {
                    return Err(undelimitable(offending));
                }
            }
            out.push_str(entity);
            preceding = Some(entity);
        }
        Ok(out)
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        match self.split_entity_tone(entity) {
            Ok((plain, tone)) => {
                if plain.to_lowercase() == "r" && !matches!(tone, None | Some(Tone::Number(5))) {
                    return false;
                }
                self.is_plain_reading_entity(&plain) && self.tones.contains(&tone)
            }
            Err(_) => false,
        }
    }

    fn is_formatting_entity(&self, entity: &str) -> bool {
        self.romanisation.is_formatting_entity(entity)
    }
}

impl TonalOperator for PinyinOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        let plain = nfc(plain);
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(&plain, tone));
        }
        match self.tone_marks {
            PinyinToneMarks::None => Ok(plain),
            PinyinToneMarks::Numbers => match tone {
                None => Ok(plain),
                Some(Tone::Number(5)) if self.missing_tone_mark == MissingToneMark::Fifth => Ok(plain),
                Some(t) => Ok(format!("{plain}{t}")),
            },
            PinyinToneMarks::Diacritics => {
                let Some(Tone::Number(n)) = tone else {
                    return Err(invalid_tone(&plain, tone));
                };
                let lower = plain.to_lowercase();
                let (onset, nucleus, coda) = if SYLLABIC_NUCLEUS_FIRST.contains(&lower.as_str()) {
                    let split = plain.chars().next().map_or(0, char::len_utf8);
                    ("", &plain[..split], &plain[split..])
                } else if SYLLABIC_NUCLEUS_SECOND.contains(&lower.as_str()) {
                    let mut indices = plain.char_indices().map(|(i, _)| i).skip(1);
                    let first = indices.next().unwrap_or(plain.len());
                    let second = indices.next().unwrap_or(plain.len());
                    (&plain[..first], &plain[first..second], &plain[second..])
                } else {
                    let caps = sound_regex().captures(&plain).ok_or_else(|| {
                        ReadingError::InvalidEntity(format!("no nucleus found for '{plain}'"))
                    })?;
                    let group = |i| caps.get(i).map_or("", |m| m.as_str());
                    (group(1), group(2), group(3))
                };
                if nucleus.is_empty() {
                    return Err(ReadingError::InvalidEntity(format!(
                        "no nucleus found for '{plain}'"
                    )));
                }
                Ok(format!("{onset}{}{coda}", self.place_tone_mark(nucleus, n)))
            }
        }
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let entity = nfd(entity);
        let (plain, tone) = match self.tone_marks {
            PinyinToneMarks::None => (entity, None),
            PinyinToneMarks::Numbers => match entity.chars().last().and_then(|c| c.to_digit(10)) {
                Some(d @ 1..=5) => (entity[..entity.len() - 1].to_string(), Some(Tone::Number(d as u8))),
                _ => match self.missing_tone_mark {
                    MissingToneMark::Fifth => (entity, Some(Tone::Number(5))),
                    MissingToneMark::Ignore => {
                        return Err(ReadingError::InvalidEntity(format!(
                            "no tone information given for '{entity}'"
                        )))
                    }
                    _ => (entity, None),
                },
            },
            PinyinToneMarks::Diacritics => {
                let (plain, tone) = match self.tone_mark_regex.captures(&entity) {
                    Some(caps) => {
                        let mark = caps.get(2).and_then(|m| m.as_str().chars().next());
                        let n = self
                            .diacritics
                            .iter()
                            .position(|d| Some(*d) == mark)
                            .map_or(5, |i| i as u8 + 1);
                        (self.strip_first_tone_mark(&entity), Tone::Number(n))
                    }
                    None => (entity.clone(), Tone::Number(5)),
                };
                if self.strict_diacritic_placement && nfc(&entity) != self.tonal_entity(&plain, Some(tone))? {
                    return Err(ReadingError::InvalidEntity(format!(
                        "wrong placement of diacritic for '{entity}' while strict checking enforced"
                    )));
                }
                (plain, Some(tone))
            }
        };
        Ok((nfc(&plain), tone))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.plain.contains(&entity.to_lowercase())
    }
}

impl RomanisationOperator for PinyinOperator {
    fn romanisation(&self) -> &Romanisation {
        &self.romanisation
    }

    fn has_entity_substring(&self, lower: &str) -> bool {
        if self.tone_marks == PinyinToneMarks::Diacritics {
            let stripped = nfc(&self.strip_first_tone_mark(&nfd(lower)));
            self.plain_prefixes.contains(&stripped)
        } else {
            self.romanisation.has_prefix(lower)
        }
    }

    fn is_strict_decomposition(&self, entities: &[&str]) -> bool {
        let mut preceding: Option<&str> = None;
        for &entity in entities {
            if self.is_reading_entity(entity) {
                if self.apostrophe_rule.needs_apostrophe(self, preceding, entity) {
                    return false;
                }
                preceding = Some(entity);
            } else {
                preceding = None;
            }
        }
        true
    }
}

fn guess_entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        let vowels = guess_diacritic_vowels();
        let pattern = format!(
            "(?i)((?:{}|{}|[a-uw-zêŋẑĉŝ])+[12345]?)",
            alternation(vowels.iter().map(String::as_str)),
            alternation(Y_VOWEL_LIST.into_iter()),
        );
        Regex::new(&pattern).expect("static pattern")
    })
}

fn guess_diacritic_vowels() -> Vec<String> {
    let mut out = Vec::new();
    for vowel in TONEMARK_VOWELS {
        for marks in DIACRITICS_LIST {
            for mark in marks.iter() {
                out.push(nfc(&format!("{vowel}{mark}")));
            }
        }
    }
    out
}

fn cleared_marks_regex() -> &'static Regex {
    static CLEAR: OnceLock<Regex> = OnceLock::new();
    CLEAR.get_or_init(|| Regex::new("(?i)([ezcs]\u{0302}|u\u{0308})").expect("static pattern"))
}

/// Guess tone mark type, diacritics, ü substitute, apostrophe, erhua
/// handling and shortened letters from a text.
pub(crate) fn guess_reading_dialect(text: &str) -> OptionMap {
    let text = nfc(text);
    let lower = text.to_lowercase();
    let vowels = guess_diacritic_vowels();

    let mut diacritic_count = 0;
    let mut number_count = 0;
    for m in guess_entity_regex().find_iter(&text) {
        let entity = m.as_str();
        if entity.ends_with(|c: char| ('1'..='5').contains(&c)) {
            number_count += 1;
        } else {
            let entity = entity.to_lowercase();
            if vowels.iter().any(|v| v != "ê" && entity.contains(v.as_str())) {
                diacritic_count += 1;
            }
        }
    }
    let tone_marks = if diacritic_count > number_count {
        PinyinToneMarks::Diacritics
    } else {
        PinyinToneMarks::Numbers
    };

    let mut diacritics: Vec<char> = DEFAULT_DIACRITICS.chars().collect();
    if tone_marks == PinyinToneMarks::Diacritics {
        let cleared = cleared_marks_regex().replace_all(&nfd(&text), "").into_owned();
        for (slot, marks) in diacritics.iter_mut().zip(DIACRITICS_LIST) {
            if !cleared.contains(*slot) {
                if let Some(mark) = marks.iter().find(|m| cleared.contains(**m)) {
                    *slot = *mark;
                }
            }
        }
    }

    let y_vowel = if tone_marks == PinyinToneMarks::Diacritics {
        "ü"
    } else {
        Y_VOWEL_LIST
            .into_iter()
            .find(|v| lower.contains(v))
            .unwrap_or("ü")
    };

    let apostrophe = APOSTROPHE_LIST
        .into_iter()
        .find(|a| text.contains(*a))
        .unwrap_or('\'');

    let mut erhua = Erhua::TwoSyllables;
    if tone_marks == PinyinToneMarks::Numbers {
        let chars: Vec<char> = lower.chars().collect();
        for (i, _) in chars.iter().enumerate().skip(2).filter(|(_, c)| **c == 'r') {
            match chars.get(i + 1) {
                Some(next) if !next.is_alphabetic() => {
                    if !chars[i - 1].is_alphabetic() {
                        break;
                    }
                    erhua = Erhua::OneSyllable;
                }
                _ => {}
            }
        }
    }

    let shortened = lower.chars().any(|c| "ŋẑĉŝ".contains(c));

    let mut map = OptionMap::new();
    map.insert("toneMarkType".into(), tone_marks.name().into());
    map.insert("pinyinDiacritics".into(), diacritics.into_iter().collect::<String>().into());
    map.insert("yVowel".into(), y_vowel.into());
    map.insert("pinyinApostrophe".into(), apostrophe.to_string().into());
    map.insert("erhua".into(), erhua.name().into());
    map.insert("shortenedLetters".into(), shortened.into());
    map
}
