//! Wade-Giles.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::romanisation::{self, fused_entity, undelimitable, Romanisation, RomanisationOperator};
use super::{compile, invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, Choice, MissingToneMark, OptionMap, OptionReader, RomanisationOptions};
use crate::reading::Reading;
use crate::table::TableId;
use crate::unicode::{is_title, is_upper, nfc, nfd, to_title};

/// Aspiration apostrophe used by the syllable table.
const TABLE_APOSTROPHE: &str = "’";
const SUPERSCRIPTS: [char; 6] = ['⁰', '¹', '²', '³', '⁴', '⁵'];
const APOSTROPHE_LIST: [&str; 9] = ["'", "’", "´", "‘", "`", "ʼ", "ˈ", "′", "ʻ"];
const ZERO_FINAL_LIST: [&str; 3] = ["ŭ", "ǔ", "u"];
const DIACRITIC_E_LIST: [&str; 3] = ["ê", "ě", "e"];
const UMLAUT_U_LIST: [&str; 2] = ["ü", "u"];

option_choice! {
    pub enum WadeGilesToneMarks {
        Numbers => "numbers",
        SuperscriptNumbers => "superscriptNumbers",
        None => "none",
    }
}

option_choice! {
    /// How the neutral tone is written.
    pub enum NeutralToneMark {
        None => "none",
        Zero => "zero",
        Five => "five",
    }
}

/// A vowel that writers commonly drop a diacritic from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VowelOption {
    DiacriticE,
    ZeroFinal,
    UmlautU,
}

impl VowelOption {
    const ALL: [VowelOption; 3] = [VowelOption::DiacriticE, VowelOption::ZeroFinal, VowelOption::UmlautU];

    /// The undecorated letter a writer substitutes.
    fn plain_vowel(self) -> &'static str {
        match self {
            VowelOption::DiacriticE => "e",
            VowelOption::ZeroFinal | VowelOption::UmlautU => "u",
        }
    }

    fn default_form(self) -> &'static str {
        match self {
            VowelOption::DiacriticE => "ê",
            VowelOption::ZeroFinal => "ŭ",
            VowelOption::UmlautU => "ü",
        }
    }
}

/// Outcome of checking a plain entity written with an undecorated vowel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainEntityCheck {
    /// The spelling is correct as written.
    Strict,
    /// The vowel stands for its decorated form.
    Lost,
    /// Both readings exist.
    Ambiguous,
}

pub struct WadeGilesOperator {
    options: OptionMap,
    romanisation: Romanisation,
    diacritic_e: String,
    zero_final: String,
    umlaut_u: String,
    use_initial_sz: bool,
    apostrophe: String,
    neutral_tone_mark: NeutralToneMark,
    tone_marks: WadeGilesToneMarks,
    missing_tone_mark: MissingToneMark,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    table_syllables: HashSet<String>,
    reading_chars: HashSet<char>,
}

impl WadeGilesOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::WadeGiles, given);
        let rom = RomanisationOptions::read(&mut reader)?;
        let non_empty = |s: &str| !s.is_empty();
        let diacritic_e = reader.string("diacriticE", "ê", non_empty)?;
        let zero_final = reader.string("zeroFinal", "ŭ", non_empty)?;
        let umlaut_u = reader.string("umlautU", "ü", non_empty)?;
        let use_initial_sz = reader.bool("useInitialSz", false)?;
        let apostrophe = reader.string("wadeGilesApostrophe", TABLE_APOSTROPHE, non_empty)?;
        let neutral_tone_mark = reader.choice("neutralToneMark", NeutralToneMark::None)?;
        let tone_marks = reader.choice("toneMarkType", WadeGilesToneMarks::SuperscriptNumbers)?;
        let missing_tone_mark = reader.choice_among(
            "missingToneMark",
            MissingToneMark::NoInfo,
            &[MissingToneMark::NoInfo, MissingToneMark::Ignore],
        )?;
        let options = reader.finish()?;

        let mut tones: Vec<Option<Tone>> = (1..=5).map(|n| Some(Tone::Number(n))).collect();
        if tone_marks == WadeGilesToneMarks::None
            || (neutral_tone_mark != NeutralToneMark::None && missing_tone_mark == MissingToneMark::NoInfo)
        {
            tones.push(None);
        }

        let table_syllables: HashSet<String> = ctx
            .tables
            .entities(TableId::WadeGiles)
            .into_iter()
            .filter_map(|s| ctx.tables.entity_data(TableId::WadeGiles, s)?.first().cloned())
            .collect();
        let plain = table_syllables
            .iter()
            .map(|s| {
                let mut s = s.replace(TABLE_APOSTROPHE, &apostrophe).replace('ê', &diacritic_e);
                s = s.replace('ŭ', &zero_final);
                if use_initial_sz && s.starts_with("ss") {
                    s = format!("sz{}", &s[2..]);
                }
                s.replace('ü', &umlaut_u)
            })
            .collect();

        let mut reading_chars: HashSet<char> = ('a'..='z').chain("üêŭ".chars()).collect();
        for custom in [&diacritic_e, &zero_final, &umlaut_u] {
            reading_chars.extend(custom.chars());
            reading_chars.extend(nfd(custom).chars());
        }
        reading_chars.extend(nfd("üêŭ").chars());
        reading_chars.extend(('0'..='5').chain(SUPERSCRIPTS));
        reading_chars.extend(apostrophe.chars());

        let run = compile(&format!(
            "(?i)((?:{}|{}|{}|{}|[a-züêŭ])+[012345⁰¹²³⁴⁵]?)",
            regex::escape(&apostrophe),
            regex::escape(&diacritic_e),
            regex::escape(&zero_final),
            regex::escape(&umlaut_u),
        ))?;
        let romanisation = Romanisation::new(rom, ctx.best_effort, run, ["-".to_string()]);

        let mut op = Self {
            options,
            romanisation,
            diacritic_e,
            zero_final,
            umlaut_u,
            use_initial_sz,
            apostrophe,
            neutral_tone_mark,
            tone_marks,
            missing_tone_mark,
            tones,
            plain,
            table_syllables,
            reading_chars,
        };
        let entities = super::tonal_reading_entities(&op);
        op.romanisation.set_reading_entities(entities);
        Ok(op)
    }

    pub fn apostrophe(&self) -> &str {
        &self.apostrophe
    }

    pub fn tone_mark_type(&self) -> WadeGilesToneMarks {
        self.tone_marks
    }

    fn vowel_form(&self, option: VowelOption) -> &str {
        match option {
            VowelOption::DiacriticE => &self.diacritic_e,
            VowelOption::ZeroFinal => &self.zero_final,
            VowelOption::UmlautU => &self.umlaut_u,
        }
    }

    /// Drop hyphens standing between two reading entities.
    pub fn remove_hyphens(&self, entities: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(entities.len());
        let mut i = 0;
        while i < entities.len() {
            out.push(entities[i].clone());
            if i + 2 < entities.len()
                && entities[i + 1] == "-"
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

    /// Whether `plain`, written with the undecorated vowel for `option`, is
    /// correct, stands for the decorated vowel, or could be either.
    pub fn check_plain_entity(&self, plain: &str, option: VowelOption) -> Result<PlainEntityCheck> {
        let plain = nfc(plain).to_lowercase();
        let vowel = option.plain_vowel();
        let original = option.default_form();
        if plain.is_empty()
            || !plain.contains(vowel)
            || !(self.is_plain_reading_entity(&plain)
                || self.is_plain_reading_entity(&plain.replace(vowel, original)))
        {
            return Err(ReadingError::InvalidEntity(format!(
                "not a plain reading entity or no vowel '{vowel}': '{plain}'"
            )));
        }
        let mut form = plain.replace(&self.apostrophe, TABLE_APOSTROPHE);
        if let Some(rest) = form.strip_prefix("sz") {
            form = format!("ss{rest}");
        }
        let decorated = form.replace(vowel, original);
        let found: Vec<&String> = [&form, &decorated]
            .into_iter()
            .filter(|f| self.table_syllables.contains(f.as_str()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        Ok(match found.as_slice() {
            [_, _] => PlainEntityCheck::Ambiguous,
            [] => PlainEntityCheck::Strict,
            [only] if only.contains(vowel) => PlainEntityCheck::Strict,
            _ => PlainEntityCheck::Lost,
        })
    }

    /// Rewrite a plain entity for the spelling conventions of `target`;
    /// `None` means the defaults. Recovers decorated vowels where the
    /// syllable inventory allows, and fails with `AmbiguousConversion` where
    /// it does not.
    pub fn convert_plain_entity(&self, plain: &str, target: Option<&WadeGilesOperator>) -> Result<String> {
        let mut converted = plain.to_lowercase();
        for option in VowelOption::ALL {
            let from = self.vowel_form(option);
            let to = target.map_or(option.default_form(), |t| t.vowel_form(option));
            if from == to {
                continue;
            }
            if from == option.plain_vowel() && converted.contains(from) {
                match self.check_plain_entity(&converted, option)? {
                    PlainEntityCheck::Ambiguous => {
                        return Err(ReadingError::AmbiguousConversion(format!(
                            "conversion for entity '{converted}' is ambiguous: {converted}, {}",
                            converted.replace(from, to)
                        )))
                    }
                    PlainEntityCheck::Lost => converted = converted.replace(from, to),
                    PlainEntityCheck::Strict => {}
                }
            } else {
                converted = converted.replace(from, to);
            }
        }
        let to_apostrophe = target.map_or(TABLE_APOSTROPHE, |t| t.apostrophe.as_str());
        if self.apostrophe != to_apostrophe {
            converted = converted.replace(&self.apostrophe, to_apostrophe);
        }
        let to_sz = target.is_some_and(|t| t.use_initial_sz);
        let written_initial = if self.use_initial_sz { "sz" } else { "ss" };
        if let Some(rest) = converted.strip_prefix(written_initial) {
            converted = format!("{}{rest}", if to_sz { "sz" } else { "ss" });
        }
        Ok(if is_upper(plain) {
            converted.to_uppercase()
        } else if is_title(plain) {
            to_title(&converted)
        } else {
            converted
        })
    }
}

impl ReadingOperator for WadeGilesOperator {
    fn reading(&self) -> Reading {
        Reading::WadeGiles
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
            if let Some(prev) = preceding.filter(|p| !p.is_empty() && !entity.is_empty()) {
                if self.is_reading_entity(prev) && self.is_reading_entity(entity) {
                    out.push('-');
                } else {
                    let is_reading_char = |c| self.reading_chars.contains(&c);
                    let tone_digits = "12345¹²³⁴⁵";
                    let offending = fused_entity(self, prev, entity, is_reading_char, tone_digits)
                        .or_else(|| {
                            let first = entity.chars().next()?;
                            let last = prev.chars().last()?;
                            (prev == self.apostrophe
                                && prev != entity
                                && is_reading_char(first)
                                && !tone_digits.contains(last))
                                .then_some(prev)
                        });
                    if let Some(offending) = offending {
                        return Err(undelimitable(offending));
                    }
                }
            }
            out.push_str(entity);
            preceding = Some(entity);
        }
        Ok(out)
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        tonal_is_reading_entity(self, entity)
    }

    fn is_formatting_entity(&self, entity: &str) -> bool {
        self.romanisation.is_formatting_entity(entity)
    }
}

impl TonalOperator for WadeGilesOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        let n = match tone {
            Some(Tone::Number(n)) => n,
            _ => return Ok(plain.to_string()),
        };
        if self.tone_marks == WadeGilesToneMarks::None
            || (n == 5 && self.neutral_tone_mark == NeutralToneMark::None)
        {
            return Ok(plain.to_string());
        }
        let digit = if n == 5 && self.neutral_tone_mark == NeutralToneMark::Zero {
            0
        } else {
            n
        };
        let mark = match self.tone_marks {
            WadeGilesToneMarks::Numbers => char::from(b'0' + digit),
            _ => SUPERSCRIPTS[usize::from(digit)],
        };
        Ok(format!("{plain}{mark}"))
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        if self.tone_marks == WadeGilesToneMarks::None {
            return Ok((entity.to_string(), None));
        }
        let last = entity.chars().last();
        let mark = match self.tone_marks {
            WadeGilesToneMarks::Numbers => last.and_then(|c| c.to_digit(10)).filter(|d| *d <= 5),
            _ => last.and_then(|c| SUPERSCRIPTS.iter().position(|s| *s == c)).map(|d| d as u32),
        };
        let invalid = match (self.neutral_tone_mark, mark) {
            (NeutralToneMark::None, Some(0 | 5)) => true,
            (NeutralToneMark::Zero, Some(5)) => true,
            (NeutralToneMark::Five, Some(0)) => true,
            _ => false,
        };
        if invalid {
            return Err(ReadingError::InvalidEntity(format!(
                "invalid tone information given for '{entity}'"
            )));
        }
        match mark {
            Some(d) => {
                let split = entity.len() - last.map_or(0, char::len_utf8);
                let n = if d == 0 { 5 } else { d as u8 };
                Ok((entity[..split].to_string(), Some(Tone::Number(n))))
            }
            None if self.neutral_tone_mark == NeutralToneMark::None => {
                Ok((entity.to_string(), Some(Tone::Number(5))))
            }
            None if self.missing_tone_mark == MissingToneMark::NoInfo => Ok((entity.to_string(), None)),
            None => Err(ReadingError::InvalidEntity(format!(
                "no tone information given for '{entity}'"
            ))),
        }
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.romanisation.accepts_case(entity) && self.plain.contains(&entity.to_lowercase())
    }
}

impl RomanisationOperator for WadeGilesOperator {
    fn romanisation(&self) -> &Romanisation {
        &self.romanisation
    }
}

fn alternation(items: &[&str]) -> String {
    items.iter().map(|s| regex::escape(s)).collect::<Vec<_>>().join("|")
}

fn syllable_regex() -> &'static Regex {
    static SYLLABLE: OnceLock<Regex> = OnceLock::new();
    SYLLABLE.get_or_init(|| {
        let vowels: Vec<&str> = ZERO_FINAL_LIST
            .iter()
            .chain(DIACRITIC_E_LIST.iter())
            .chain(UMLAUT_U_LIST.iter())
            .copied()
            .collect();
        Regex::new(&format!(
            "(?i)((?:(?:ch|hs|sh|ts|tz|ss|sz|[pmftnlkhjyw])(?:{})?)?(?:{}|[aeiou])+(?:ng|n|rh|h)?[012345⁰¹²³⁴⁵]?)",
            alternation(&APOSTROPHE_LIST),
            alternation(&vowels),
        ))
        .expect("static pattern")
    })
}

fn zero_final_regex() -> &'static Regex {
    static ZERO: OnceLock<Regex> = OnceLock::new();
    ZERO.get_or_init(|| {
        Regex::new(&format!(
            "(?i)^(?:tz|ss|sz)(?:{})?({})",
            alternation(&APOSTROPHE_LIST),
            alternation(&ZERO_FINAL_LIST),
        ))
        .expect("static pattern")
    })
}

fn diacritic_e_regex() -> &'static Regex {
    static E: OnceLock<Regex> = OnceLock::new();
    E.get_or_init(|| {
        Regex::new(&format!(
            "(?i)^(?:(?:ch|hs|sh|ts|[pmftnlkhjyw])(?:{})?)?({})(?:ng|n|rh)?",
            alternation(&APOSTROPHE_LIST),
            alternation(&DIACRITIC_E_LIST),
        ))
        .expect("static pattern")
    })
}

fn umlaut_u_regex() -> &'static Regex {
    static U: OnceLock<Regex> = OnceLock::new();
    U.get_or_init(|| {
        Regex::new(&format!(
            "(?i)^(?:ch|hs|[nly])(?:{})?({}|)[ae]?(?:n|h)?",
            alternation(&APOSTROPHE_LIST),
            alternation(&UMLAUT_U_LIST),
        ))
        .expect("static pattern")
    })
}

/// Guess vowel forms, tone marks, neutral tone mark, apostrophe and the sz
/// initial from a text.
pub(crate) fn guess_reading_dialect(text: &str) -> OptionMap {
    let text = nfc(&text.to_lowercase());
    let entities: Vec<&str> = syllable_regex().find_iter(&text).map(|m| m.as_str()).collect();

    let mut use_initial_sz = false;
    let mut zero_final = text.contains('ŭ').then(|| "ŭ".to_string());
    let mut diacritic_e = text.contains('ê').then(|| "ê".to_string());
    let mut umlaut_u = text.contains('ü').then(|| "ü".to_string());
    for entity in &entities {
        if entity.starts_with("sz") {
            use_initial_sz = true;
        }
        if zero_final.is_none() {
            zero_final = zero_final_regex()
                .captures(entity)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
        }
        if diacritic_e.is_none() {
            diacritic_e = diacritic_e_regex()
                .captures(entity)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());
        }
        if umlaut_u.is_none() {
            if let Some(caps) = umlaut_u_regex().captures(entity) {
                let vowel = caps.get(1).map_or("", |m| m.as_str());
                let whole = caps.get(0).map_or("", |m| m.as_str());
                if !vowel.is_empty() && vowel != "u"
                    || whole.starts_with("hs")
                    || (whole.starts_with('y') && !whole.starts_with("yu"))
                    || whole.ends_with("ueh")
                    || whole.ends_with("uo")
                {
                    umlaut_u = Some(vowel.to_string());
                }
            }
        }
    }

    let ends_with = |e: &str, set: &str| e.chars().last().is_some_and(|c| set.contains(c));
    let digit_count = entities.iter().filter(|e| ends_with(e, "012345")).count();
    let superscript_count = entities.iter().filter(|e| ends_with(e, "⁰¹²³⁴⁵")).count();
    let tone_marks = if digit_count > superscript_count {
        WadeGilesToneMarks::Numbers
    } else {
        WadeGilesToneMarks::SuperscriptNumbers
    };
    let neutral = if digit_count > 0 || superscript_count > 0 {
        let zeros = entities.iter().filter(|e| ends_with(e, "⁰0")).count();
        let fives = entities.iter().filter(|e| ends_with(e, "⁵5")).count();
        if zeros > fives {
            NeutralToneMark::Zero
        } else if fives != 0 {
            NeutralToneMark::Five
        } else {
            NeutralToneMark::None
        }
    } else {
        NeutralToneMark::Zero
    };
    let apostrophe = APOSTROPHE_LIST
        .into_iter()
        .find(|a| text.contains(a))
        .unwrap_or(TABLE_APOSTROPHE);

    let non_empty_or = |v: Option<String>, default: &str| {
        v.filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
    };
    let mut map = OptionMap::new();
    map.insert("wadeGilesApostrophe".into(), apostrophe.into());
    map.insert("toneMarkType".into(), tone_marks.name().into());
    map.insert("neutralToneMark".into(), neutral.name().into());
    map.insert("diacriticE".into(), non_empty_or(diacritic_e, "ê").into());
    map.insert("zeroFinal".into(), non_empty_or(zero_final, "ŭ").into());
    map.insert("umlautU".into(), non_empty_or(umlaut_u, "ü").into());
    map.insert("useInitialSz".into(), use_initial_sz.into());
    map
}
