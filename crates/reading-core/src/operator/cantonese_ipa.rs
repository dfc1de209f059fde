//! Cantonese in IPA.
//!
//! Syllables ending in an unreleased stop carry one of the level tones. With
//! `stopTones = general` they are reported as stopped tones instead, and with
//! `explicit` the stopped tone also records whether the vowel is short or
//! long.

use std::collections::{HashMap, HashSet};

use super::tonal_ipa::{self, named, IpaMarks, IpaToneMarks, MarkTable};
use super::{invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{tone_label, Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{option_choice, OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::TableId;

pub(crate) const TONES: [&str; 7] = [
    "HighLevel",
    "MidLevel",
    "MidLowLevel",
    "HighRising",
    "MidLowRising",
    "MidLowFalling",
    "HighFalling",
];

/// Stopped tone and the level tone it belongs to.
const STOP_TONES: [(&str, &str); 3] = [
    ("HighStopped", "HighLevel"),
    ("MidStopped", "MidLevel"),
    ("MidLowStopped", "MidLowLevel"),
];

/// Stopped tone with vowel length, its level tone and the length flag.
const STOP_TONES_EXPLICIT: [(&str, &str, &str); 6] = [
    ("HighStopped_Short", "HighLevel", "S"),
    ("MidStopped_Short", "MidLevel", "S"),
    ("MidLowStopped_Short", "MidLowLevel", "S"),
    ("HighStopped_Long", "HighLevel", "L"),
    ("MidStopped_Long", "MidLevel", "L"),
    ("MidLowStopped_Long", "MidLowLevel", "L"),
];

const NUMBERS: MarkTable = &[
    ("HighLevel", "1"),
    ("MidLevel", "3"),
    ("MidLowLevel", "6"),
    ("HighRising", "2"),
    ("MidLowRising", "5"),
    ("MidLowFalling", "4"),
    ("HighFalling", "1"),
    ("HighStopped_Short", "1"),
    ("MidStopped_Short", "3"),
    ("MidLowStopped_Short", "6"),
    ("HighStopped_Long", "1"),
    ("MidStopped_Long", "3"),
    ("MidLowStopped_Long", "6"),
];

const CHAO_DIGITS: MarkTable = &[
    ("HighLevel", "55"),
    ("MidLevel", "33"),
    ("MidLowLevel", "22"),
    ("HighRising", "25"),
    ("MidLowRising", "23"),
    ("MidLowFalling", "21"),
    ("HighFalling", "52"),
    ("HighStopped_Short", "5"),
    ("MidStopped_Short", "3"),
    ("MidLowStopped_Short", "2"),
    ("HighStopped_Long", "55"),
    ("MidStopped_Long", "33"),
    ("MidLowStopped_Long", "22"),
];

const TONE_BARS: MarkTable = &[
    ("HighLevel", "˥˥"),
    ("MidLevel", "˧˧"),
    ("MidLowLevel", "˨˨"),
    ("HighRising", "˨˥"),
    ("MidLowRising", "˨˧"),
    ("MidLowFalling", "˨˩"),
    ("HighFalling", "˥˨"),
    ("HighStopped_Short", "˥"),
    ("MidStopped_Short", "˧"),
    ("MidLowStopped_Short", "˨"),
    ("HighStopped_Long", "˥˥"),
    ("MidStopped_Long", "˧˧"),
    ("MidLowStopped_Long", "˨˨"),
];

/// Shared marks and the tone they are read as.
const PREFER_NUMBERS: MarkTable = &[("1", "HighLevel"), ("3", "MidLevel"), ("6", "MidLowLevel")];
const PREFER_CHAO_DIGITS: MarkTable = &[("55", "HighLevel"), ("33", "MidLevel"), ("22", "MidLowLevel")];
const PREFER_TONE_BARS: MarkTable = &[("˥˥", "HighLevel"), ("˧˧", "MidLevel"), ("˨˨", "MidLowLevel")];

option_choice! {
    /// How tones of syllables with an unreleased stop are reported.
    pub enum StopTones {
        None => "none",
        General => "general",
        Explicit => "explicit",
    }
}

/// The level tone a tone name belongs to.
pub(crate) fn base_tone(tone: &'static str) -> &'static str {
    if let Some((_, base)) = STOP_TONES.iter().find(|(t, _)| *t == tone) {
        return base;
    }
    if let Some((_, base, _)) = STOP_TONES_EXPLICIT.iter().find(|(t, _, _)| *t == tone) {
        return base;
    }
    tone
}

/// The explicit stopped tone for a level tone (or a general stopped tone)
/// and vowel length.
fn stop_tone_for(tone: &str, length: &str) -> Option<&'static str> {
    let level = STOP_TONES
        .iter()
        .find(|(t, _)| *t == tone)
        .map_or(tone, |(_, base)| *base);
    STOP_TONES_EXPLICIT
        .iter()
        .find(|(_, base, l)| *base == level && *l == length)
        .map(|(t, _, _)| *t)
}

fn has_stop_lookup(tone: &str) -> bool {
    STOP_TONES.iter().any(|(t, base)| *t == tone || *base == tone)
}

pub struct CantoneseIpaOperator {
    options: OptionMap,
    marks: IpaMarks,
    stop_tones: StopTones,
    first_tone: &'static str,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    syllables: HashMap<String, (String, String)>,
    /// Vowel length (`S` or `L`) of syllables with an unreleased final.
    unreleased: HashMap<String, String>,
}

impl CantoneseIpaOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::CantoneseIpa, given);
        let marks = IpaMarks::read(
            &mut reader,
            IpaToneMarks::IpaToneBar,
            &[
                (IpaToneMarks::Numbers, NUMBERS),
                (IpaToneMarks::ChaoDigits, CHAO_DIGITS),
                (IpaToneMarks::IpaToneBar, TONE_BARS),
            ],
            &[
                (IpaToneMarks::Numbers, PREFER_NUMBERS),
                (IpaToneMarks::ChaoDigits, PREFER_CHAO_DIGITS),
                (IpaToneMarks::IpaToneBar, PREFER_TONE_BARS),
            ],
        )?;
        let first_tone = reader.string("firstToneName", TONES[0], |s| TONES.contains(&s))?;
        let stop_tones = reader.choice("stopTones", StopTones::None)?;
        let options = reader.finish()?;
        let first_tone = TONES.iter().copied().find(|t| *t == first_tone).unwrap_or(TONES[0]);

        let mut tones: Vec<Option<Tone>> = TONES.iter().map(|t| Some(Tone::Named(t))).collect();
        match stop_tones {
            StopTones::General => tones.extend(STOP_TONES.iter().map(|(t, _)| Some(Tone::Named(t)))),
            StopTones::Explicit => tones.extend(STOP_TONES_EXPLICIT.iter().map(|(t, _, _)| Some(Tone::Named(t)))),
            StopTones::None => {}
        }
        if marks.allows_no_tone() {
            tones.push(None);
        }

        let mut syllables = HashMap::new();
        let mut unreleased = HashMap::new();
        for jyutping in ctx.tables.entities(TableId::CantoneseIpa) {
            if let Some([initial, final_, length]) = ctx.tables.entity_data(TableId::CantoneseIpa, jyutping) {
                let ipa = format!("{initial}{final_}");
                if !length.is_empty() {
                    unreleased.insert(ipa.clone(), length.clone());
                }
                syllables.insert(ipa, (initial.clone(), final_.clone()));
            }
        }
        let plain = syllables.keys().cloned().collect();
        Ok(Self {
            options,
            marks,
            stop_tones,
            first_tone,
            tones,
            plain,
            syllables,
            unreleased,
        })
    }

    pub fn tone_mark_type(&self) -> IpaToneMarks {
        self.marks.marks()
    }

    pub fn stop_tones(&self) -> StopTones {
        self.stop_tones
    }

    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        self.syllables
            .get(plain)
            .cloned()
            .ok_or_else(|| ReadingError::InvalidEntity(format!("'{plain}' not a valid IPA form in this system")))
    }

    /// Whether the syllable ends in an unreleased stop.
    pub fn has_stop_tone(&self, plain: &str) -> bool {
        self.unreleased.contains_key(plain)
    }

    /// `tone` refined to the explicit stopped tone for stop syllables.
    pub fn explicit_tone(&self, plain: &str, tone: Option<&'static str>) -> Result<Option<&'static str>> {
        let Some(tone) = tone.filter(|t| has_stop_lookup(t)) else {
            return Ok(tone);
        };
        match self.unreleased.get(plain) {
            Some(length) => Ok(stop_tone_for(tone, length).or(Some(tone))),
            None if STOP_TONES.iter().any(|(t, _)| *t == tone) => Err(ReadingError::InvalidEntity(format!(
                "invalid tone information given for '{plain}': '{tone}'"
            ))),
            None => Ok(Some(tone)),
        }
    }

    fn tone_valid(&self, plain: &str, tone: Option<Tone>) -> Result<bool> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        let name = tone.and_then(Tone::name);
        let in_tones = |n: Option<&str>| n.is_some_and(|n| TONES.contains(&n));
        if !self.has_stop_tone(plain) {
            return Ok(name.is_none() || in_tones(name));
        }
        Ok(match self.stop_tones {
            StopTones::None => matches!(name, None | Some("HighLevel" | "MidLevel" | "MidLowLevel")),
            StopTones::General => !in_tones(name),
            StopTones::Explicit => match name {
                None => true,
                Some(n) => STOP_TONES_EXPLICIT
                    .iter()
                    .find(|(t, _, _)| *t == n)
                    .is_some_and(|(_, _, length)| self.unreleased.get(plain).is_some_and(|l| l == length)),
            },
        })
    }

    fn check_tone(&self, plain: &str, tone: Option<Tone>) -> Result<()> {
        if self.tone_valid(plain, tone)? {
            Ok(())
        } else {
            Err(ReadingError::InvalidEntity(format!(
                "syllable '{plain}' can not occur with tone '{}'",
                tone_label(tone)
            )))
        }
    }
}

impl ReadingOperator for CantoneseIpaOperator {
    fn reading(&self) -> Reading {
        Reading::CantoneseIpa
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    fn decompose(&self, text: &str) -> Result<Decomposition> {
        Ok(tonal_ipa::decompose(self, text))
    }

    fn compose(&self, entities: &[String]) -> Result<String> {
        Ok(tonal_ipa::compose(self, entities))
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        tonal_is_reading_entity(self, entity)
    }

    fn is_formatting_entity(&self, entity: &str) -> bool {
        tonal_ipa::is_separator(entity)
    }
}

impl TonalOperator for CantoneseIpaOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        self.check_tone(plain, tone)?;
        let explicit = self.explicit_tone(plain, tone.and_then(Tone::name))?;
        Ok(self.marks.apply(plain, explicit))
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let (plain, mark_tone) = self.marks.split(entity)?;
        let mut base = mark_tone.map(base_tone);
        if !self.tones.contains(&named(base)) {
            return Err(ReadingError::InvalidEntity(format!("invalid entity given for '{entity}'")));
        }
        if self.marks.marks() == IpaToneMarks::Numbers && base == Some("HighLevel") && !self.has_stop_tone(&plain) {
            base = Some(self.first_tone);
        }
        let tone = match (self.stop_tones, base) {
            (StopTones::None, _) | (_, None) => base,
            (mode, Some(_)) => {
                let explicit = self.explicit_tone(&plain, base)?;
                match explicit {
                    Some(t) if TONES.contains(&t) || mode == StopTones::Explicit => Some(t),
                    Some(t) => Some(t.split('_').next().map_or(t, |general| {
                        STOP_TONES.iter().map(|(g, _)| *g).find(|g| *g == general).unwrap_or(t)
                    })),
                    None => None,
                }
            }
        };
        let tone = named(tone);
        self.check_tone(&plain, tone)?;
        Ok((plain, tone))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }
}
