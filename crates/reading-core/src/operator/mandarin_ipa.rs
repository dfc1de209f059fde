//! Mandarin in IPA.

use std::collections::{HashMap, HashSet};

use super::tonal_ipa::{self, named, IpaMarks, IpaToneMarks, MarkTable};
use super::{invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::TableId;

pub(crate) const TONES: [&str; 10] = [
    "1stTone",
    "2ndTone",
    "3rdToneRegular",
    "3rdToneLow",
    "4thTone",
    "5thTone",
    "5thToneHalfHigh",
    "5thToneMiddle",
    "5thToneHalfLow",
    "5thToneLow",
];

const NUMBERS: MarkTable = &[
    ("1stTone", "1"),
    ("2ndTone", "2"),
    ("3rdToneRegular", "3"),
    ("3rdToneLow", "3"),
    ("4thTone", "4"),
    ("5thTone", "5"),
    ("5thToneHalfHigh", "5"),
    ("5thToneMiddle", "5"),
    ("5thToneHalfLow", "5"),
    ("5thToneLow", "5"),
];

const CHAO_DIGITS: MarkTable = &[
    ("1stTone", "55"),
    ("2ndTone", "35"),
    ("3rdToneRegular", "214"),
    ("3rdToneLow", "21"),
    ("4thTone", "51"),
    ("5thTone", ""),
    ("5thToneHalfHigh", ""),
    ("5thToneMiddle", ""),
    ("5thToneHalfLow", ""),
    ("5thToneLow", ""),
];

const TONE_BARS: MarkTable = &[
    ("1stTone", "˥˥"),
    ("2ndTone", "˧˥"),
    ("3rdToneRegular", "˨˩˦"),
    ("3rdToneLow", "˨˩"),
    ("4thTone", "˥˩"),
    ("5thTone", ""),
    ("5thToneHalfHigh", "꜉"),
    ("5thToneMiddle", "꜊"),
    ("5thToneHalfLow", "꜋"),
    ("5thToneLow", "꜌"),
];

/// Shared marks and the tone they are read as.
const PREFER_NUMBERS: MarkTable = &[("3", "3rdToneRegular"), ("5", "5thTone")];
const PREFER_CHAO_DIGITS: MarkTable = &[("", "5thTone")];

pub struct MandarinIpaOperator {
    options: OptionMap,
    marks: IpaMarks,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    syllables: HashMap<String, (String, String)>,
}

impl MandarinIpaOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::MandarinIpa, given);
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
            ],
        )?;
        let options = reader.finish()?;

        let mut tones: Vec<Option<Tone>> = TONES.iter().map(|t| Some(Tone::Named(t))).collect();
        if marks.allows_no_tone() {
            tones.push(None);
        }

        let mut syllables = HashMap::new();
        for table in [TableId::MandarinIpa, TableId::MandarinIpaFifthTone] {
            for pinyin in ctx.tables.entities(table) {
                if let Some([initial, final_]) = ctx.tables.entity_data(table, pinyin) {
                    syllables.insert(format!("{initial}{final_}"), (initial.clone(), final_.clone()));
                }
            }
        }
        let plain = syllables.keys().cloned().collect();
        Ok(Self {
            options,
            marks,
            tones,
            plain,
            syllables,
        })
    }

    pub fn tone_mark_type(&self) -> IpaToneMarks {
        self.marks.marks()
    }

    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        self.syllables.get(plain).cloned().ok_or_else(|| {
            ReadingError::InvalidEntity(format!("entity '{plain}' is no valid IPA form in this system"))
        })
    }
}

impl ReadingOperator for MandarinIpaOperator {
    fn reading(&self) -> Reading {
        Reading::MandarinIpa
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

impl TonalOperator for MandarinIpaOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        Ok(self.marks.apply(plain, tone.and_then(Tone::name)))
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let (plain, tone) = self.marks.split(entity)?;
        let tone = named(tone);
        if !self.tones.contains(&tone) {
            return Err(ReadingError::InvalidEntity(format!("invalid entity given for '{entity}'")));
        }
        Ok((plain, tone))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }
}
