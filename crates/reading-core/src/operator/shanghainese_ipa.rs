//! Shanghainese in IPA, tones given by their traditional category.

use std::collections::{HashMap, HashSet};

use super::tonal_ipa::{self, named, IpaMarks, IpaToneMarks, MarkTable};
use super::{invalid_tone, tonal_is_reading_entity, BuildContext, ReadingOperator, TonalOperator};
use crate::entity::{tone_label, Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::TableId;

pub(crate) const TONES: [&str; 5] = ["YinPing", "YinQu", "YangQu", "YinRu", "YangRu"];

const ENTERING_TONES: [&str; 2] = ["YinRu", "YangRu"];

const CHAO_DIGITS: MarkTable = &[
    ("YinPing", "53"),
    ("YinQu", "34"),
    ("YangQu", "23"),
    ("YinRu", "55"),
    ("YangRu", "12"),
];

const SUPERSCRIPT_CHAO_DIGITS: MarkTable = &[
    ("YinPing", "⁵³"),
    ("YinQu", "³⁴"),
    ("YangQu", "²³"),
    ("YinRu", "⁵⁵"),
    ("YangRu", "¹²"),
];

const TONE_BARS: MarkTable = &[
    ("YinPing", "˥˧"),
    ("YinQu", "˧˦"),
    ("YangQu", "˨˧"),
    ("YinRu", "˥˥"),
    ("YangRu", "˩˨"),
];

/// A syllable as listed in the inventory.
#[derive(Debug, Clone)]
struct Syllable {
    initial: String,
    final_: String,
    /// `G` glottal stop final, `U` unvoiced initial, `V` voiced initial.
    flags: String,
}

pub struct ShanghaineseIpaOperator {
    options: OptionMap,
    marks: IpaMarks,
    constrain_entering: bool,
    constrain_tone_categories: bool,
    tones: Vec<Option<Tone>>,
    plain: HashSet<String>,
    syllables: HashMap<String, Syllable>,
}

impl ShanghaineseIpaOperator {
    pub fn new(given: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        let mut reader = OptionReader::new(Reading::ShanghaineseIpa, given);
        let marks = IpaMarks::read(
            &mut reader,
            IpaToneMarks::IpaToneBar,
            &[
                (IpaToneMarks::ChaoDigits, CHAO_DIGITS),
                (IpaToneMarks::SuperscriptChaoDigits, SUPERSCRIPT_CHAO_DIGITS),
                (IpaToneMarks::IpaToneBar, TONE_BARS),
            ],
            &[],
        )?;
        let constrain_entering = reader.bool("constrainEntering", false)?;
        let constrain_tone_categories = reader.bool("constrainToneCategories", false)?;
        let options = reader.finish()?;

        let mut tones: Vec<Option<Tone>> = TONES.iter().map(|t| Some(Tone::Named(t))).collect();
        if marks.allows_no_tone() {
            tones.push(None);
        }

        let syllables: HashMap<String, Syllable> = ctx
            .tables
            .entities(TableId::ShanghaineseIpa)
            .into_iter()
            .filter_map(|ipa| match ctx.tables.entity_data(TableId::ShanghaineseIpa, ipa)? {
                [initial, final_, flags] => Some((
                    ipa.to_string(),
                    Syllable {
                        initial: initial.clone(),
                        final_: final_.clone(),
                        flags: flags.clone(),
                    },
                )),
                _ => None,
            })
            .collect();
        let plain = syllables.keys().cloned().collect();
        Ok(Self {
            options,
            marks,
            constrain_entering,
            constrain_tone_categories,
            tones,
            plain,
            syllables,
        })
    }

    pub fn tone_mark_type(&self) -> IpaToneMarks {
        self.marks.marks()
    }

    pub fn onset_rhyme(&self, plain: &str) -> Result<(String, String)> {
        self.syllables
            .get(plain)
            .map(|s| (s.initial.clone(), s.final_.clone()))
            .ok_or_else(|| ReadingError::InvalidEntity(format!("'{plain}' not a valid IPA form in this system")))
    }

    fn tone_valid(&self, plain: &str, tone: Option<Tone>) -> Result<bool> {
        if !self.tones.contains(&tone) {
            return Err(invalid_tone(plain, tone));
        }
        if !self.constrain_entering && !self.constrain_tone_categories {
            return Ok(true);
        }
        let flags = &self
            .syllables
            .get(plain)
            .ok_or_else(|| ReadingError::InvalidEntity(format!("invalid entity given for '{plain}'")))?
            .flags;
        let name = tone.and_then(Tone::name);
        let entering = name.is_some_and(|n| ENTERING_TONES.contains(&n));
        if self.constrain_entering && entering != flags.contains('G') {
            return Ok(false);
        }
        if self.constrain_tone_categories {
            match name {
                Some("YangQu" | "YangRu") if flags.contains('U') => return Ok(false),
                Some("YinPing" | "YinQu" | "YinRu") if flags.contains('V') => return Ok(false),
                _ => {}
            }
        }
        Ok(true)
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

impl ReadingOperator for ShanghaineseIpaOperator {
    fn reading(&self) -> Reading {
        Reading::ShanghaineseIpa
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

impl TonalOperator for ShanghaineseIpaOperator {
    fn tones(&self) -> &[Option<Tone>] {
        &self.tones
    }

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String> {
        self.check_tone(plain, tone)?;
        Ok(self.marks.apply(plain, tone.and_then(Tone::name)))
    }

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)> {
        let (plain, tone) = self.marks.split(entity)?;
        let tone = named(tone);
        self.check_tone(&plain, tone)?;
        Ok((plain, tone))
    }

    fn plain_entities(&self) -> &HashSet<String> {
        &self.plain
    }
}
