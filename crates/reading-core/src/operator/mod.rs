//! Reading operators: decomposition, composition and entity validation for
//! each supported reading.
//!
//! Every operator implements [`ReadingOperator`]; operators whose entities
//! carry tones add [`TonalOperator`], and the Latin-script romanisations add
//! [`RomanisationOperator`] with its lattice segmenter. [`Operator`] is the
//! closed set of concrete operators the factory hands out.

mod braille;
mod cantonese_ipa;
mod cantonese_yale;
mod gr;
mod jyutping;
mod mandarin_ipa;
mod pinyin;
mod romanisation;
mod shanghainese_ipa;
mod simple;
mod tonal_ipa;
mod wade_giles;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::{Decomposition, Tone};
use crate::error::{ReadingError, Result};
use crate::options::OptionMap;
use crate::reading::Reading;
use crate::settings::BestEffort;
use crate::table::EntityTable;

pub use braille::{BrailleToneMarks, MandarinBrailleOperator};
pub use cantonese_ipa::{CantoneseIpaOperator, StopTones};
pub use cantonese_yale::{CantoneseYaleOperator, YaleToneMarks};
pub use gr::{AbbreviatedForm, GrOperator, ToneClass};
pub(crate) use gr::{gr_tone, tone_class};
pub use jyutping::{JyutpingOperator, JyutpingToneMarks};
pub use mandarin_ipa::MandarinIpaOperator;
pub use pinyin::{AeoApostropheRule, ApostropheRule, Erhua, PinyinOperator, PinyinToneMarks};
pub use romanisation::{Romanisation, RomanisationOperator};
pub use shanghainese_ipa::ShanghaineseIpaOperator;
pub use simple::SimpleEntityOperator;
pub use tonal_ipa::IpaToneMarks;
pub use wade_giles::{NeutralToneMark, PlainEntityCheck, VowelOption, WadeGilesOperator, WadeGilesToneMarks};

/// Operations every reading supports.
pub trait ReadingOperator: Send + Sync {
    fn reading(&self) -> Reading;

    /// Fully resolved options, defaults included.
    fn options(&self) -> &OptionMap;

    /// Split `text` into entities, resolving ambiguity to one decomposition.
    fn decompose(&self, text: &str) -> Result<Decomposition>;

    /// Every valid decomposition of `text`. At most one is marked strict.
    fn decompositions(&self, text: &str) -> Result<Vec<Decomposition>> {
        Ok(vec![self.decompose(text)?])
    }

    /// Join entities into text, inserting whatever separators are needed to
    /// decompose it again.
    fn compose(&self, entities: &[String]) -> Result<String>;

    fn is_reading_entity(&self, entity: &str) -> bool;

    fn is_formatting_entity(&self, _entity: &str) -> bool {
        false
    }
}

/// Readings whose entities combine a plain syllable with a tone.
pub trait TonalOperator: ReadingOperator {
    /// Tones accepted under the current options; `None` when entities
    /// without tonal information are allowed.
    fn tones(&self) -> &[Option<Tone>];

    fn tonal_entity(&self, plain: &str, tone: Option<Tone>) -> Result<String>;

    fn split_entity_tone(&self, entity: &str) -> Result<(String, Option<Tone>)>;

    fn plain_entities(&self) -> &HashSet<String>;

    fn is_plain_reading_entity(&self, entity: &str) -> bool {
        self.plain_entities().contains(entity)
    }
}

/// An entity is valid when its plain part is known and its tone allowed.
pub(crate) fn tonal_is_reading_entity<T: TonalOperator + ?Sized>(op: &T, entity: &str) -> bool {
    match op.split_entity_tone(entity) {
        Ok((plain, tone)) => op.is_plain_reading_entity(&plain) && op.tones().contains(&tone),
        Err(_) => false,
    }
}

/// All tonal forms of all plain entities, skipping invalid combinations.
pub(crate) fn tonal_reading_entities<T: TonalOperator + ?Sized>(op: &T) -> HashSet<String> {
    let mut out = HashSet::new();
    for plain in op.plain_entities() {
        for &tone in op.tones() {
            if let Ok(entity) = op.tonal_entity(plain, tone) {
                out.insert(entity);
            }
        }
    }
    out
}

pub(crate) fn invalid_tone(plain: &str, tone: Option<Tone>) -> ReadingError {
    ReadingError::InvalidEntity(format!(
        "invalid tone information given for '{plain}': {}",
        crate::entity::tone_label(tone)
    ))
}

/// Shared inputs for building operators.
#[derive(Clone)]
pub struct BuildContext {
    pub tables: Arc<dyn EntityTable>,
    pub best_effort: BestEffort,
}

/// The concrete operators.
pub enum Operator {
    Pinyin(PinyinOperator),
    WadeGiles(WadeGilesOperator),
    Gr(GrOperator),
    Jyutping(JyutpingOperator),
    CantoneseYale(CantoneseYaleOperator),
    MandarinIpa(MandarinIpaOperator),
    CantoneseIpa(CantoneseIpaOperator),
    ShanghaineseIpa(ShanghaineseIpaOperator),
    MandarinBraille(MandarinBrailleOperator),
    Simple(SimpleEntityOperator),
}

macro_rules! delegate {
    ($self:ident, $op:ident => $body:expr) => {
        match $self {
            Operator::Pinyin($op) => $body,
            Operator::WadeGiles($op) => $body,
            Operator::Gr($op) => $body,
            Operator::Jyutping($op) => $body,
            Operator::CantoneseYale($op) => $body,
            Operator::MandarinIpa($op) => $body,
            Operator::CantoneseIpa($op) => $body,
            Operator::ShanghaineseIpa($op) => $body,
            Operator::MandarinBraille($op) => $body,
            Operator::Simple($op) => $body,
        }
    };
}

impl Operator {
    /// Build the operator for `reading`, validating `options`.
    pub fn build(reading: Reading, options: &OptionMap, ctx: &BuildContext) -> Result<Self> {
        Ok(match reading {
            Reading::Pinyin => Operator::Pinyin(PinyinOperator::new(options, ctx)?),
            Reading::WadeGiles => Operator::WadeGiles(WadeGilesOperator::new(options, ctx)?),
            Reading::Gr => Operator::Gr(GrOperator::new(options, ctx)?),
            Reading::Jyutping => Operator::Jyutping(JyutpingOperator::new(options, ctx)?),
            Reading::CantoneseYale => {
                Operator::CantoneseYale(CantoneseYaleOperator::new(options, ctx)?)
            }
            Reading::MandarinIpa => Operator::MandarinIpa(MandarinIpaOperator::new(options, ctx)?),
            Reading::CantoneseIpa => {
                Operator::CantoneseIpa(CantoneseIpaOperator::new(options, ctx)?)
            }
            Reading::ShanghaineseIpa => {
                Operator::ShanghaineseIpa(ShanghaineseIpaOperator::new(options, ctx)?)
            }
            Reading::MandarinBraille => {
                Operator::MandarinBraille(MandarinBrailleOperator::new(options, ctx)?)
            }
            Reading::Hangul | Reading::Hiragana | Reading::Katakana | Reading::Kana => {
                Operator::Simple(SimpleEntityOperator::new(reading, options)?)
            }
        })
    }

    pub fn as_reading(&self) -> &dyn ReadingOperator {
        delegate!(self, op => op)
    }

    pub fn as_tonal(&self) -> Option<&dyn TonalOperator> {
        match self {
            Operator::Pinyin(op) => Some(op),
            Operator::WadeGiles(op) => Some(op),
            Operator::Gr(op) => Some(op),
            Operator::Jyutping(op) => Some(op),
            Operator::CantoneseYale(op) => Some(op),
            Operator::MandarinIpa(op) => Some(op),
            Operator::CantoneseIpa(op) => Some(op),
            Operator::ShanghaineseIpa(op) => Some(op),
            Operator::MandarinBraille(op) => Some(op),
            Operator::Simple(_) => None,
        }
    }

    pub fn as_romanisation(&self) -> Option<&dyn RomanisationOperator> {
        match self {
            Operator::Pinyin(op) => Some(op),
            Operator::WadeGiles(op) => Some(op),
            Operator::Gr(op) => Some(op),
            Operator::Jyutping(op) => Some(op),
            Operator::CantoneseYale(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_pinyin(&self) -> Option<&PinyinOperator> {
        match self {
            Operator::Pinyin(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_wade_giles(&self) -> Option<&WadeGilesOperator> {
        match self {
            Operator::WadeGiles(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_gr(&self) -> Option<&GrOperator> {
        match self {
            Operator::Gr(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_mandarin_ipa(&self) -> Option<&MandarinIpaOperator> {
        match self {
            Operator::MandarinIpa(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_braille(&self) -> Option<&MandarinBrailleOperator> {
        match self {
            Operator::MandarinBraille(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_cantonese_yale(&self) -> Option<&CantoneseYaleOperator> {
        match self {
            Operator::CantoneseYale(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_jyutping(&self) -> Option<&JyutpingOperator> {
        match self {
            Operator::Jyutping(op) => Some(op),
            _ => None,
        }
    }

    /// Tonal capability, or `Unsupported` for readings without tones.
    pub(crate) fn tonal(&self) -> Result<&dyn TonalOperator> {
        self.as_tonal()
            .ok_or_else(|| ReadingError::Unsupported(format!("{} has no tones", self.reading())))
    }
}

impl ReadingOperator for Operator {
    fn reading(&self) -> Reading {
        delegate!(self, op => op.reading())
    }

    fn options(&self) -> &OptionMap {
        delegate!(self, op => op.options())
    }

    fn decompose(&self, text: &str) -> Result<Decomposition> {
        delegate!(self, op => op.decompose(text))
    }

    fn decompositions(&self, text: &str) -> Result<Vec<Decomposition>> {
        delegate!(self, op => op.decompositions(text))
    }

    fn compose(&self, entities: &[String]) -> Result<String> {
        delegate!(self, op => op.compose(entities))
    }

    fn is_reading_entity(&self, entity: &str) -> bool {
        delegate!(self, op => op.is_reading_entity(entity))
    }

    fn is_formatting_entity(&self, entity: &str) -> bool {
        delegate!(self, op => op.is_formatting_entity(entity))
    }
}

/// Guess the options a text was written with. The result is advisory: it
/// only names options the reading can detect from text.
pub fn guess_reading_dialect(reading: Reading, text: &str) -> OptionMap {
    match reading {
        Reading::Pinyin => pinyin::guess_reading_dialect(text),
        Reading::WadeGiles => wade_giles::guess_reading_dialect(text),
        Reading::Gr => gr::guess_reading_dialect(text),
        Reading::CantoneseYale => cantonese_yale::guess_reading_dialect(text),
        Reading::MandarinIpa | Reading::CantoneseIpa | Reading::ShanghaineseIpa => {
            tonal_ipa::guess_reading_dialect(text)
        }
        _ => OptionMap::new(),
    }
}

/// Compile a pattern assembled from option values.
pub(crate) fn compile(pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern)
        .map_err(|e| ReadingError::Unsupported(format!("entity pattern: {e}")))
}
