//! Reading converters: entity mapping between two readings, or between two
//! dialects of one reading.
//!
//! A converter is built for one direction and one pair of operators. Which
//! converter handles a direction is decided by [`ConverterKind`]; directions
//! without a direct converter may be routed through a configured bridge
//! reading ([`BridgeConverter`]).
//!
//! Cross-reading converters work on a fixed *default form* of both readings.
//! Entities are first converted from the caller's dialect into the default
//! form of the source reading, mapped, and then converted from the default
//! form of the target reading into the caller's target dialect.

mod braille;
mod bridge;
mod cantonese;
mod entity_wise;
mod gr;
mod ipa;
mod pinyin;
mod wade_giles;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, debug_span};

use crate::entity::Tone;
use crate::error::{ReadingError, Result};
use crate::operator::{compile, Operator, ReadingOperator};
use crate::options::{option_choice, option_map, OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::EntityTable;
use crate::unicode::{is_title, is_upper, to_title};

pub use braille::PinyinBrailleConverter;
pub use bridge::BridgeConverter;
pub use cantonese::JyutpingYaleConverter;
pub use entity_wise::EntityWiseConverter;
pub use gr::{GrDialectConverter, GrPinyinConverter};
pub use ipa::{
    CoarticulationContext, CoarticulationRule, FinalECoarticulation, IpaSyllable,
    LowThirdAndNeutralToneRule, PinyinIpaConverter, SandhiRule,
};
pub use pinyin::PinyinDialectConverter;
pub use wade_giles::PinyinWadeGilesConverter;

/// Converts entities of one reading into another (or into another dialect of
/// the same reading).
pub trait ReadingConverter: Send + Sync {
    fn source(&self) -> &Operator;

    fn target(&self) -> &Operator;

    /// Resolved converter options, defaults included.
    fn options(&self) -> &OptionMap;

    /// Convert decomposed entities. Entities that are not part of the source
    /// reading pass through unchanged.
    fn convert_entities(&self, entities: &[String]) -> Result<Vec<String>>;

    /// Decompose `text` with the source operator, convert, and compose with
    /// the target operator.
    fn convert(&self, text: &str) -> Result<String> {
        let _span = debug_span!(
            "convert",
            from = %self.source().reading(),
            to = %self.target().reading(),
            len = text.len()
        )
        .entered();
        let entities = self.source().decompose(text)?.into_texts();
        let converted = self.convert_entities(&entities)?;
        self.target().compose(&converted)
    }
}

/// What converters need from their owner: operators for default forms and
/// intermediate readings, the mapping tables, and the bridge table.
pub trait OperatorSource: Send + Sync {
    /// Operator for `reading` built from exactly `options`.
    fn operator(&self, reading: Reading, options: &OptionMap) -> Result<Arc<Operator>>;

    fn tables(&self) -> Arc<dyn EntityTable>;

    fn bridge_for(&self, from: Reading, to: Reading) -> Option<Reading>;
}

/// Source and target operator of a converter.
#[derive(Clone)]
pub struct Endpoints {
    pub source: Arc<Operator>,
    pub target: Arc<Operator>,
}

impl Endpoints {
    pub fn new(source: Arc<Operator>, target: Arc<Operator>) -> Self {
        Self { source, target }
    }

    pub fn from_reading(&self) -> Reading {
        self.source.reading()
    }

    pub fn to_reading(&self) -> Reading {
        self.target.reading()
    }
}

/// The converter implementations, one per set of directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    PinyinDialect,
    WadeGilesDialect,
    GrDialect,
    JyutpingDialect,
    CantoneseYaleDialect,
    ShanghaineseIpaDialect,
    PinyinWadeGiles,
    GrPinyin,
    PinyinIpa,
    PinyinBraille,
    JyutpingYale,
}

impl ConverterKind {
    pub const ALL: [ConverterKind; 11] = [
        ConverterKind::PinyinDialect,
        ConverterKind::WadeGilesDialect,
        ConverterKind::GrDialect,
        ConverterKind::JyutpingDialect,
        ConverterKind::CantoneseYaleDialect,
        ConverterKind::ShanghaineseIpaDialect,
        ConverterKind::PinyinWadeGiles,
        ConverterKind::GrPinyin,
        ConverterKind::PinyinIpa,
        ConverterKind::PinyinBraille,
        ConverterKind::JyutpingYale,
    ];

    /// Directions this kind converts.
    pub fn directions(self) -> &'static [(Reading, Reading)] {
        use Reading::*;
        match self {
            ConverterKind::PinyinDialect => &[(Pinyin, Pinyin)],
            ConverterKind::WadeGilesDialect => &[(WadeGiles, WadeGiles)],
            ConverterKind::GrDialect => &[(Gr, Gr)],
            ConverterKind::JyutpingDialect => &[(Jyutping, Jyutping)],
            ConverterKind::CantoneseYaleDialect => &[(CantoneseYale, CantoneseYale)],
            ConverterKind::ShanghaineseIpaDialect => &[(ShanghaineseIpa, ShanghaineseIpa)],
            ConverterKind::PinyinWadeGiles => &[(Pinyin, WadeGiles), (WadeGiles, Pinyin)],
            ConverterKind::GrPinyin => &[(Gr, Pinyin), (Pinyin, Gr)],
            ConverterKind::PinyinIpa => &[(Pinyin, MandarinIpa)],
            ConverterKind::PinyinBraille => &[(Pinyin, MandarinBraille), (MandarinBraille, Pinyin)],
            ConverterKind::JyutpingYale => &[(Jyutping, CantoneseYale), (CantoneseYale, Jyutping)],
        }
    }

    /// The kind converting `from -> to` directly.
    pub fn for_direction(from: Reading, to: Reading) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.directions().contains(&(from, to)))
    }

    /// Converter options this kind accepts.
    pub fn option_names(self) -> &'static [&'static str] {
        match self {
            ConverterKind::PinyinDialect => &["keepPinyinApostrophes", "breakUpErhua"],
            ConverterKind::GrDialect => &["keepGRApostrophes", "breakUpAbbreviated"],
            ConverterKind::PinyinWadeGiles | ConverterKind::PinyinBraille => {
                &["strictConversion", "tieBreak"]
            }
            ConverterKind::GrPinyin => &["grOptionalNeutralToneMapping", "strictConversion", "tieBreak"],
            ConverterKind::PinyinIpa => {
                &["sandhiRule", "coarticulationRule", "strictConversion", "tieBreak"]
            }
            ConverterKind::JyutpingYale => &["yaleFirstTone", "strictConversion", "tieBreak"],
            _ => &[],
        }
    }

    /// Options of the form the mapping tables are written in.
    pub fn default_reading_options(self, reading: Reading) -> OptionMap {
        match (self, reading) {
            (ConverterKind::PinyinWadeGiles, Reading::Pinyin) => {
                option_map([("erhua", "ignore"), ("toneMarkType", "numbers")])
            }
            (ConverterKind::GrPinyin, Reading::Pinyin) => option_map([("erhua", "oneSyllable")]),
            (ConverterKind::GrPinyin, Reading::Gr) => option_map([("abbreviations", false)]),
            (ConverterKind::PinyinIpa, Reading::Pinyin) => option_map([
                ("erhua", "ignore"),
                ("toneMarkType", "numbers"),
                ("missingToneMark", "noinfo"),
                ("case", "lower"),
            ]),
            (ConverterKind::PinyinBraille, Reading::Pinyin) => option_map([
                ("erhua", "ignore"),
                ("toneMarkType", "numbers"),
                ("missingToneMark", "noinfo"),
            ]),
            (ConverterKind::JyutpingYale, Reading::CantoneseYale) => {
                option_map([("toneMarkType", "internal")])
            }
            _ => OptionMap::new(),
        }
    }

    fn build(
        self,
        ends: Endpoints,
        options: &OptionMap,
        env: &dyn OperatorSource,
    ) -> Result<Arc<dyn ReadingConverter>> {
        Ok(match self {
            ConverterKind::PinyinDialect => Arc::new(PinyinDialectConverter::new(ends, options)?),
            ConverterKind::WadeGilesDialect
            | ConverterKind::JyutpingDialect
            | ConverterKind::CantoneseYaleDialect
            | ConverterKind::ShanghaineseIpaDialect => {
                Arc::new(EntityWiseConverter::new(self, ends, options)?)
            }
            ConverterKind::GrDialect => Arc::new(GrDialectConverter::new(ends, options)?),
            ConverterKind::PinyinWadeGiles => {
                Arc::new(PinyinWadeGilesConverter::new(ends, options, env)?)
            }
            ConverterKind::GrPinyin => Arc::new(GrPinyinConverter::new(ends, options, env)?),
            ConverterKind::PinyinIpa => Arc::new(PinyinIpaConverter::new(ends, options, env)?),
            ConverterKind::PinyinBraille => {
                Arc::new(PinyinBrailleConverter::new(ends, options, env)?)
            }
            ConverterKind::JyutpingYale => Arc::new(JyutpingYaleConverter::new(ends, options, env)?),
        })
    }
}

/// Whether `reading` has a converter between its own dialects.
pub fn supports_dialect_conversion(reading: Reading) -> bool {
    ConverterKind::for_direction(reading, reading).is_some()
}

/// Build the converter from `source` to `target`, directly or through the
/// bridge reading `env` configures for the pair.
pub fn build(
    source: Arc<Operator>,
    target: Arc<Operator>,
    options: &OptionMap,
    env: &dyn OperatorSource,
) -> Result<Arc<dyn ReadingConverter>> {
    let ends = Endpoints::new(source, target);
    let (from, to) = (ends.from_reading(), ends.to_reading());
    if let Some(kind) = ConverterKind::for_direction(from, to) {
        return kind.build(ends, options, env);
    }
    match env.bridge_for(from, to) {
        Some(via) => Ok(Arc::new(BridgeConverter::new(ends, via, options, env)?)),
        None => Err(ReadingError::Unsupported(format!(
            "conversion from {from} to {to} not supported"
        ))),
    }
}

/// Name used in errors about converter options.
pub(crate) fn converter_name(from: Reading, to: Reading) -> String {
    format!("{from} to {to} converter")
}

/// Typed access to an endpoint operator.
pub(crate) fn variant<'a, T: ?Sized>(
    op: &'a Operator,
    get: impl FnOnce(&'a Operator) -> Option<&'a T>,
) -> Result<&'a T> {
    get(op).ok_or_else(|| {
        ReadingError::Unsupported(format!("unexpected operator for {}", op.reading()))
    })
}

/// Consecutive reading and formatting entities, or a single entity that
/// belongs to neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Run(Vec<String>),
    Other(String),
}

pub(crate) fn segments(op: &Operator, entities: &[String]) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for entity in entities {
        if op.is_reading_entity(entity) || op.is_formatting_entity(entity) {
            if let Some(Segment::Run(run)) = out.last_mut() {
                run.push(entity.clone());
            } else {
                out.push(Segment::Run(vec![entity.clone()]));
            }
        } else {
            out.push(Segment::Other(entity.clone()));
        }
    }
    out
}

pub(crate) fn map_runs(
    segments: Vec<Segment>,
    mut f: impl FnMut(&[String]) -> Result<Vec<String>>,
) -> Result<Vec<Segment>> {
    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Run(run) => f(&run).map(Segment::Run),
            other => Ok(other),
        })
        .collect()
}

pub(crate) fn flatten(segments: Vec<Segment>) -> Vec<String> {
    let mut out = Vec::new();
    for segment in segments {
        match segment {
            Segment::Run(run) => out.extend(run),
            Segment::Other(entity) => out.push(entity),
        }
    }
    out
}

/// Give `converted` the letter case of `original`.
pub(crate) fn recase(original: &str, converted: String) -> String {
    if is_upper(original) {
        converted.to_uppercase()
    } else if is_title(original) {
        to_title(&converted)
    } else {
        converted
    }
}

/// Split into plain entity and tone with the tonal capability of `op`.
pub(crate) fn split(op: &Operator, entity: &str) -> Result<(String, Option<Tone>)> {
    op.tonal()?.split_entity_tone(entity)
}

/// Render a target entity, reporting an unknown syllable/tone pair as a
/// conversion failure.
pub(crate) fn render(
    op: &Operator,
    plain: &str,
    tone: Option<Tone>,
) -> Result<String> {
    op.tonal()?
        .tonal_entity(plain, tone)
        .map_err(ReadingError::into_conversion)
}

/// Pattern matching any of `alternatives`, longest first, or else a single
/// character.
pub(crate) fn compile_alternatives<'a>(
    alternatives: impl IntoIterator<Item = &'a String>,
) -> Result<Regex> {
    let mut alternatives: Vec<&String> = alternatives.into_iter().collect();
    alternatives.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    let mut pattern: Vec<String> = alternatives.iter().map(|a| regex::escape(a)).collect();
    pattern.push(".".to_string());
    compile(&format!("(?s){}", pattern.join("|")))
}

pub(crate) fn not_supported(plain: &str) -> ReadingError {
    ReadingError::Conversion(format!("conversion for entity '{plain}' not supported"))
}

option_choice! {
    /// How a converter picks among several targets for one entity.
    pub enum TieBreak {
        None => "none",
        First => "first",
    }
}

/// Failure handling shared by the cross-reading converters.
///
/// By default an entity the target reading cannot express is left
/// unconverted; `strictConversion` turns that into a `Conversion` error. An
/// entity with several targets is an `AmbiguousConversion` unless
/// `tieBreak = first` picks the first in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPolicy {
    pub strict: bool,
    pub tie_break: TieBreak,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            strict: false,
            tie_break: TieBreak::None,
        }
    }
}

impl ConversionPolicy {
    pub(crate) fn read(reader: &mut OptionReader<'_>) -> Result<Self> {
        Ok(Self {
            strict: reader.bool("strictConversion", false)?,
            tie_break: reader.choice("tieBreak", TieBreak::None)?,
        })
    }

    /// The target for `entity` among `candidates`.
    pub(crate) fn choose(&self, entity: &str, mut candidates: Vec<String>) -> Result<String> {
        match candidates.len() {
            0 => Err(not_supported(entity)),
            1 => Ok(candidates.remove(0)),
            _ if self.tie_break == TieBreak::First => {
                debug!(entity, chosen = %candidates[0], "tie-break on ambiguous conversion");
                Ok(candidates.remove(0))
            }
            _ => Err(ReadingError::AmbiguousConversion(format!(
                "conversion for entity '{entity}' is ambiguous: {}",
                candidates.join(", ")
            ))),
        }
    }
}

/// Dialect handling around a cross-reading conversion.
pub(crate) struct DialectSupport {
    /// Source reading in the converter's default form.
    pub source_default: Arc<Operator>,
    /// Target reading in the converter's default form.
    pub target_default: Arc<Operator>,
    pub policy: ConversionPolicy,
    into_default: Option<Arc<dyn ReadingConverter>>,
    from_default: Option<Arc<dyn ReadingConverter>>,
    /// Default form back into the caller's source dialect, for entities left
    /// unconverted.
    back_to_source: Option<Arc<dyn ReadingConverter>>,
}

impl DialectSupport {
    pub fn new(
        kind: ConverterKind,
        ends: &Endpoints,
        policy: ConversionPolicy,
        env: &dyn OperatorSource,
    ) -> Result<Self> {
        let (from, to) = (ends.from_reading(), ends.to_reading());
        let source_default = env.operator(from, &kind.default_reading_options(from))?;
        let target_default = env.operator(to, &kind.default_reading_options(to))?;
        let (into_default, back_to_source) = if supports_dialect_conversion(from) {
            (
                Some(build(ends.source.clone(), source_default.clone(), &OptionMap::new(), env)?),
                Some(build(source_default.clone(), ends.source.clone(), &OptionMap::new(), env)?),
            )
        } else {
            (None, None)
        };
        let from_default = if supports_dialect_conversion(to) {
            Some(build(target_default.clone(), ends.target.clone(), &OptionMap::new(), env)?)
        } else {
            None
        };
        Ok(Self {
            source_default,
            target_default,
            policy,
            into_default,
            from_default,
            back_to_source,
        })
    }

    /// Group `entities` by the source operator, bring runs into the default
    /// form, apply `step`, and bring the result into the target dialect.
    pub fn convert(
        &self,
        source: &Operator,
        entities: &[String],
        step: impl FnOnce(Vec<Segment>) -> Result<Vec<Segment>>,
    ) -> Result<Vec<String>> {
        let mut sequence = segments(source, entities);
        if let Some(conv) = &self.into_default {
            sequence = map_runs(sequence, |run| conv.convert_entities(run))?;
        }
        let mut converted = step(sequence)?;
        if let Some(conv) = &self.from_default {
            converted = map_runs(converted, |run| conv.convert_entities(run))?;
        }
        Ok(flatten(converted))
    }

    /// Map every reading entity of each run through `basic`, which receives
    /// the lowercased entity; the result takes the case of the original.
    pub fn romanisation_step(
        &self,
        segments: Vec<Segment>,
        mut basic: impl FnMut(&str) -> Result<String>,
    ) -> Result<Vec<Segment>> {
        self.entity_step(
            segments,
            |entity| self.source_default.is_reading_entity(entity),
            |entity| Ok(recase(entity, basic(&entity.to_lowercase())?)),
        )
    }

    /// Map the entities of each run selected by `is_entity` through
    /// `convert`. Entities left unconverted are cut out of their run.
    pub fn entity_step(
        &self,
        segments: Vec<Segment>,
        is_entity: impl Fn(&str) -> bool,
        mut convert: impl FnMut(&str) -> Result<String>,
    ) -> Result<Vec<Segment>> {
        let mut out = Vec::new();
        for segment in segments {
            let run = match segment {
                Segment::Run(run) => run,
                other => {
                    out.push(other);
                    continue;
                }
            };
            let mut current = Vec::new();
            for entity in run {
                if !is_entity(&entity) {
                    current.push(entity);
                    continue;
                }
                match convert(&entity) {
                    Ok(converted) => current.push(converted),
                    Err(err) => {
                        let kept = self.unconverted(&entity, err)?;
                        if !current.is_empty() {
                            out.push(Segment::Run(std::mem::take(&mut current)));
                        }
                        out.push(Segment::Other(kept));
                    }
                }
            }
            if !current.is_empty() {
                out.push(Segment::Run(current));
            }
        }
        Ok(out)
    }

    /// `entity` (in the source default form) as it is kept when its
    /// conversion failed with `err`: in the caller's source dialect, or the
    /// error itself under `strictConversion` or for anything but a
    /// `Conversion` failure.
    pub fn unconverted(&self, entity: &str, err: ReadingError) -> Result<String> {
        if self.policy.strict || !matches!(err, ReadingError::Conversion(_)) {
            return Err(err);
        }
        debug!(entity, %err, "entity left unconverted");
        let source_form = self
            .back_to_source
            .as_ref()
            .and_then(|conv| conv.convert_entities(&[entity.to_string()]).ok())
            .map(|entities| entities.concat());
        Ok(source_form.unwrap_or_else(|| entity.to_string()))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::testutil::{default_operator, strings};

    #[test]
    fn test_direction_registry() {
        assert_eq!(
            ConverterKind::for_direction(Reading::Pinyin, Reading::Gr),
            Some(ConverterKind::GrPinyin)
        );
        assert_eq!(ConverterKind::for_direction(Reading::MandarinIpa, Reading::Pinyin), None);
        assert!(supports_dialect_conversion(Reading::ShanghaineseIpa));
        assert!(!supports_dialect_conversion(Reading::MandarinIpa));
    }

    #[test]
    fn test_segments_group_runs() {
        let op = default_operator(Reading::Pinyin);
        let seq = segments(&op, &strings(&["xī", "'", "ān", ", ", "hàn"]));
        assert_eq!(
            seq,
            vec![
                Segment::Run(strings(&["xī", "'", "ān"])),
                Segment::Other(", ".to_string()),
                Segment::Run(strings(&["hàn"])),
            ]
        );
        assert_eq!(flatten(seq), strings(&["xī", "'", "ān", ", ", "hàn"]));
    }

    #[test]
    fn test_recase() {
        assert_eq!(recase("HAN", "hàn".to_string()), "HÀN");
        assert_eq!(recase("Han", "hàn".to_string()), "Hàn");
        assert_eq!(recase("han", "hàn".to_string()), "hàn");
    }
}
