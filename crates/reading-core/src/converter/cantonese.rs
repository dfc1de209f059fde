//! Jyutping to and from Cantonese Yale.

use std::sync::Arc;

use super::{
    converter_name, not_supported, render, split, ConversionPolicy, ConverterKind, DialectSupport,
    Endpoints, OperatorSource, ReadingConverter,
};
use crate::entity::Tone;
use crate::error::{ReadingError, Result};
use crate::operator::Operator;
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::{EntityTable, TableId};

const FIRST_TONES: [&str; 2] = ["1stToneLevel", "1stToneFalling"];

/// Maps syllables through the Jyutping/Yale table. Jyutping does not tell
/// the two first tones of Yale apart; `yaleFirstTone` picks one.
pub struct JyutpingYaleConverter {
    ends: Endpoints,
    options: OptionMap,
    dialects: DialectSupport,
    tables: Arc<dyn EntityTable>,
    first_tone: &'static str,
}

impl JyutpingYaleConverter {
    pub fn new(ends: Endpoints, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(ends.from_reading(), ends.to_reading()), given);
        let first_tone = reader.string("yaleFirstTone", FIRST_TONES[0], |s| FIRST_TONES.contains(&s))?;
        let policy = ConversionPolicy::read(&mut reader)?;
        let options = reader.finish()?;
        let first_tone = FIRST_TONES
            .into_iter()
            .find(|t| *t == first_tone)
            .unwrap_or(FIRST_TONES[0]);
        let dialects = DialectSupport::new(ConverterKind::JyutpingYale, &ends, policy, env)?;
        Ok(Self {
            ends,
            options,
            dialects,
            tables: env.tables(),
            first_tone,
        })
    }

    fn yale_tone(&self, tone: Option<Tone>) -> Result<Option<Tone>> {
        let Some(tone) = tone else {
            return Ok(None);
        };
        let name = match tone.number() {
            Some(1) => self.first_tone,
            Some(2) => "2ndTone",
            Some(3) => "3rdTone",
            Some(4) => "4thTone",
            Some(5) => "5thTone",
            Some(6) => "6thTone",
            _ => {
                return Err(ReadingError::Conversion(format!(
                    "invalid Jyutping tone '{tone}'"
                )))
            }
        };
        Ok(Some(Tone::Named(name)))
    }

    fn jyutping_tone(tone: Option<Tone>) -> Option<Tone> {
        let digit = tone?.name()?.chars().next()?.to_digit(10)?;
        Some(Tone::Number(digit as u8))
    }

    fn convert_basic(&self, entity: &str) -> Result<String> {
        let (plain, tone) = split(&self.dialects.source_default, entity)?;
        let (converted, tone) = if self.ends.from_reading() == Reading::CantoneseYale {
            let candidates = self
                .tables
                .mapping(TableId::JyutpingYale, 0, &plain)
                .iter()
                .map(|s| s.to_string())
                .collect();
            let jyutping = self.dialects.policy.choose(&plain, candidates)?;
            (jyutping, Self::jyutping_tone(tone))
        } else {
            let yale = self
                .tables
                .entity_data(TableId::JyutpingYale, &plain)
                .and_then(|row| row.first())
                .cloned()
                .ok_or_else(|| not_supported(&plain))?;
            (yale, self.yale_tone(tone)?)
        };
        render(&self.dialects.target_default, &converted, tone)
    }
}

impl ReadingConverter for JyutpingYaleConverter {
    fn source(&self) -> &Operator {
        &self.ends.source
    }

    fn target(&self) -> &Operator {
        &self.ends.target
    }

    fn options(&self) -> &OptionMap {
        &self.options
    }

    fn convert_entities(&self, entities: &[String]) -> Result<Vec<String>> {
        self.dialects.convert(&self.ends.source, entities, |sequence| {
            self.dialects
                .romanisation_step(sequence, |entity| self.convert_basic(entity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jyutping_tone_from_yale_name() {
        assert_eq!(
            JyutpingYaleConverter::jyutping_tone(Some(Tone::Named("1stToneFalling"))),
            Some(Tone::Number(1))
        );
        assert_eq!(
            JyutpingYaleConverter::jyutping_tone(Some(Tone::Named("6thTone"))),
            Some(Tone::Number(6))
        );
        assert_eq!(JyutpingYaleConverter::jyutping_tone(None), None);
    }
}
