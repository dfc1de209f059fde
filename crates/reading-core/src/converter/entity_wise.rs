//! Dialect converters that map every reading entity on its own: Wade-Giles,
//! Jyutping, Cantonese Yale and Shanghainese IPA.

use super::{converter_name, render, split, variant, ConverterKind, Endpoints, ReadingConverter};
use crate::error::{ReadingError, Result};
use crate::operator::{Operator, ReadingOperator};
use crate::options::{Case, OptionMap, OptionReader};
use crate::unicode::{is_title, is_upper, to_title};

pub struct EntityWiseConverter {
    kind: ConverterKind,
    ends: Endpoints,
    options: OptionMap,
}

impl EntityWiseConverter {
    pub fn new(kind: ConverterKind, ends: Endpoints, given: &OptionMap) -> Result<Self> {
        let (from, to) = (ends.from_reading(), ends.to_reading());
        if !kind.directions().contains(&(from, to)) {
            return Err(ReadingError::Unsupported(format!(
                "conversion direction from {from} to {to} not supported"
            )));
        }
        let options = OptionReader::new(converter_name(from, to), given).finish()?;
        Ok(Self { kind, ends, options })
    }

    fn target_case(&self) -> Case {
        self.ends
            .target
            .as_romanisation()
            .map_or(Case::Both, |r| r.romanisation().case())
    }

    fn convert_entity(&self, entity: &str) -> Result<String> {
        let (mut plain, tone) = split(&self.ends.source, entity)?;
        if self.kind == ConverterKind::WadeGilesDialect {
            let from = variant(&self.ends.source, Operator::as_wade_giles)?;
            let to = variant(&self.ends.target, Operator::as_wade_giles)?;
            plain = from.convert_plain_entity(&plain, Some(to))?;
        }
        if self.target_case() == Case::Lower {
            plain = plain.to_lowercase();
        }
        let converted = render(&self.ends.target, &plain, tone)?;
        // Yale diacritics may leave a title case syllable fully capitalised.
        if self.kind == ConverterKind::CantoneseYaleDialect
            && is_title(entity)
            && !is_upper(entity)
            && is_upper(&converted)
        {
            return Ok(to_title(&converted));
        }
        Ok(converted)
    }
}

impl ReadingConverter for EntityWiseConverter {
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
        entities
            .iter()
            .map(|entity| {
                if self.ends.source.is_reading_entity(entity) {
                    self.convert_entity(entity)
                } else {
                    Ok(entity.clone())
                }
            })
            .collect()
    }
}
