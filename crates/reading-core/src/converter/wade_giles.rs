//! Conversion between Pinyin and Wade-Giles.

use std::sync::Arc;

use super::{
    converter_name, not_supported, render, split, variant, ConversionPolicy, ConverterKind,
    DialectSupport, Endpoints, OperatorSource, ReadingConverter,
};
use crate::error::Result;
use crate::operator::Operator;
use crate::options::{OptionMap, OptionReader};
use crate::reading::Reading;
use crate::table::{EntityTable, TableId};

/// Maps syllables through the Wade-Giles table, keyed by Pinyin.
pub struct PinyinWadeGilesConverter {
    ends: Endpoints,
    options: OptionMap,
    dialects: DialectSupport,
    tables: Arc<dyn EntityTable>,
}

impl PinyinWadeGilesConverter {
    pub fn new(ends: Endpoints, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let mut reader = OptionReader::new(converter_name(ends.from_reading(), ends.to_reading()), given);
        let policy = ConversionPolicy::read(&mut reader)?;
        let options = reader.finish()?;
        let dialects = DialectSupport::new(ConverterKind::PinyinWadeGiles, &ends, policy, env)?;
        Ok(Self {
            ends,
            options,
            dialects,
            tables: env.tables(),
        })
    }

    fn convert_basic(&self, entity: &str) -> Result<String> {
        let (plain, tone) = split(&self.dialects.source_default, entity)?;
        let converted = if self.ends.from_reading() == Reading::WadeGiles {
            let candidates = self.tables.mapping(TableId::WadeGiles, 0, &plain);
            self.dialects
                .policy
                .choose(&plain, candidates.into_iter().map(str::to_string).collect())?
        } else {
            self.tables
                .entity_data(TableId::WadeGiles, &plain)
                .and_then(|row| row.first())
                .cloned()
                .ok_or_else(|| not_supported(&plain))?
        };
        render(&self.dialects.target_default, &converted, tone)
    }
}

impl ReadingConverter for PinyinWadeGilesConverter {
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
        let entities = if self.ends.from_reading() == Reading::WadeGiles {
            variant(&self.ends.source, Operator::as_wade_giles)?.remove_hyphens(entities)
        } else {
            entities.to_vec()
        };
        self.dialects.convert(&self.ends.source, &entities, |sequence| {
            self.dialects
                .romanisation_step(sequence, |entity| self.convert_basic(entity))
        })
    }
}
