//! Conversion through an intermediate reading.

use std::sync::Arc;

use tracing::debug;

use super::{converter_name, ConverterKind, Endpoints, OperatorSource, ReadingConverter};
use crate::error::{ReadingError, Result};
use crate::operator::Operator;
use crate::options::{merged, OptionMap};
use crate::reading::Reading;

/// Chains the direct converters `source -> via` and `via -> target`. The
/// intermediate reading uses its default options.
pub struct BridgeConverter {
    ends: Endpoints,
    via: Reading,
    options: OptionMap,
    first: Arc<dyn ReadingConverter>,
    second: Arc<dyn ReadingConverter>,
}

impl BridgeConverter {
    pub fn new(ends: Endpoints, via: Reading, given: &OptionMap, env: &dyn OperatorSource) -> Result<Self> {
        let (from, to) = (ends.from_reading(), ends.to_reading());
        let leg = |a: Reading, b: Reading| {
            ConverterKind::for_direction(a, b).ok_or_else(|| {
                ReadingError::Unsupported(format!("no converter from {a} to {b} for bridge over {via}"))
            })
        };
        let (first_kind, second_kind) = (leg(from, via)?, leg(via, to)?);

        if let Some((name, value)) = given.iter().find(|(name, _)| {
            !first_kind.option_names().contains(&name.as_str())
                && !second_kind.option_names().contains(&name.as_str())
        }) {
            return Err(ReadingError::UnsupportedOption {
                reading: converter_name(from, to),
                name: name.clone(),
                value: value.to_string(),
            });
        }
        let options_for = |kind: ConverterKind| -> OptionMap {
            given
                .iter()
                .filter(|(name, _)| kind.option_names().contains(&name.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };

        let middle = env.operator(via, &OptionMap::new())?;
        let first = first_kind.build(
            Endpoints::new(ends.source.clone(), middle.clone()),
            &options_for(first_kind),
            env,
        )?;
        let second = second_kind.build(
            Endpoints::new(middle, ends.target.clone()),
            &options_for(second_kind),
            env,
        )?;
        let options = merged(first.options(), second.options());
        debug!(%from, %via, %to, "built bridge converter");
        Ok(Self {
            ends,
            via,
            options,
            first,
            second,
        })
    }

    pub fn via(&self) -> Reading {
        self.via
    }
}

impl ReadingConverter for BridgeConverter {
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
        let intermediate = self.first.convert_entities(entities)?;
        self.second.convert_entities(&intermediate)
    }
}
