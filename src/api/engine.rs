use std::path::Path;

use reading_core::settings::parse_settings_toml;
use reading_core::{OptionMap, Reading, ReadingFactory};
use tracing::debug;

use super::{ApiError, ConversionRecord, ConversionRequest, DecompositionRecord, ErrorKind, Reply};

fn reading(name: &str) -> Result<Reading, ApiError> {
    Ok(name.parse::<Reading>()?)
}

/// Name-addressed front end over a [`ReadingFactory`]. Results come back as
/// plain serde records so callers outside Rust can consume them as JSON.
pub struct ReadingEngine {
    factory: ReadingFactory,
}

impl Default for ReadingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingEngine {
    pub fn new() -> Self {
        Self {
            factory: ReadingFactory::new(),
        }
    }

    pub fn from_settings_toml(toml: &str) -> Result<Self, ApiError> {
        let settings = parse_settings_toml(toml)?;
        Ok(Self {
            factory: ReadingFactory::with_settings(settings),
        })
    }

    pub fn from_settings_file(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::new(ErrorKind::Io, format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded settings");
        Self::from_settings_toml(&content)
    }

    pub fn factory(&self) -> &ReadingFactory {
        &self.factory
    }

    pub fn readings(&self) -> Vec<String> {
        self.factory
            .supported_readings()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    pub fn is_conversion_supported(&self, from: &str, to: &str) -> Result<bool, ApiError> {
        Ok(self.factory.is_conversion_supported(reading(from)?, reading(to)?))
    }

    pub fn default_options(&self, name: &str) -> Result<OptionMap, ApiError> {
        Ok(self.factory.default_options(reading(name)?)?)
    }

    pub fn decompose(&self, text: &str, name: &str, options: &OptionMap) -> Result<DecompositionRecord, ApiError> {
        Ok(self.factory.decompose(text, reading(name)?, options)?.into())
    }

    pub fn decompositions(
        &self,
        text: &str,
        name: &str,
        options: &OptionMap,
    ) -> Result<Vec<DecompositionRecord>, ApiError> {
        let all = self.factory.get_decompositions(text, reading(name)?, options)?;
        Ok(all.into_iter().map(DecompositionRecord::from).collect())
    }

    pub fn compose(&self, entities: &[String], name: &str, options: &OptionMap) -> Result<String, ApiError> {
        Ok(self.factory.compose(entities, reading(name)?, options)?)
    }

    pub fn is_reading_entity(&self, entity: &str, name: &str, options: &OptionMap) -> Result<bool, ApiError> {
        Ok(self.factory.is_reading_entity(entity, reading(name)?, options)?)
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionRecord, ApiError> {
        let (from, to) = (reading(&request.from)?, reading(&request.to)?);
        let converter = self.factory.converter(
            from,
            &request.from_options,
            to,
            &request.to_options,
            &request.converter_options,
        )?;
        Ok(ConversionRecord {
            text: converter.convert(&request.text)?,
            from: from.name().to_string(),
            to: to.name().to_string(),
            options: converter.options().clone(),
        })
    }

    /// JSON in, JSON out: a [`ConversionRequest`] yields a [`Reply`] holding
    /// either the [`ConversionRecord`] or the [`ApiError`].
    pub fn convert_json(&self, request: &str) -> String {
        let reply: Reply<ConversionRecord> = serde_json::from_str::<ConversionRequest>(request)
            .map_err(ApiError::from)
            .and_then(|req| self.convert(&req))
            .into();
        serde_json::to_string(&reply).unwrap_or_else(|e| {
            format!(r#"{{"err":{{"kind":"internal","message":{:?}}}}}"#, e.to_string())
        })
    }
}
