//! Entry point: builds, caches and hands out operators and converters.
//!
//! Operators are cached by reading and resolved options, converters by
//! direction, resolved endpoint options and resolved converter options, so
//! an empty option map and an explicit map of all defaults share one
//! instance. Caches are plain `RwLock<HashMap>`s owned by the factory;
//! concurrent misses for one key publish a single instance.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, debug_span};

use crate::converter::{self, ConverterKind, OperatorSource, ReadingConverter};
use crate::entity::Decomposition;
use crate::error::Result;
use crate::operator::{BuildContext, Operator, ReadingOperator};
use crate::options::{merged, OptionMap};
use crate::reading::Reading;
use crate::settings::Settings;
use crate::table::{EmbeddedTables, EntityTable};

type OperatorKey = (Reading, OptionMap);
type ConverterKey = (Reading, Reading, OptionMap, OptionMap, OptionMap);

/// Map guarded by a lock. Values are immutable once published, so a poisoned
/// lock still holds consistent data.
struct Cache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Publish `value` under `resolved` unless another thread got there
    /// first, and remember it under `alias` as well. Returns the published
    /// value.
    fn publish(&self, alias: K, resolved: K, value: V) -> V {
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let value = map.entry(resolved).or_insert(value).clone();
        map.entry(alias).or_insert_with(|| value.clone());
        value
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub struct ReadingFactory {
    settings: Settings,
    ctx: BuildContext,
    operators: Cache<OperatorKey, Arc<Operator>>,
    converters: Cache<ConverterKey, Arc<dyn ReadingConverter>>,
}

impl Default for ReadingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingFactory {
    /// Factory over the embedded tables with the embedded default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let tables = EmbeddedTables::load().expect("embedded tables are validated at build time");
        Self::with_tables(settings, Arc::new(tables))
    }

    /// Factory over caller-supplied tables.
    pub fn with_tables(settings: Settings, tables: Arc<dyn EntityTable>) -> Self {
        let ctx = BuildContext {
            tables,
            best_effort: settings.segmentation.best_effort,
        };
        Self {
            settings,
            ctx,
            operators: Cache::new(),
            converters: Cache::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn supported_readings(&self) -> &'static [Reading] {
        &Reading::ALL
    }

    /// Whether `from -> to` converts directly or through a configured
    /// bridge whose two legs both exist.
    pub fn is_conversion_supported(&self, from: Reading, to: Reading) -> bool {
        ConverterKind::for_direction(from, to).is_some()
            || self.settings.bridge_for(from, to).is_some_and(|via| {
                ConverterKind::for_direction(from, via).is_some()
                    && ConverterKind::for_direction(via, to).is_some()
            })
    }

    /// Resolved options of `reading` when the caller gives none.
    pub fn default_options(&self, reading: Reading) -> Result<OptionMap> {
        Ok(self.operator(reading, &OptionMap::new())?.options().clone())
    }

    /// Operator for `reading`. Configured defaults apply beneath `options`.
    pub fn operator(&self, reading: Reading, options: &OptionMap) -> Result<Arc<Operator>> {
        match self.settings.defaults_for(reading) {
            Some(defaults) => self.cached_operator(reading, &merged(defaults, options)),
            None => self.cached_operator(reading, options),
        }
    }

    fn cached_operator(&self, reading: Reading, options: &OptionMap) -> Result<Arc<Operator>> {
        let alias = (reading, options.clone());
        if let Some(op) = self.operators.get(&alias) {
            return Ok(op);
        }
        let _span = debug_span!("build_operator", %reading).entered();
        let op = Operator::build(reading, options, &self.ctx)?;
        let resolved = (reading, op.options().clone());
        let op = self.operators.publish(alias, resolved, Arc::new(op));
        debug!(cached = self.operators.len(), "operator cache miss");
        Ok(op)
    }

    /// Converter for `from -> to`.
    pub fn converter(
        &self,
        from: Reading,
        from_options: &OptionMap,
        to: Reading,
        to_options: &OptionMap,
        converter_options: &OptionMap,
    ) -> Result<Arc<dyn ReadingConverter>> {
        let source = self.operator(from, from_options)?;
        let target = self.operator(to, to_options)?;
        let alias = (
            from,
            to,
            source.options().clone(),
            target.options().clone(),
            converter_options.clone(),
        );
        if let Some(conv) = self.converters.get(&alias) {
            return Ok(conv);
        }
        let _span = debug_span!("build_converter", %from, %to).entered();
        let conv = converter::build(source, target, converter_options, self)?;
        let resolved = (
            from,
            to,
            alias.2.clone(),
            alias.3.clone(),
            conv.options().clone(),
        );
        let conv = self.converters.publish(alias, resolved, conv);
        debug!(cached = self.converters.len(), "converter cache miss");
        Ok(conv)
    }

    pub fn decompose(&self, text: &str, reading: Reading, options: &OptionMap) -> Result<Decomposition> {
        let _span = debug_span!("decompose", %reading, len = text.len()).entered();
        self.operator(reading, options)?.decompose(text)
    }

    /// Every valid decomposition of `text`.
    pub fn get_decompositions(
        &self,
        text: &str,
        reading: Reading,
        options: &OptionMap,
    ) -> Result<Vec<Decomposition>> {
        let _span = debug_span!("decompositions", %reading, len = text.len()).entered();
        self.operator(reading, options)?.decompositions(text)
    }

    pub fn compose(&self, entities: &[String], reading: Reading, options: &OptionMap) -> Result<String> {
        self.operator(reading, options)?.compose(entities)
    }

    pub fn is_reading_entity(&self, entity: &str, reading: Reading, options: &OptionMap) -> Result<bool> {
        Ok(self.operator(reading, options)?.is_reading_entity(entity))
    }

    /// Convert `text` with default converter options.
    pub fn convert(
        &self,
        text: &str,
        from: Reading,
        from_options: &OptionMap,
        to: Reading,
        to_options: &OptionMap,
    ) -> Result<String> {
        self.converter(from, from_options, to, to_options, &OptionMap::new())?
            .convert(text)
    }

    pub fn convert_entities(
        &self,
        entities: &[String],
        from: Reading,
        from_options: &OptionMap,
        to: Reading,
        to_options: &OptionMap,
    ) -> Result<Vec<String>> {
        self.converter(from, from_options, to, to_options, &OptionMap::new())?
            .convert_entities(entities)
    }
}

impl OperatorSource for ReadingFactory {
    fn operator(&self, reading: Reading, options: &OptionMap) -> Result<Arc<Operator>> {
        self.cached_operator(reading, options)
    }

    fn tables(&self) -> Arc<dyn EntityTable> {
        self.ctx.tables.clone()
    }

    fn bridge_for(&self, from: Reading, to: Reading) -> Option<Reading> {
        self.settings.bridge_for(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadingError;
    use crate::options::option_map;
    use crate::settings::parse_settings_toml;

    #[test]
    fn test_operator_cache_resolves_defaults() {
        let factory = ReadingFactory::new();
        let implicit = factory.operator(Reading::Pinyin, &OptionMap::new()).unwrap();
        let explicit = factory
            .operator(Reading::Pinyin, &option_map([("toneMarkType", "diacritics")]))
            .unwrap();
        assert!(Arc::ptr_eq(&implicit, &explicit));
        let numbers = factory
            .operator(Reading::Pinyin, &option_map([("toneMarkType", "numbers")]))
            .unwrap();
        assert!(!Arc::ptr_eq(&implicit, &numbers));
    }

    #[test]
    fn test_converter_cache() {
        let factory = ReadingFactory::new();
        let numbers = option_map([("toneMarkType", "numbers")]);
        let a = factory
            .converter(Reading::Pinyin, &numbers, Reading::Gr, &OptionMap::new(), &OptionMap::new())
            .unwrap();
        let b = factory
            .converter(
                Reading::Pinyin,
                &numbers,
                Reading::Gr,
                &OptionMap::new(),
                &option_map([("grOptionalNeutralToneMapping", "original")]),
            )
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_lookups_share_one_instance() {
        let factory = ReadingFactory::new();
        let numbers = option_map([("toneMarkType", "numbers")]);
        let (operators, converters): (Vec<_>, Vec<_>) = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let op = factory.operator(Reading::Pinyin, &numbers).unwrap();
                        let conv = factory
                            .converter(Reading::Pinyin, &numbers, Reading::Gr, &OptionMap::new(), &OptionMap::new())
                            .unwrap();
                        (op, conv)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).unzip()
        });
        assert!(operators.iter().all(|op| Arc::ptr_eq(op, &operators[0])));
        assert!(converters.iter().all(|conv| Arc::ptr_eq(conv, &converters[0])));
        let again = factory.operator(Reading::Pinyin, &numbers).unwrap();
        assert!(Arc::ptr_eq(&again, &operators[0]));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let factory = ReadingFactory::new();
        let err = factory
            .decompose("ni3", Reading::Pinyin, &option_map([("toneMarks", "numbers")]))
            .unwrap_err();
        assert!(matches!(err, ReadingError::UnsupportedOption { .. }));
    }

    #[test]
    fn test_conversion_support() {
        let factory = ReadingFactory::new();
        assert!(factory.is_conversion_supported(Reading::Pinyin, Reading::Gr));
        assert!(factory.is_conversion_supported(Reading::Gr, Reading::MandarinIpa));
        assert!(!factory.is_conversion_supported(Reading::MandarinIpa, Reading::Pinyin));
        let err = factory
            .convert("a", Reading::Hangul, &OptionMap::new(), Reading::Pinyin, &OptionMap::new())
            .unwrap_err();
        assert!(matches!(err, ReadingError::Unsupported(_)));
    }

    #[test]
    fn test_settings_defaults_apply_beneath_caller_options() {
        let settings = parse_settings_toml(
            r#"
[segmentation]
best_effort = "longest_match"

[defaults.Pinyin]
toneMarkType = "numbers"
"#,
        )
        .unwrap();
        let factory = ReadingFactory::with_settings(settings);
        let d = factory.decompose("han4zi4", Reading::Pinyin, &OptionMap::new()).unwrap();
        assert_eq!(d.texts(), vec!["han4", "zi4"]);
        let defaults = factory.default_options(Reading::Pinyin).unwrap();
        assert_eq!(defaults["toneMarkType"], "numbers".into());
        let diacritics = option_map([("toneMarkType", "diacritics")]);
        let d = factory.decompose("hànzì", Reading::Pinyin, &diacritics).unwrap();
        assert_eq!(d.texts(), vec!["hàn", "zì"]);
    }
}
