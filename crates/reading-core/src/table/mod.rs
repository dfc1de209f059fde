//! Read-only syllable and mapping tables.
//!
//! Operators and converters consult tables only through [`EntityTable`];
//! [`EmbeddedTables`] serves them from TOML compiled into the crate.

mod config;

use std::collections::BTreeMap;

pub use config::TableError;

/// Identifies one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    /// Pinyin syllable -> [initial, final].
    PinyinSyllables,
    /// Pinyin syllable -> [Wade-Giles syllable].
    WadeGiles,
    /// Pinyin syllable -> [GR base syllable].
    GrSyllables,
    /// GR final -> rhotacised finals per tone.
    GrRhotacised,
    /// Pinyin syllable -> [IPA initial, IPA final].
    MandarinIpa,
    /// Pinyin syllable -> [IPA initial, IPA final] for the reduced neutral tone.
    MandarinIpaFifthTone,
    /// Pinyin initial -> [Braille cell].
    BrailleInitials,
    /// Pinyin final -> [Braille cell].
    BrailleFinals,
    /// Punctuation -> [Braille cells].
    BraillePunctuation,
    /// Jyutping syllable -> [initial, final].
    JyutpingSyllables,
    /// Jyutping syllable -> [Yale syllable, initial, nucleus, coda].
    JyutpingYale,
    /// Jyutping syllable -> [IPA initial, IPA final, vowel length].
    CantoneseIpa,
    /// Shanghainese IPA syllable -> [initial, final, flags].
    ShanghaineseIpa,
}

/// A GR abbreviated spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation {
    pub chars: String,
    /// Full spelling, space separated for multi-syllable forms.
    pub full: String,
    pub abbreviated: String,
    pub flags: String,
}

impl Abbreviation {
    pub fn full_entities(&self) -> Vec<&str> {
        self.full.split(' ').collect()
    }
}

/// Source of syllable inventories and mapping tables.
pub trait EntityTable: Send + Sync {
    /// All keys of a table, sorted.
    fn entities(&self, table: TableId) -> Vec<&str>;

    /// The row stored for `entity`.
    fn entity_data(&self, table: TableId, entity: &str) -> Option<&[String]>;

    /// Keys whose row holds `value` in column `column`.
    fn mapping(&self, table: TableId, column: usize, value: &str) -> Vec<&str> {
        self.entities(table)
            .into_iter()
            .filter(|key| {
                self.entity_data(table, key)
                    .and_then(|row| row.get(column))
                    .is_some_and(|v| v == value)
            })
            .collect()
    }

    fn abbreviations(&self) -> &[Abbreviation];
}

/// Tables parsed from the TOML files shipped with the crate.
#[derive(Debug, Clone)]
pub struct EmbeddedTables {
    tables: BTreeMap<TableId, BTreeMap<String, Vec<String>>>,
    abbreviations: Vec<Abbreviation>,
}

impl EmbeddedTables {
    pub fn load() -> Result<Self, TableError> {
        let (tables, abbreviations) = config::load_embedded()?;
        Ok(Self {
            tables,
            abbreviations,
        })
    }

    pub fn len(&self, table: TableId) -> usize {
        self.tables.get(&table).map_or(0, BTreeMap::len)
    }
}

impl EntityTable for EmbeddedTables {
    fn entities(&self, table: TableId) -> Vec<&str> {
        self.tables
            .get(&table)
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn entity_data(&self, table: TableId, entity: &str) -> Option<&[String]> {
        self.tables
            .get(&table)
            .and_then(|t| t.get(entity))
            .map(Vec::as_slice)
    }

    fn abbreviations(&self) -> &[Abbreviation] {
        &self.abbreviations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded() {
        let t = EmbeddedTables::load().unwrap();
        assert!(t.len(TableId::PinyinSyllables) > 400);
        assert!(t.len(TableId::JyutpingSyllables) > 600);
        assert_eq!(
            t.entity_data(TableId::PinyinSyllables, "zhuang").unwrap(),
            &["zh".to_string(), "uang".to_string()]
        );
        assert_eq!(
            t.entity_data(TableId::WadeGiles, "guo").unwrap(),
            &["kuo".to_string()]
        );
        assert!(t.entity_data(TableId::PinyinSyllables, "xyz").is_none());
    }

    #[test]
    fn test_mapping_reverse_lookup() {
        let t = EmbeddedTables::load().unwrap();
        let mut keys = t.mapping(TableId::WadeGiles, 0, "lo");
        keys.sort_unstable();
        assert_eq!(keys, vec!["lo", "luo"]);
        assert_eq!(t.mapping(TableId::JyutpingYale, 0, "gwong"), vec!["gwong"]);
    }

    #[test]
    fn test_abbreviations() {
        let t = EmbeddedTables::load().unwrap();
        let shern = t
            .abbreviations()
            .iter()
            .find(|a| a.abbreviated == "sherm")
            .unwrap();
        assert_eq!(shern.full_entities(), vec!["shern", ".me"]);
        assert_eq!(
            t.abbreviations().iter().filter(|a| a.abbreviated == "m").count(),
            2
        );
    }
}
