use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use super::{Abbreviation, TableId};

const PINYIN_TOML: &str = include_str!("../../data/pinyin.toml");
const WADE_GILES_TOML: &str = include_str!("../../data/wade_giles.toml");
const GR_TOML: &str = include_str!("../../data/gr.toml");
const MANDARIN_IPA_TOML: &str = include_str!("../../data/mandarin_ipa.toml");
const BRAILLE_TOML: &str = include_str!("../../data/braille.toml");
const JYUTPING_TOML: &str = include_str!("../../data/jyutping.toml");
const SHANGHAINESE_IPA_TOML: &str = include_str!("../../data/shanghainese_ipa.toml");

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{file}: TOML parse error: {message}")]
    Parse { file: &'static str, message: String },
    #[error("{file}: [{section}] table is empty")]
    Empty {
        file: &'static str,
        section: &'static str,
    },
    #[error("{file}: row {key:?} has {found} columns, expected {expected}")]
    Arity {
        file: &'static str,
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("{file}: value {value:?} is not unique")]
    Duplicate { file: &'static str, value: String },
}

type Rows = BTreeMap<String, Vec<String>>;

#[derive(Debug, Deserialize)]
struct PinyinFile {
    syllables: Rows,
}

#[derive(Debug, Deserialize)]
struct WadeGilesFile {
    pinyin: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GrFile {
    pinyin: BTreeMap<String, String>,
    rhotacised: Rows,
    abbreviation: Vec<AbbreviationRow>,
}

#[derive(Debug, Deserialize)]
struct AbbreviationRow {
    chars: String,
    full: String,
    abbreviated: String,
    #[serde(default)]
    flags: String,
}

#[derive(Debug, Deserialize)]
struct MandarinIpaFile {
    pinyin: Rows,
    fifth_tone: Rows,
}

#[derive(Debug, Deserialize)]
struct BrailleFile {
    initials: BTreeMap<String, String>,
    finals: BTreeMap<String, String>,
    punctuation: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct JyutpingFile {
    syllables: Rows,
    yale: Rows,
    ipa: Rows,
}

#[derive(Debug, Deserialize)]
struct ShanghaineseFile {
    syllables: Rows,
}

fn parse<T: for<'de> Deserialize<'de>>(file: &'static str, content: &str) -> Result<T, TableError> {
    toml::from_str(content).map_err(|e| TableError::Parse {
        file,
        message: e.to_string(),
    })
}

/// Check a section is non-empty and every row has `width` columns.
fn check_rows(
    file: &'static str,
    section: &'static str,
    rows: &Rows,
    width: usize,
) -> Result<(), TableError> {
    if rows.is_empty() {
        return Err(TableError::Empty { file, section });
    }
    for (key, row) in rows {
        if row.len() != width {
            return Err(TableError::Arity {
                file,
                key: key.clone(),
                expected: width,
                found: row.len(),
            });
        }
    }
    Ok(())
}

fn scalar_rows(
    file: &'static str,
    section: &'static str,
    map: BTreeMap<String, String>,
) -> Result<Rows, TableError> {
    if map.is_empty() {
        return Err(TableError::Empty { file, section });
    }
    Ok(map.into_iter().map(|(k, v)| (k, vec![v])).collect())
}

fn check_unique_column(file: &'static str, rows: &Rows, column: usize) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for row in rows.values() {
        if !seen.insert(row[column].as_str()) {
            return Err(TableError::Duplicate {
                file,
                value: row[column].clone(),
            });
        }
    }
    Ok(())
}

pub(super) fn load_embedded(
) -> Result<(BTreeMap<TableId, Rows>, Vec<Abbreviation>), TableError> {
    let mut tables = BTreeMap::new();

    let pinyin: PinyinFile = parse("pinyin.toml", PINYIN_TOML)?;
    check_rows("pinyin.toml", "syllables", &pinyin.syllables, 2)?;
    tables.insert(TableId::PinyinSyllables, pinyin.syllables);

    let wg: WadeGilesFile = parse("wade_giles.toml", WADE_GILES_TOML)?;
    tables.insert(
        TableId::WadeGiles,
        scalar_rows("wade_giles.toml", "pinyin", wg.pinyin)?,
    );

    let gr: GrFile = parse("gr.toml", GR_TOML)?;
    tables.insert(
        TableId::GrSyllables,
        scalar_rows("gr.toml", "pinyin", gr.pinyin)?,
    );
    check_rows("gr.toml", "rhotacised", &gr.rhotacised, 6)?;
    tables.insert(TableId::GrRhotacised, gr.rhotacised);
    let abbreviations = gr
        .abbreviation
        .into_iter()
        .map(|a| Abbreviation {
            chars: a.chars,
            full: a.full,
            abbreviated: a.abbreviated,
            flags: a.flags,
        })
        .collect();

    let ipa: MandarinIpaFile = parse("mandarin_ipa.toml", MANDARIN_IPA_TOML)?;
    check_rows("mandarin_ipa.toml", "pinyin", &ipa.pinyin, 2)?;
    check_rows("mandarin_ipa.toml", "fifth_tone", &ipa.fifth_tone, 2)?;
    tables.insert(TableId::MandarinIpa, ipa.pinyin);
    tables.insert(TableId::MandarinIpaFifthTone, ipa.fifth_tone);

    let braille: BrailleFile = parse("braille.toml", BRAILLE_TOML)?;
    tables.insert(
        TableId::BrailleInitials,
        scalar_rows("braille.toml", "initials", braille.initials)?,
    );
    tables.insert(
        TableId::BrailleFinals,
        scalar_rows("braille.toml", "finals", braille.finals)?,
    );
    tables.insert(
        TableId::BraillePunctuation,
        scalar_rows("braille.toml", "punctuation", braille.punctuation)?,
    );

    let jyutping: JyutpingFile = parse("jyutping.toml", JYUTPING_TOML)?;
    check_rows("jyutping.toml", "syllables", &jyutping.syllables, 2)?;
    check_rows("jyutping.toml", "yale", &jyutping.yale, 4)?;
    check_rows("jyutping.toml", "ipa", &jyutping.ipa, 3)?;
    check_unique_column("jyutping.toml", &jyutping.yale, 0)?;
    tables.insert(TableId::JyutpingSyllables, jyutping.syllables);
    tables.insert(TableId::JyutpingYale, jyutping.yale);
    tables.insert(TableId::CantoneseIpa, jyutping.ipa);

    let sh: ShanghaineseFile = parse("shanghainese_ipa.toml", SHANGHAINESE_IPA_TOML)?;
    check_rows("shanghainese_ipa.toml", "syllables", &sh.syllables, 3)?;
    tables.insert(TableId::ShanghaineseIpa, sh.syllables);

    Ok((tables, abbreviations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_rows() {
        let toml = r#"
[syllables]
"ba" = ["b", "a"]
"a" = ["", "a"]
"#;
        let f: PinyinFile = parse("test.toml", toml).unwrap();
        check_rows("test.toml", "syllables", &f.syllables, 2).unwrap();
        assert_eq!(f.syllables["a"], vec!["".to_string(), "a".to_string()]);
    }

    #[test]
    fn error_empty_section() {
        let f: PinyinFile = parse("test.toml", "[syllables]\n").unwrap();
        let err = check_rows("test.toml", "syllables", &f.syllables, 2).unwrap_err();
        assert!(matches!(err, TableError::Empty { .. }));
    }

    #[test]
    fn error_wrong_arity() {
        let f: PinyinFile = parse("test.toml", "[syllables]\n\"ba\" = [\"b\"]\n").unwrap();
        let err = check_rows("test.toml", "syllables", &f.syllables, 2).unwrap_err();
        assert!(matches!(err, TableError::Arity { found: 1, .. }));
    }

    #[test]
    fn error_duplicate_column() {
        let toml = r#"
[syllables]
"a" = ["x", "1"]
"b" = ["x", "2"]
"#;
        let f: PinyinFile = parse("test.toml", toml).unwrap();
        let err = check_unique_column("test.toml", &f.syllables, 0).unwrap_err();
        assert!(matches!(err, TableError::Duplicate { .. }));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse::<PinyinFile>("test.toml", "not valid toml {{{").unwrap_err();
        assert!(matches!(err, TableError::Parse { .. }));
    }
}
