use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

/// A supported reading (phonetic notation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Reading {
    Pinyin,
    WadeGiles,
    Gr,
    Jyutping,
    CantoneseYale,
    MandarinIpa,
    CantoneseIpa,
    ShanghaineseIpa,
    MandarinBraille,
    Hangul,
    Hiragana,
    Katakana,
    Kana,
}

impl Reading {
    pub const ALL: [Reading; 13] = [
        Reading::Pinyin,
        Reading::WadeGiles,
        Reading::Gr,
        Reading::Jyutping,
        Reading::CantoneseYale,
        Reading::MandarinIpa,
        Reading::CantoneseIpa,
        Reading::ShanghaineseIpa,
        Reading::MandarinBraille,
        Reading::Hangul,
        Reading::Hiragana,
        Reading::Katakana,
        Reading::Kana,
    ];

    /// Canonical name, as used in settings files and option maps.
    pub fn name(self) -> &'static str {
        match self {
            Reading::Pinyin => "Pinyin",
            Reading::WadeGiles => "WadeGiles",
            Reading::Gr => "GR",
            Reading::Jyutping => "Jyutping",
            Reading::CantoneseYale => "CantoneseYale",
            Reading::MandarinIpa => "MandarinIPA",
            Reading::CantoneseIpa => "CantoneseIPA",
            Reading::ShanghaineseIpa => "ShanghaineseIPA",
            Reading::MandarinBraille => "MandarinBraille",
            Reading::Hangul => "Hangul",
            Reading::Hiragana => "Hiragana",
            Reading::Katakana => "Katakana",
            Reading::Kana => "Kana",
        }
    }

    /// Readings written in Latin letters with a closed syllable inventory.
    pub fn is_romanisation(self) -> bool {
        matches!(
            self,
            Reading::Pinyin
                | Reading::WadeGiles
                | Reading::Gr
                | Reading::Jyutping
                | Reading::CantoneseYale
        )
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Reading {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reading::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| ReadingError::Unsupported(format!("reading '{s}'")))
    }
}

impl TryFrom<String> for Reading {
    type Error = ReadingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Reading> for &'static str {
    fn from(r: Reading) -> Self {
        r.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for r in Reading::ALL {
            assert_eq!(r.name().parse::<Reading>().unwrap(), r);
        }
    }

    #[test]
    fn test_unknown_reading() {
        let err = "Bopomofo".parse::<Reading>().unwrap_err();
        assert!(matches!(err, ReadingError::Unsupported(_)));
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        #[derive(Deserialize)]
        struct Row {
            reading: Reading,
        }
        let row: Row = toml::from_str("reading = \"GR\"").unwrap();
        assert_eq!(row.reading, Reading::Gr);
        assert!(toml::from_str::<Row>("reading = \"Gwoyeu\"").is_err());
    }
}
