//! Character classification and letter-case helpers.

use unicode_normalization::UnicodeNormalization;

/// Hiragana (U+3041..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c)
}

/// Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Precomposed Hangul syllables (U+AC00..U+D7A3).
pub fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Braille patterns block (U+2800..U+28FF).
pub fn is_braille(c: char) -> bool {
    ('\u{2800}'..='\u{28FF}').contains(&c)
}

pub fn nfd(s: &str) -> String {
    s.nfd().collect()
}

pub fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// At least one cased letter and no lowercase ones.
pub fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// First letter uppercase, all following letters lowercase.
pub fn is_title(s: &str) -> bool {
    let mut letters = s.chars().filter(|c| c.is_alphabetic());
    match letters.next() {
        Some(first) if first.is_uppercase() => letters.all(|c| !c.is_uppercase()),
        _ => false,
    }
}

pub fn to_title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut seen_letter = false;
    for c in s.chars() {
        if !seen_letter && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            seen_letter = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Apply the letter case of `source` (upper, title or lower) to `target`.
pub fn transfer_case(source: &str, target: &str) -> String {
    if is_upper(source) && source.chars().filter(|c| c.is_alphabetic()).count() > 1 {
        target.to_uppercase()
    } else if is_title(source) || is_upper(source) {
        to_title(target)
    } else {
        target.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ア'));
        assert!(is_hangul('한'));
        assert!(!is_hangul('a'));
        assert!(is_braille('⠁'));
    }

    #[test]
    fn test_case_predicates() {
        assert!(is_upper("HAN"));
        assert!(!is_upper("Han"));
        assert!(is_title("Han"));
        assert!(is_title("Ān"));
        assert!(!is_title("hAn"));
        assert!(!is_upper("'"));
    }

    #[test]
    fn test_transfer_case() {
        assert_eq!(transfer_case("HAN4", "hàn"), "HÀN");
        assert_eq!(transfer_case("Han4", "hàn"), "Hàn");
        assert_eq!(transfer_case("han4", "hàn"), "hàn");
        // A single capital letter reads as title case.
        assert_eq!(transfer_case("A1", "ā"), "Ā");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(nfc("a\u{0304}"), "ā");
        assert_eq!(nfd("ǘ").chars().count(), 3);
    }
}
