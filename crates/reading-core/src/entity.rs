use std::fmt;
use std::ops::Range;

/// Tone of a tonal entity.
///
/// Numbered readings (Pinyin, Wade-Giles, Jyutping, Braille) use `Number`;
/// readings whose tones carry names (GR, Cantonese Yale, the IPA readings)
/// use `Named`. "No tonal information" is expressed as `Option::<Tone>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tone {
    Number(u8),
    Named(&'static str),
}

impl Tone {
    pub fn number(self) -> Option<u8> {
        match self {
            Tone::Number(n) => Some(n),
            Tone::Named(_) => None,
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Tone::Named(s) => Some(s),
            Tone::Number(_) => None,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Number(n) => write!(f, "{n}"),
            Tone::Named(s) => f.write_str(s),
        }
    }
}

/// Render an optional tone for error messages.
pub(crate) fn tone_label(tone: Option<Tone>) -> String {
    tone.map_or_else(|| "none".to_string(), |t| t.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A valid entity of the reading.
    Reading,
    /// A separator such as the Pinyin apostrophe.
    Formatting,
    /// Material that is not part of the reading.
    Other,
}

/// One segment of a decomposed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
    /// Byte range in the decomposed input.
    pub span: Range<usize>,
}

impl Entity {
    pub fn is_reading(&self) -> bool {
        self.kind == EntityKind::Reading
    }
}

/// An ordered segmentation whose entity texts concatenate to the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Decomposition {
    pub entities: Vec<Entity>,
    /// Set when every ambiguity was resolved without falling back to the
    /// longest-match tie-break.
    pub strict: bool,
}

impl Decomposition {
    pub fn texts(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn into_texts(self) -> Vec<String> {
        self.entities.into_iter().map(|e| e.text).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Builds a decomposition from consecutive texts, assigning spans in order.
    pub(crate) fn from_parts(parts: Vec<(String, EntityKind)>, strict: bool) -> Self {
        let mut offset = 0;
        let entities = parts
            .into_iter()
            .map(|(text, kind)| {
                let span = offset..offset + text.len();
                offset = span.end;
                Entity { text, kind, span }
            })
            .collect();
        Self { entities, strict }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_follow_text() {
        let d = Decomposition::from_parts(
            vec![
                ("tiān".to_string(), EntityKind::Reading),
                ("'".to_string(), EntityKind::Formatting),
                ("ān".to_string(), EntityKind::Reading),
            ],
            true,
        );
        assert_eq!(d.entities[0].span, 0..5);
        assert_eq!(d.entities[1].span, 5..6);
        assert_eq!(d.entities[2].span, 6..9);
        assert_eq!(d.texts(), vec!["tiān", "'", "ān"]);
    }

    #[test]
    fn test_tone_display() {
        assert_eq!(Tone::Number(3).to_string(), "3");
        assert_eq!(Tone::Named("1stTone").to_string(), "1stTone");
        assert_eq!(tone_label(None), "none");
        assert_eq!(Tone::Named("2ndTone").number(), None);
    }
}
