/// Errors raised by operators, converters and the factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("unsupported option for {reading}: {name} = {value}")]
    UnsupportedOption {
        reading: String,
        name: String,
        value: String,
    },
    #[error("invalid entity: {0}")]
    InvalidEntity(String),
    #[error("decomposition failed: {0}")]
    Decomposition(String),
    #[error("ambiguous decomposition: {0}")]
    AmbiguousDecomposition(String),
    #[error("conversion failed: {0}")]
    Conversion(String),
    #[error("ambiguous conversion: {0}")]
    AmbiguousConversion(String),
    #[error("composition failed: {0}")]
    Composition(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ReadingError {
    /// `InvalidEntity`, `Decomposition` and `AmbiguousDecomposition`.
    pub fn is_decomposition_failure(&self) -> bool {
        matches!(
            self,
            ReadingError::InvalidEntity(_)
                | ReadingError::Decomposition(_)
                | ReadingError::AmbiguousDecomposition(_)
        )
    }

    /// `Conversion` and `AmbiguousConversion`.
    pub fn is_conversion_failure(&self) -> bool {
        matches!(
            self,
            ReadingError::Conversion(_) | ReadingError::AmbiguousConversion(_)
        )
    }

    /// Rewrap an `InvalidEntity` raised while rendering a target entity.
    pub(crate) fn into_conversion(self) -> Self {
        match self {
            ReadingError::InvalidEntity(msg) => ReadingError::Conversion(msg),
            other => other,
        }
    }
}

pub type Result<T, E = ReadingError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classes() {
        assert!(ReadingError::InvalidEntity("x".into()).is_decomposition_failure());
        assert!(ReadingError::AmbiguousDecomposition("x".into()).is_decomposition_failure());
        assert!(!ReadingError::Composition("x".into()).is_decomposition_failure());
        assert!(ReadingError::AmbiguousConversion("x".into()).is_conversion_failure());
        assert!(!ReadingError::Unsupported("x".into()).is_conversion_failure());
    }

    #[test]
    fn test_into_conversion() {
        let err = ReadingError::InvalidEntity("tone 7".into()).into_conversion();
        assert_eq!(err, ReadingError::Conversion("tone 7".into()));
        let err = ReadingError::Composition("a".into()).into_conversion();
        assert!(matches!(err, ReadingError::Composition(_)));
    }
}
