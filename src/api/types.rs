use serde::{Deserialize, Serialize};

use reading_core::settings::SettingsError;
use reading_core::{Decomposition, EntityKind, OptionMap, ReadingError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedOption,
    InvalidEntity,
    Decomposition,
    AmbiguousDecomposition,
    Conversion,
    AmbiguousConversion,
    Composition,
    Unsupported,
    InvalidRequest,
    Settings,
    Io,
    Internal,
}

/// Error record handed to callers; `kind` is stable, `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub(super) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ReadingError> for ApiError {
    fn from(err: ReadingError) -> Self {
        let kind = match &err {
            ReadingError::UnsupportedOption { .. } => ErrorKind::UnsupportedOption,
            ReadingError::InvalidEntity(_) => ErrorKind::InvalidEntity,
            ReadingError::Decomposition(_) => ErrorKind::Decomposition,
            ReadingError::AmbiguousDecomposition(_) => ErrorKind::AmbiguousDecomposition,
            ReadingError::Conversion(_) => ErrorKind::Conversion,
            ReadingError::AmbiguousConversion(_) => ErrorKind::AmbiguousConversion,
            ReadingError::Composition(_) => ErrorKind::Composition,
            ReadingError::Unsupported(_) => ErrorKind::Unsupported,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        Self::new(ErrorKind::Settings, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::InvalidRequest, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub text: String,
    /// `reading`, `formatting` or `other`.
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionRecord {
    pub entities: Vec<EntityRecord>,
    pub strict: bool,
}

impl From<Decomposition> for DecompositionRecord {
    fn from(d: Decomposition) -> Self {
        let entities = d
            .entities
            .into_iter()
            .map(|e| EntityRecord {
                kind: match e.kind {
                    EntityKind::Reading => "reading",
                    EntityKind::Formatting => "formatting",
                    EntityKind::Other => "other",
                }
                .to_string(),
                start: e.span.start,
                end: e.span.end,
                text: e.text,
            })
            .collect();
        Self {
            entities,
            strict: d.strict,
        }
    }
}

/// One conversion call. Option maps default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub text: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub from_options: OptionMap,
    #[serde(default)]
    pub to_options: OptionMap,
    #[serde(default)]
    pub converter_options: OptionMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub text: String,
    pub from: String,
    pub to: String,
    /// Resolved converter options, defaults included.
    pub options: OptionMap,
}

/// Reply to a JSON request: either the result or the error record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply<T> {
    Ok(T),
    Err(ApiError),
}

impl<T> From<Result<T, ApiError>> for Reply<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) => Reply::Ok(v),
            Err(e) => Reply::Err(e),
        }
    }
}
