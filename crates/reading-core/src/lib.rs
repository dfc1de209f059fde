//! Segmentation, validation and conversion of phonetic notations ("readings")
//! used to transcribe Han characters.
//!
//! The [`factory::ReadingFactory`] is the entry point: it owns the embedded
//! syllable tables, builds and caches operators and converters, and resolves
//! conversions either directly or through a configured bridge reading.

pub mod converter;
pub mod entity;
pub mod error;
pub mod factory;
pub mod operator;
pub mod options;
pub mod reading;
pub mod settings;
pub mod table;
pub(crate) mod testutil;
pub(crate) mod unicode;

pub use entity::{Decomposition, Entity, EntityKind, Tone};
pub use error::{ReadingError, Result};
pub use factory::ReadingFactory;
pub use options::{OptionMap, OptionValue};
pub use reading::Reading;
