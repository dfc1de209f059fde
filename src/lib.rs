//! Reading operators and converters for Chinese and related scripts.
//!
//! [`reading_core`] does the work; this crate adds the serde-facing
//! [`api`] and optional trace output.

pub mod api;
pub mod trace_init;

pub use reading_core::{
    Decomposition, Entity, EntityKind, OptionMap, OptionValue, Reading, ReadingError,
    ReadingFactory, Tone,
};
