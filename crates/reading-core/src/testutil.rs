#![cfg(test)]

use std::sync::{Arc, OnceLock};

use crate::operator::{BuildContext, Operator};
use crate::options::OptionMap;
use crate::reading::Reading;
use crate::settings::BestEffort;
use crate::table::{EmbeddedTables, EntityTable};

/// Embedded tables, parsed once per test binary.
pub fn tables() -> Arc<dyn EntityTable> {
    static TABLES: OnceLock<Arc<EmbeddedTables>> = OnceLock::new();
    TABLES
        .get_or_init(|| Arc::new(EmbeddedTables::load().expect("embedded tables")))
        .clone()
}

pub fn ctx() -> BuildContext {
    BuildContext {
        tables: tables(),
        best_effort: BestEffort::LongestMatch,
    }
}

/// Operator for `reading` with the given options.
pub fn operator(reading: Reading, options: &OptionMap) -> Operator {
    Operator::build(reading, options, &ctx()).expect("operator builds")
}

/// Operator for `reading` with default options.
pub fn default_operator(reading: Reading) -> Operator {
    operator(reading, &OptionMap::new())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
