mod cantonese;
mod mandarin;
mod policy;
mod proptest_conversion;
mod scenarios;

use std::sync::OnceLock;

use crate::factory::ReadingFactory;
use crate::options::OptionMap;
use crate::reading::Reading;

/// Factory with the embedded settings, shared by the tests of one binary.
pub(super) fn factory() -> &'static ReadingFactory {
    static FACTORY: OnceLock<ReadingFactory> = OnceLock::new();
    FACTORY.get_or_init(ReadingFactory::new)
}

/// Convert with explicit endpoint options and default converter options.
pub(super) fn convert(
    text: &str,
    from: Reading,
    from_options: &OptionMap,
    to: Reading,
    to_options: &OptionMap,
) -> crate::error::Result<String> {
    factory().convert(text, from, from_options, to, to_options)
}
