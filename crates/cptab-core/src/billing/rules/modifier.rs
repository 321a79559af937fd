//! CPT modifier extraction.

use super::patterns::MODIFIER;
use super::{ExtractionMatch, FieldExtractor};

/// Modifier extractor for two-letter (`GC`) or two-digit (`26`) tokens.
pub struct ModifierExtractor;

impl ModifierExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ModifierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ModifierExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        MODIFIER.find(text).map(ExtractionMatch::from_regex)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MODIFIER
            .find_iter(text)
            .map(ExtractionMatch::from_regex)
            .collect()
    }
}

/// Find the modifier of a procedure line.
///
/// Only the text after the date is searched, so digits of the date or the
/// procedure code are never taken for a modifier. When the date text occurs
/// more than once, the search starts after the last of its non-overlapping
/// occurrences, counted from the left. A modifier
/// written between the code and an earlier date is not found.
///
/// Returned offsets are relative to `line`.
pub fn extract_modifier(line: &str, date: &str) -> Option<ExtractionMatch<String>> {
    let tail_start = line
        .match_indices(date)
        .last()
        .map(|(pos, _)| pos + date.len())
        .unwrap_or(0);

    ModifierExtractor::new()
        .extract(&line[tail_start..])
        .map(|m| ExtractionMatch::new(m.value, m.start + tail_start, m.end + tail_start))
}
