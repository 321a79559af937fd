//! Service date extraction.
//!
//! Dates are kept exactly as written; `3/4/2024` and `03/04/2024` stay
//! distinct and nothing checks that the month or day is in range.

use super::patterns::SERVICE_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Service date extractor for `M/D/YYYY` shaped tokens.
pub struct ServiceDateExtractor;

impl ServiceDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ServiceDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ServiceDateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        SERVICE_DATE.find(text).map(ExtractionMatch::from_regex)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        SERVICE_DATE
            .find_iter(text)
            .map(ExtractionMatch::from_regex)
            .collect()
    }
}
