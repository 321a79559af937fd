//! CPT procedure code extraction.

use super::patterns::PROCEDURE_CODE;
use super::{ExtractionMatch, FieldExtractor};

/// Procedure code extractor.
///
/// Matches any standalone five-digit run; no check against the CPT code set.
pub struct ProcedureCodeExtractor;

impl ProcedureCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcedureCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ProcedureCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        PROCEDURE_CODE.find(text).map(ExtractionMatch::from_regex)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PROCEDURE_CODE
            .find_iter(text)
            .map(ExtractionMatch::from_regex)
            .collect()
    }
}
