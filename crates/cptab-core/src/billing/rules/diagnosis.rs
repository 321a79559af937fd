//! ICD-10 diagnosis code extraction from "Associated Dx" lines.

use super::patterns::BRACKETED_DIAGNOSIS;
use super::{ExtractionMatch, FieldExtractor};

/// Extractor for bracketed diagnosis codes such as `[E11.9]`.
///
/// The value is the code without its brackets; the span covers the brackets.
pub struct DiagnosisExtractor;

impl DiagnosisExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiagnosisExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DiagnosisExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        BRACKETED_DIAGNOSIS
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let code = caps.get(1)?;
                Some(ExtractionMatch::new(
                    code.as_str().to_string(),
                    full.start(),
                    full.end(),
                ))
            })
            .collect()
    }
}

/// Extract every bracketed diagnosis code, left to right.
pub fn extract_diagnosis_codes(text: &str) -> Vec<String> {
    DiagnosisExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}
