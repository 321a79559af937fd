//! Rule-based token extractors for billing lines.

pub mod dates;
pub mod diagnosis;
pub mod modifier;
pub mod patterns;
pub mod procedure;

pub use dates::ServiceDateExtractor;
pub use diagnosis::{extract_diagnosis_codes, DiagnosisExtractor};
pub use modifier::{extract_modifier, ModifierExtractor};
pub use patterns::*;
pub use procedure::ProcedureCodeExtractor;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field in scan order.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, left to right.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A token found in a line, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }
}

impl ExtractionMatch<String> {
    pub(crate) fn from_regex(m: regex::Match<'_>) -> Self {
        Self::new(m.as_str().to_string(), m.start(), m.end())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}
