//! Billing text extraction.
//!
//! Lines are classified top to bottom. A line with both a five-digit
//! procedure code and a date opens a new record; a later line containing
//! the association marker ("Associated Dx") sets the diagnosis codes of the
//! most recently opened record. Everything else is ignored.

mod associator;
mod line;
mod parser;
pub mod rules;

pub use associator::{Association, RecordAssociator};
pub use line::{split_lines, LineClass, LineClassifier, ProcedureLine};
pub use parser::{BillingParser, ExtractionResult, LineStats};

use crate::error::ExtractionError;
use crate::models::record::BillingRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for billing record extractors.
pub trait BillingExtractor {
    /// Extract records from text. Never fails; unrecognized lines are skipped.
    fn parse(&self, text: &str) -> Vec<BillingRecord>;

    /// Extract records, reporting empty input and empty results as errors.
    fn extract(&self, text: &str) -> Result<ExtractionResult>;
}

/// Parse billing text with the default parser.
pub fn parse(text: &str) -> Vec<BillingRecord> {
    BillingParser::new().parse(text)
}
