//! Common regex patterns for billing line classification.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrase marking a line with linked diagnosis codes.
pub const ASSOCIATED_DX_MARKER: &str = "Associated Dx";

lazy_static! {
    // CPT procedure code: five digits standing alone
    pub static ref PROCEDURE_CODE: Regex = Regex::new(
        r"\b\d{5}\b"
    ).unwrap();

    // Service date: M/D/YYYY or MM/DD/YYYY
    pub static ref SERVICE_DATE: Regex = Regex::new(
        r"\b\d{1,2}/\d{1,2}/\d{4}\b"
    ).unwrap();

    // Modifier: two uppercase letters (GC, LT) or two digits (26, 59)
    pub static ref MODIFIER: Regex = Regex::new(
        r"\b([A-Z]{2}|\d{2})\b"
    ).unwrap();

    // ICD-10 code in brackets: [E11.9]
    pub static ref BRACKETED_DIAGNOSIS: Regex = Regex::new(
        r"\[([A-Z0-9.]+)\]"
    ).unwrap();
}
