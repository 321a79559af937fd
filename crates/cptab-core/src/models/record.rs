//! Billing record extracted from a single procedure line.

use serde::{Deserialize, Serialize};

/// Separator used when diagnosis codes are rendered into one cell.
pub const DIAGNOSIS_SEPARATOR: &str = ", ";

/// One extracted billing line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Service date exactly as written (`M/D/YYYY`, not normalized).
    pub date: String,

    /// Five-digit CPT procedure code.
    pub procedure_code: String,

    /// Two-letter or two-digit modifier, empty when none was found.
    #[serde(default)]
    pub modifier: String,

    /// ICD-10 codes from the last matching "Associated Dx" line.
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,

    /// Text preceding the procedure code on its line.
    #[serde(default)]
    pub description: String,
}

impl BillingRecord {
    /// Create a record with no diagnosis codes attached yet.
    pub fn new(
        date: impl Into<String>,
        procedure_code: impl Into<String>,
        modifier: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            procedure_code: procedure_code.into(),
            modifier: modifier.into(),
            diagnosis_codes: Vec::new(),
            description: description.into(),
        }
    }

    /// Attach diagnosis codes.
    pub fn with_diagnosis_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diagnosis_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Diagnosis codes joined for display, e.g. `"I10, E78.5"`.
    pub fn diagnosis_display(&self) -> String {
        self.diagnosis_codes.join(DIAGNOSIS_SEPARATOR)
    }

    pub fn has_diagnosis(&self) -> bool {
        !self.diagnosis_codes.is_empty()
    }
}
