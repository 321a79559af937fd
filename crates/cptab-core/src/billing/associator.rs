//! Record sequence with an explicit "current record" cursor.

use crate::models::record::BillingRecord;

/// Outcome of an association attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// Codes were written to the record at `index`.
    Applied {
        index: usize,
        /// The record already had codes from an earlier association line.
        replaced: bool,
    },
    /// No procedure line has been seen yet.
    NoCurrentRecord,
    /// The association line had no bracketed codes; nothing changed.
    NoCodes,
}

/// Builds the record list for one parse.
///
/// `current` only moves forward through [`RecordAssociator::open`], and
/// [`RecordAssociator::associate`] only ever touches the record it points to.
#[derive(Debug, Default)]
pub struct RecordAssociator {
    records: Vec<BillingRecord>,
    current: Option<usize>,
}

impl RecordAssociator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and make it the association target.
    pub fn open(&mut self, record: BillingRecord) -> usize {
        self.records.push(record);
        let index = self.records.len() - 1;
        self.current = Some(index);
        index
    }

    /// Replace the current record's diagnosis codes.
    pub fn associate(&mut self, codes: Vec<String>) -> Association {
        let Some(index) = self.current else {
            return Association::NoCurrentRecord;
        };
        if codes.is_empty() {
            return Association::NoCodes;
        }

        let record = &mut self.records[index];
        let replaced = record.has_diagnosis();
        record.diagnosis_codes = codes;

        Association::Applied { index, replaced }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&BillingRecord> {
        self.current.map(|index| &self.records[index])
    }

    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BillingRecord> {
        self.records
    }
}
