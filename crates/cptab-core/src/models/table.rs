//! Tabular view of extracted records.
//!
//! Display and export consumers rely on the column names and their order
//! being stable: `Date`, `CPT Code`, `Modifiers`, `ICD10 Code`, `Description`.

use serde::{Deserialize, Serialize};

use super::record::BillingRecord;

/// A column of the record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    CptCode,
    Modifiers,
    Icd10Code,
    Description,
}

impl Column {
    /// All columns in table order.
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::CptCode,
        Column::Modifiers,
        Column::Icd10Code,
        Column::Description,
    ];

    /// Header label of the column.
    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::CptCode => "CPT Code",
            Column::Modifiers => "Modifiers",
            Column::Icd10Code => "ICD10 Code",
            Column::Description => "Description",
        }
    }

    /// Cell value of this column for a record.
    pub fn value(self, record: &BillingRecord) -> String {
        match self {
            Column::Date => record.date.clone(),
            Column::CptCode => record.procedure_code.clone(),
            Column::Modifiers => record.modifier.clone(),
            Column::Icd10Code => record.diagnosis_display(),
            Column::Description => record.description.clone(),
        }
    }
}

/// One record flattened into the table's column contract.
///
/// Serializes as an object keyed by the column headers, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "CPT Code")]
    pub cpt_code: String,

    #[serde(rename = "Modifiers")]
    pub modifiers: String,

    #[serde(rename = "ICD10 Code")]
    pub icd10_code: String,

    #[serde(rename = "Description")]
    pub description: String,
}

impl TableRow {
    /// Cell values in column order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.date,
            &self.cpt_code,
            &self.modifiers,
            &self.icd10_code,
            &self.description,
        ]
    }
}

impl From<&BillingRecord> for TableRow {
    fn from(record: &BillingRecord) -> Self {
        Self {
            date: Column::Date.value(record),
            cpt_code: Column::CptCode.value(record),
            modifiers: Column::Modifiers.value(record),
            icd10_code: Column::Icd10Code.value(record),
            description: Column::Description.value(record),
        }
    }
}

/// The record list rendered as a five-column table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordTable {
    rows: Vec<TableRow>,
}

impl RecordTable {
    /// Build the table from records, keeping their order.
    pub fn from_records(records: &[BillingRecord]) -> Self {
        Self {
            rows: records.iter().map(TableRow::from).collect(),
        }
    }

    /// Header labels in column order.
    pub fn header() -> [&'static str; 5] {
        Column::ALL.map(Column::header)
    }

    /// Header row followed by every data row, each in column order.
    ///
    /// This is the shape document exporters consume.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(Self::header().iter().map(|h| h.to_string()).collect());
        rows.extend(
            self.rows
                .iter()
                .map(|row| row.cells().iter().map(|c| c.to_string()).collect()),
        );
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an aligned plain-text table for terminal display.
    pub fn to_text(&self) -> String {
        let rows = self.rows();
        let mut widths = [0usize; 5];
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let separator = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");

        let mut output = String::new();
        for (index, row) in rows.iter().enumerate() {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!(" {:<width$} ", cell, width = widths[i]))
                .collect::<Vec<_>>()
                .join("|");
            output.push_str(line.trim_end());
            output.push('\n');
            if index == 0 {
                output.push_str(&separator);
                output.push('\n');
            }
        }

        output
    }
}
