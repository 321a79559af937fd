//! Single-pass billing text parser.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::BillingRecord;
use crate::models::table::RecordTable;

use super::associator::{Association, RecordAssociator};
use super::line::{split_lines, LineClass, LineClassifier};
use super::{BillingExtractor, Result};

/// Per-parse line counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    /// Lines in the input, blank ones included.
    pub total_lines: usize,
    pub blank_lines: usize,
    /// Lines that opened a record.
    pub procedure_lines: usize,
    /// Association lines whose codes were attached to a record.
    pub association_lines: usize,
    /// Association lines whose codes overwrote earlier ones.
    pub replaced_associations: usize,
    /// Association lines seen before any procedure line.
    pub orphan_association_lines: usize,
    /// Association lines without bracketed codes.
    pub codeless_association_lines: usize,
    pub noise_lines: usize,
}

/// Result of checked extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted records in document order.
    pub records: Vec<BillingRecord>,
    /// Line counters.
    pub stats: LineStats,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Records as a five-column table.
    pub fn table(&self) -> RecordTable {
        RecordTable::from_records(&self.records)
    }
}

/// Line classifier and associator.
#[derive(Debug, Clone)]
pub struct BillingParser {
    classifier: LineClassifier,
    /// Whether checked extraction fails when no record was found.
    require_records: bool,
}

impl BillingParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(),
            require_records: true,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_association_marker(config.association_marker.clone())
            .with_require_records(config.require_records)
    }

    /// Set the phrase that marks association lines.
    pub fn with_association_marker(mut self, marker: impl Into<String>) -> Self {
        self.classifier = self.classifier.with_association_marker(marker);
        self
    }

    /// Set whether an empty result is an error in checked extraction.
    pub fn with_require_records(mut self, require: bool) -> Self {
        self.require_records = require;
        self
    }

    /// Run one pass over `text`, returning records and line counters.
    pub fn scan(&self, text: &str) -> (Vec<BillingRecord>, LineStats) {
        let mut associator = RecordAssociator::new();
        let mut stats = LineStats::default();

        for (number, line) in split_lines(text).enumerate() {
            stats.total_lines += 1;

            match self.classifier.classify(line) {
                LineClass::Blank => {
                    stats.blank_lines += 1;
                }
                LineClass::Procedure(procedure) => {
                    trace!(
                        "line {}: procedure {} on {}",
                        number + 1,
                        procedure.procedure_code,
                        procedure.date
                    );
                    associator.open(procedure.into_record());
                    stats.procedure_lines += 1;
                }
                LineClass::Association { codes } => match associator.associate(codes) {
                    Association::Applied { index, replaced } => {
                        trace!("line {}: diagnosis codes attached to record {}", number + 1, index);
                        stats.association_lines += 1;
                        if replaced {
                            stats.replaced_associations += 1;
                        }
                    }
                    Association::NoCurrentRecord => {
                        debug!("line {}: association line before any procedure line", number + 1);
                        stats.orphan_association_lines += 1;
                    }
                    Association::NoCodes => {
                        debug!("line {}: association line without bracketed codes", number + 1);
                        stats.codeless_association_lines += 1;
                    }
                },
                LineClass::Noise => {
                    stats.noise_lines += 1;
                }
            }
        }

        (associator.into_records(), stats)
    }
}

impl Default for BillingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingExtractor for BillingParser {
    fn parse(&self, text: &str) -> Vec<BillingRecord> {
        self.scan(text).0
    }

    fn extract(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Parsing billing text from {} characters of text", text.len());

        let (records, stats) = self.scan(text);

        if records.is_empty() && self.require_records {
            debug!("No procedure line among {} lines", stats.total_lines);
            return Err(ExtractionError::NoRecords);
        }

        let warnings = collect_warnings(&records, &stats, self.classifier.association_marker());

        debug!(
            "Extracted {} records ({} with diagnoses) from {} lines",
            records.len(),
            records.iter().filter(|r| r.has_diagnosis()).count(),
            stats.total_lines
        );

        Ok(ExtractionResult {
            records,
            stats,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn collect_warnings(records: &[BillingRecord], stats: &LineStats, marker: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if records.is_empty() {
        warnings.push("No valid CPT/date rows detected".to_string());
    }

    if stats.orphan_association_lines > 0 {
        warnings.push(format!(
            "{} '{}' line(s) appeared before any procedure line and were ignored",
            stats.orphan_association_lines, marker
        ));
    }

    if stats.codeless_association_lines > 0 {
        warnings.push(format!(
            "{} '{}' line(s) had no bracketed codes",
            stats.codeless_association_lines, marker
        ));
    }

    if stats.replaced_associations > 0 {
        warnings.push(format!(
            "{} '{}' line(s) replaced codes from an earlier line for the same procedure",
            stats.replaced_associations, marker
        ));
    }

    let missing = records.iter().filter(|r| !r.has_diagnosis()).count();
    if missing > 0 && !records.is_empty() {
        warnings.push(format!("{} record(s) have no diagnosis codes", missing));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<BillingRecord> {
        BillingParser::new().parse(text)
    }

    #[test]
    fn test_single_procedure_with_diagnosis() {
        let records = parse("Office visit 99213 03/14/2024 GC\nAssociated Dx [E11.9]");

        assert_eq!(
            records,
            vec![BillingRecord::new("03/14/2024", "99213", "GC", "Office visit")
                .with_diagnosis_codes(["E11.9"])]
        );
    }

    #[test]
    fn test_multiple_codes_joined() {
        let records = parse("Office visit 99214 04/02/2024\nAssociated Dx [I10], [E78.5]");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diagnosis_display(), "I10, E78.5");
    }

    #[test]
    fn test_notes_only_yield_nothing() {
        assert!(parse("Patient notes: follow up next week").is_empty());
    }

    #[test]
    fn test_procedure_without_date_yields_nothing() {
        assert!(parse("Office visit 99213").is_empty());
    }

    #[test]
    fn test_consecutive_procedures_without_diagnoses() {
        let records = parse("Office visit 99213 03/14/2024\nVenipuncture 36415 03/14/2024");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].procedure_code, "99213");
        assert_eq!(records[1].procedure_code, "36415");
        assert!(records.iter().all(|r| r.diagnosis_codes.is_empty()));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n").is_empty());
    }

    #[test]
    fn test_carriage_return_and_unicode_line_breaks() {
        let expected = vec![BillingRecord::new("03/14/2024", "99213", "GC", "Office visit")
            .with_diagnosis_codes(["E11.9"])];

        assert_eq!(parse("Office visit 99213 03/14/2024 GC\rAssociated Dx [E11.9]"), expected);
        assert_eq!(
            parse("Office visit 99213 03/14/2024 GC\u{2028}Associated Dx [E11.9]"),
            expected
        );
    }

    #[test]
    fn test_overlapping_repeated_date() {
        let records = parse("Visit 99213 12/12/2012/12/2012 GC");

        assert_eq!(records[0].date, "12/12/2012");
        assert_eq!(records[0].modifier, "12");
    }

    #[test]
    fn test_orphan_association_ignored() {
        let records = parse("Associated Dx [Z00.00]\nOffice visit 99213 03/14/2024");

        assert_eq!(records.len(), 1);
        assert!(records[0].diagnosis_codes.is_empty());
    }

    #[test]
    fn test_later_association_line_wins() {
        let records = parse(
            "Office visit 99213 03/14/2024 25\n\
             Associated Dx [I10]\n\
             Associated Dx [E11.9], [Z79.4]\n\
             Venipuncture 36415 03/14/2024",
        );

        assert_eq!(records[0].diagnosis_display(), "E11.9, Z79.4");
        assert!(records[1].diagnosis_codes.is_empty());
    }

    #[test]
    fn test_codeless_association_keeps_codes() {
        let records = parse(
            "Office visit 99213 03/14/2024\n\
             Associated Dx [I10]\n\
             Associated Dx pending review",
        );

        assert_eq!(records[0].diagnosis_display(), "I10");
    }

    #[test]
    fn test_association_across_noise() {
        let text = r#"
            CLAIM DETAIL REPORT
            Office visit, est. patient 99214 01/08/2024 GC
            Rendering: Dr. Smith
            Place of service 11

            Associated Dx [E11.65], [I10]
            Lipid panel 80061 1/8/2024 90
            Comment: fasting
            Associated Dx [E78.5]
        "#;

        let records = parse(text);

        assert_eq!(
            records,
            vec![
                BillingRecord::new("01/08/2024", "99214", "GC", "Office visit, est. patient")
                    .with_diagnosis_codes(["E11.65", "I10"]),
                BillingRecord::new("1/8/2024", "80061", "90", "Lipid panel")
                    .with_diagnosis_codes(["E78.5"]),
            ]
        );
    }

    #[test]
    fn test_record_count_matches_procedure_lines() {
        let text = "A 11111 1/1/2024\nnoise\nAssociated Dx [A00]\nB 22222 2/2/2024\nC 33333 3/3/2024\nnoise 44444";
        let (records, stats) = BillingParser::new().scan(text);

        assert_eq!(records.len(), 3);
        assert_eq!(stats.procedure_lines, 3);
        assert_eq!(stats.association_lines, 1);
        assert_eq!(stats.noise_lines, 2);
        assert_eq!(stats.total_lines, 6);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = "Office visit 99213 03/14/2024 GC\nAssociated Dx [E11.9]\nX-ray 71046 03/14/2024 26";
        let parser = BillingParser::new();

        assert_eq!(parser.parse(text), parser.parse(text));
    }

    #[test]
    fn test_first_code_and_date_used() {
        let records = parse("Visit 99213 03/14/2024 then 99214 03/15/2024");

        assert_eq!(records[0].procedure_code, "99213");
        assert_eq!(records[0].date, "03/14/2024");
        assert_eq!(records[0].description, "Visit");
    }

    #[test]
    fn test_extract_empty_input() {
        let err = BillingParser::new().extract("  \n ").unwrap_err();

        assert_eq!(err, ExtractionError::EmptyInput);
    }

    #[test]
    fn test_extract_no_records() {
        let err = BillingParser::new()
            .extract("Patient notes: follow up next week")
            .unwrap_err();

        assert_eq!(err, ExtractionError::NoRecords);
    }

    #[test]
    fn test_extract_no_records_allowed() {
        let result = BillingParser::new()
            .with_require_records(false)
            .extract("Patient notes: follow up next week")
            .unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.warnings, vec!["No valid CPT/date rows detected"]);
    }

    #[test]
    fn test_extract_reports_partial_associations() {
        let result = BillingParser::new()
            .extract(
                "Associated Dx [I10]\n\
                 Office visit 99213 03/14/2024\n\
                 Associated Dx none",
            )
            .unwrap();

        assert_eq!(result.stats.orphan_association_lines, 1);
        assert_eq!(result.stats.codeless_association_lines, 1);
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.table().len(), 1);
    }

    #[test]
    fn test_from_config_marker() {
        let config = ExtractionConfig {
            association_marker: "Dx:".to_string(),
            require_records: true,
        };
        let records = BillingParser::from_config(&config).parse("Visit 99213 03/14/2024\nDx: [R05.9]");

        assert_eq!(records[0].diagnosis_display(), "R05.9");
    }
}
