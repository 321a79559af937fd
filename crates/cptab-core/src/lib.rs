//! Core library for clinical billing text extraction.
//!
//! This crate provides:
//! - Line classification of free-form billing text (procedure lines,
//!   "Associated Dx" lines, noise)
//! - Association of diagnosis codes with the most recent procedure record
//! - The five-column record table (`Date`, `CPT Code`, `Modifiers`,
//!   `ICD10 Code`, `Description`)
//! - PDF table export

pub mod billing;
pub mod error;
#[cfg(feature = "pdf")]
pub mod export;
pub mod models;

pub use billing::{parse, BillingExtractor, BillingParser, ExtractionResult, LineStats};
pub use error::{CptabError, ExportError, ExtractionError, Result};
#[cfg(feature = "pdf")]
pub use export::{PdfTableWriter, TableExporter};
pub use models::config::CptabConfig;
pub use models::record::BillingRecord;
pub use models::table::{Column, RecordTable, TableRow};
