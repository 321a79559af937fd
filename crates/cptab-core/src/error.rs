//! Error types for the cptab-core library.

use thiserror::Error;

/// Main error type for the cptab library.
#[derive(Error, Debug)]
pub enum CptabError {
    /// Billing record extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Table export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by the checked extraction entry point.
///
/// The line parser itself never fails; these describe the two result
/// conditions a caller has to tell apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The input was empty or contained only whitespace.
    #[error("input text is empty")]
    EmptyInput,

    /// Parsing finished without recognizing a single procedure line.
    #[error("no valid CPT/date rows detected")]
    NoRecords,
}

/// Errors related to table export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// There are no records to export.
    #[error("table has no rows")]
    EmptyTable,

    /// The configured page cannot hold a single table row.
    #[error("invalid page layout: {0}")]
    Layout(String),

    /// Failed to build or serialize the PDF document.
    #[error("failed to write PDF: {0}")]
    Pdf(String),

    /// I/O error while writing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the cptab library.
pub type Result<T> = std::result::Result<T, CptabError>;
