//! Table export to documents.

pub mod layout;
mod pdf;

pub use layout::{cell_alignment, Align, TableLayout};
pub use pdf::PdfTableWriter;

use std::path::Path;

use crate::error::ExportError;
use crate::models::table::RecordTable;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Trait for record table exporters.
pub trait TableExporter {
    /// Render the table into document bytes.
    fn export(&self, table: &RecordTable) -> Result<Vec<u8>>;

    /// Render the table and write it to `path`.
    fn export_to_file(&self, table: &RecordTable, path: &Path) -> Result<()> {
        let bytes = self.export(table)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
