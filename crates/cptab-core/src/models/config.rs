//! Configuration structures for extraction and export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for cptab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CptabConfig {
    /// Billing text extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF table export configuration.
    pub export: ExportConfig,

    /// CLI output configuration.
    pub output: OutputConfig,
}

/// Billing text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Phrase that marks a line carrying linked diagnosis codes.
    pub association_marker: String,

    /// Treat a run without any record as an error in checked extraction.
    pub require_records: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            association_marker: "Associated Dx".to_string(),
            require_records: true,
        }
    }
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// US letter, 612 x 792 pt.
    #[default]
    Letter,
    /// ISO A4, 595 x 842 pt.
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.0, 842.0),
        }
    }
}

/// PDF table export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Page size of the generated document.
    pub page_size: PageSize,

    /// Page margin in points, applied on every side.
    pub margin: f32,

    /// Font size for table cells in points.
    pub font_size: f32,

    /// Vertical padding inside each cell in points.
    pub cell_padding: f32,

    /// Gray level (0.0 black - 1.0 white) of the header row background.
    pub header_shade: f32,

    /// Stroke width of the table grid in points.
    pub grid_width: f32,

    /// Optional title drawn above the table on the first page.
    pub title: Option<String>,

    /// Default file name for PDF output.
    pub file_name: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin: 72.0,
            font_size: 10.0,
            cell_padding: 4.0,
            // reportlab's lightgrey
            header_shade: 0.827,
            grid_width: 1.0,
            title: None,
            file_name: PathBuf::from("CPT_Table_Output.pdf"),
        }
    }
}

/// Default output format for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON array of rows keyed by column header.
    Json,
    /// CSV with a header row.
    Csv,
    /// Aligned plain-text table.
    #[default]
    Text,
    /// PDF table document.
    Pdf,
}

/// CLI output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--format` is not given.
    pub default_format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl CptabConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
