//! Rendering of record tables into the supported output formats.

use cptab_core::models::config::{self, CptabConfig};
use cptab_core::{PdfTableWriter, RecordTable, TableExporter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON rows keyed by column header
    Json,
    /// CSV with a header row
    Csv,
    /// Aligned plain-text table
    Text,
    /// PDF table document
    Pdf,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Whether the output must go to a file rather than the terminal.
    pub fn is_binary(self) -> bool {
        matches!(self, OutputFormat::Pdf)
    }
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Json => OutputFormat::Json,
            config::OutputFormat::Csv => OutputFormat::Csv,
            config::OutputFormat::Text => OutputFormat::Text,
            config::OutputFormat::Pdf => OutputFormat::Pdf,
        }
    }
}

/// Render `table` in `format`.
pub fn render_table(
    table: &RecordTable,
    format: OutputFormat,
    config: &CptabConfig,
) -> anyhow::Result<Vec<u8>> {
    match format {
        OutputFormat::Json => {
            let json = if config.output.pretty_json {
                serde_json::to_string_pretty(table)?
            } else {
                serde_json::to_string(table)?
            };
            Ok(json.into_bytes())
        }
        OutputFormat::Csv => Ok(format_csv(table)?.into_bytes()),
        OutputFormat::Text => Ok(table.to_text().into_bytes()),
        OutputFormat::Pdf => {
            let writer = PdfTableWriter::from_config(config.export.clone());
            Ok(writer.export(table)?)
        }
    }
}

fn format_csv(table: &RecordTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for row in table.rows() {
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
