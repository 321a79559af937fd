//! Process command - extract records from a single text file or stdin.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use cptab_core::models::config::CptabConfig;
use cptab_core::{BillingExtractor, BillingParser, ExtractionError, ExtractionResult};

use super::load_config;
use super::output::{render_table, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file, or "-" to read from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout; PDF defaults to the configured file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Title drawn above the PDF table
    #[arg(long)]
    title: Option<String>,

    /// Show line statistics and extraction warnings
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(title) = &args.title {
        config.export.title = Some(title.clone());
    }

    let text = read_input(&args.input).await?;
    let result = extract(&text, &config)?;

    let table = result.table();
    let format = args
        .format
        .unwrap_or_else(|| config.output.default_format.into());
    let output = render_table(&table, format, &config)?;

    let output_path = match (&args.output, format.is_binary()) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(config.export.file_name.clone()),
        (None, false) => None,
    };

    if let Some(output_path) = output_path {
        tokio::fs::write(&output_path, &output).await?;
        println!(
            "{} Table generated successfully: {} records written to {}",
            style("✓").green(),
            table.len(),
            output_path.display()
        );
    } else {
        print!("{}", String::from_utf8_lossy(&output));
    }

    if args.show_stats {
        print_stats(&result);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run checked extraction and turn the two empty conditions into user messages.
pub fn extract(text: &str, config: &CptabConfig) -> anyhow::Result<ExtractionResult> {
    let parser = BillingParser::from_config(&config.extraction);

    match parser.extract(text) {
        Ok(result) => {
            info!("Extracted {} records", result.records.len());
            for warning in &result.warnings {
                debug!("{}", warning);
            }
            Ok(result)
        }
        Err(ExtractionError::EmptyInput) => {
            anyhow::bail!("Input is empty. Please paste text first.")
        }
        Err(ExtractionError::NoRecords) => {
            anyhow::bail!("No valid CPT/date rows detected.")
        }
    }
}

async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        debug!("Reading billing text from stdin");
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    info!("Processing file: {}", input.display());
    Ok(tokio::fs::read_to_string(input).await?)
}

fn print_stats(result: &ExtractionResult) {
    let stats = &result.stats;

    eprintln!();
    eprintln!("{} Lines read: {}", style("ℹ").blue(), stats.total_lines);
    eprintln!("   procedure lines:   {}", stats.procedure_lines);
    eprintln!("   association lines: {}", stats.association_lines);
    eprintln!("   ignored lines:     {}", stats.noise_lines + stats.blank_lines);
    eprintln!("{} Processing time: {}ms", style("ℹ").blue(), result.processing_time_ms);

    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }
}
