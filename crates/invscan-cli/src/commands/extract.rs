//! Extract command - build the invoice table for one OCR document.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use invscan_core::invoice::{join_pages, validate_document, InvoiceParser, InvoiceTableBuilder};
use invscan_core::models::config::{BoundaryMode, InvscanConfig};
use invscan_core::DocumentError;

use super::config::load_config;
use crate::output::{format_table, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text files, one per page in order ("-" reads stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Tolerate OCR errors in the invoice boundary token
    #[arg(long)]
    fuzzy: bool,

    /// Report suspicious values in the extracted rows
    #[arg(long)]
    validate: bool,

    /// Show segment counts and timing
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.fuzzy {
        config.extraction.boundary_mode = BoundaryMode::Fuzzy;
    }

    let mut pages = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        pages.push(read_input(input).await?);
    }
    let text = join_pages(&pages);

    info!("Read {} pages, {} characters", pages.len(), text.len());

    let table = extract_table(&text, &config, args.validate, args.show_stats)?;
    let output = format_table(&table, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    eprintln!("{} Processing Complete", style("✓").green());
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(tokio::fs::read_to_string(input).await?)
}

fn extract_table(
    text: &str,
    config: &InvscanConfig,
    validate: bool,
    show_stats: bool,
) -> anyhow::Result<invscan_core::ResultTable> {
    validate_document(text, &config.extraction.required_keywords)?;

    let builder = InvoiceTableBuilder::from_config(&config.extraction)?;
    let result = builder.parse(text);

    if show_stats {
        eprintln!(
            "{} {} segments, {} invoices, {} dropped in {}ms",
            style("ℹ").blue(),
            result.segments,
            result.table.len(),
            result.dropped_segments,
            result.processing_time_ms
        );
    }

    if result.table.is_empty() {
        return Err(DocumentError::NoInvoices {
            boundary: config.extraction.boundary_token.clone(),
            segments: result.segments,
        }
        .into());
    }

    if validate && !result.warnings.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &result.warnings {
            eprintln!("  - {}", issue);
        }
    } else {
        for issue in &result.warnings {
            debug!("{}", issue);
        }
    }

    Ok(result.table)
}
