//! Batch processing command for multiple OCR text files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use invscan_core::invoice::{validate_document, ExtractionResult, InvoiceParser, InvoiceTableBuilder};
use invscan_core::models::config::BoundaryMode;

use super::config::load_config;
use crate::output::{format_table, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Tolerate OCR errors in the invoice boundary token
    #[arg(long)]
    fuzzy: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.fuzzy {
        config.extraction.boundary_mode = BoundaryMode::Fuzzy;
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text" | "ocr")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let builder = Arc::new(InvoiceTableBuilder::from_config(&config.extraction)?);
    let keywords = Arc::new(config.extraction.required_keywords.clone());
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        let builder = Arc::clone(&builder);
        let keywords = Arc::clone(&keywords);
        let permits = Arc::clone(&permits);

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &builder, &keywords).await;
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            (index, path, outcome, processing_time_ms)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, outcome, processing_time_ms) = joined?;

        let entry = match outcome {
            Ok(result) => ProcessResult {
                path,
                result: Some(result),
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                ProcessResult {
                    path,
                    result: None,
                    error: Some(error_msg),
                    processing_time_ms,
                }
            }
        };

        results.push((index, entry));
        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        for entry in &results {
            let Some(result) = &entry.result else { continue };

            let output_name = entry
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoices");
            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_table(&result.table, args.format, &config.output)?;
            tokio::fs::write(&output_path, content).await?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.result.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let invoices: usize = results
        .iter()
        .filter_map(|r| r.result.as_ref())
        .map(|r| r.table.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files ({} invoices) in {:?}",
        style("✓").green(),
        results.len(),
        invoices,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!(
                "  - {}: {}",
                entry.path.display(),
                entry.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    builder: &InvoiceTableBuilder,
    keywords: &[String],
) -> anyhow::Result<ExtractionResult> {
    let text = tokio::fs::read_to_string(path).await?;
    validate_document(&text, keywords)?;

    let result = builder.parse(&text);
    if result.table.is_empty() {
        anyhow::bail!(
            "No invoices found ({} segments, {} dropped)",
            result.segments,
            result.dropped_segments
        );
    }

    Ok(result)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "segments",
        "invoices",
        "dropped_segments",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for entry in results {
        let row: [String; 8] = match &entry.result {
            Some(result) => [
                entry.path.display().to_string(),
                "ok".to_string(),
                result.segments.to_string(),
                result.table.len().to_string(),
                result.dropped_segments.to_string(),
                result.warnings.len().to_string(),
                entry.processing_time_ms.to_string(),
                String::new(),
            ],
            None => [
                entry.path.display().to_string(),
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                entry.processing_time_ms.to_string(),
                entry.error.clone().unwrap_or_else(|| "unknown error".to_string()),
            ],
        };
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
