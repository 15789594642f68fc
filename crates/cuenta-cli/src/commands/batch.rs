//! Batch processing command for all statements of one branch.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cuenta_core::models::ledger::LedgerRecord;
use cuenta_core::summary::summarize;
use cuenta_core::StatementParser;

use super::load_config;
use super::output::{format_records, summary_csv, OutputFormat};
use super::parse::{parse_file, LayoutArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input files
    #[arg(required = true)]
    input: String,

    /// Branch label for every matched file
    #[arg(short, long)]
    branch: String,

    /// Statement layout
    #[arg(short, long, value_enum, default_value = "auto")]
    layout: LayoutArg,

    /// Output directory for per-file results (default: combined output on stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write per-entity totals to summary.csv
    #[arg(long)]
    summary: bool,

    /// Continue processing if a file fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    records: Option<Vec<LedgerRecord>>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = StatementParser::new(config);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "json")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = parse_file(&parser, &path, &args.branch, args.layout.layout());
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(records) => results.push(FileResult {
                path,
                records: Some(records),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        records: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<&FileResult> = results.iter().filter(|r| r.records.is_some()).collect();
    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let all_records: Vec<LedgerRecord> = successful
        .iter()
        .filter_map(|r| r.records.as_ref())
        .flatten()
        .cloned()
        .collect();

    match &args.output_dir {
        Some(output_dir) => {
            for result in &successful {
                let Some(records) = &result.records else { continue };
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

                fs::write(&output_path, format_records(records, args.format)?)?;
                debug!(
                    "Wrote {} records to {} ({}ms)",
                    records.len(),
                    output_path.display(),
                    result.processing_time_ms
                );
            }
        }
        None => println!("{}", format_records(&all_records, args.format)?),
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        fs::write(&summary_path, summary_csv(&summarize(&all_records))?)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files ({} records) in {:?}",
        style("✓").green(),
        results.len(),
        all_records.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
