//! Parse command - convert statements into ledger records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use cuenta_core::models::ledger::{LedgerRecord, StatementLayout};
use cuenta_core::summary::summarize;
use cuenta_core::{StatementDocument, StatementParser};

use super::load_config;
use super::output::{format_records, format_summary, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input files (PDF, .txt or .json token dump), optionally `FILE=BRANCH`
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Statement layout
    #[arg(short, long, value_enum, default_value = "auto")]
    layout: LayoutArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print per-entity totals to stderr
    #[arg(long)]
    summary: bool,

    /// Check every record and report invariant violations
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutArg {
    /// Detect from the document text
    Auto,
    /// One transaction per line
    Wide,
    /// Multi-line transaction blocks
    Block,
}

impl LayoutArg {
    pub fn layout(self) -> Option<StatementLayout> {
        match self {
            LayoutArg::Auto => None,
            LayoutArg::Wide => Some(StatementLayout::Wide),
            LayoutArg::Block => Some(StatementLayout::Block),
        }
    }
}

/// Split `FILE=BRANCH`; the branch defaults to the file stem.
pub fn split_input(input: &str) -> (PathBuf, String) {
    match input.split_once('=') {
        Some((path, branch)) if !branch.is_empty() => (PathBuf::from(path), branch.to_string()),
        _ => {
            let path = PathBuf::from(input.trim_end_matches('='));
            let branch = default_branch(&path);
            (path, branch)
        }
    }
}

pub fn default_branch(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement")
        .to_string()
}

/// Open and parse one document.
pub fn parse_file(
    parser: &StatementParser,
    path: &Path,
    branch: &str,
    layout: Option<StatementLayout>,
) -> anyhow::Result<Vec<LedgerRecord>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let document = StatementDocument::open(path, branch)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let parsed = parser
        .parse_document(&document, layout)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(parsed.records)
}

/// Print record validation issues to stderr.
fn report_issues(records: &[LedgerRecord]) {
    let issues: Vec<String> = records.iter().flat_map(LedgerRecord::validate).collect();

    if issues.is_empty() {
        eprintln!("{} All {} records valid", style("✓").green(), records.len());
        return;
    }

    warn!("{} validation issues", issues.len());
    eprintln!("{} Validation issues:", style("⚠").yellow());
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = StatementParser::new(config);

    let inputs: Vec<(PathBuf, String)> = args.inputs.iter().map(|s| split_input(s)).collect();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut records = Vec::new();
    for (path, branch) in &inputs {
        pb.set_message(branch.clone());
        info!("Processing {} as {}", path.display(), branch);

        let parsed = parse_file(&parser, path, branch, args.layout.layout())?;
        debug!("{}: {} records", path.display(), parsed.len());
        records.extend(parsed);

        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.validate {
        report_issues(&records);
    }

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.summary {
        eprintln!();
        eprint!("{}", format_summary(&summarize(&records)));
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
