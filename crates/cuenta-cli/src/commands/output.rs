//! Rendering of ledger records and entity totals.

use std::collections::BTreeMap;

use console::style;
use serde::Serialize;

use cuenta_core::models::ledger::LedgerRecord;
use cuenta_core::statement::rules::format_amount;
use cuenta_core::summary::EntityTotals;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON import file, records grouped by branch
    Json,
    /// One CSV row per record
    Csv,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// JSON export: per-branch record lists plus the combined list.
#[derive(Debug, Serialize)]
pub struct LedgerExport<'a> {
    pub branches: BTreeMap<&'a str, Vec<&'a LedgerRecord>>,
    pub global: &'a [LedgerRecord],
}

impl<'a> LedgerExport<'a> {
    pub fn new(records: &'a [LedgerRecord]) -> Self {
        let mut branches: BTreeMap<&str, Vec<&LedgerRecord>> = BTreeMap::new();
        for record in records {
            branches.entry(record.branch.as_str()).or_default().push(record);
        }
        Self {
            branches,
            global: records,
        }
    }
}

pub fn format_records(records: &[LedgerRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&LedgerExport::new(records))?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[LedgerRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[LedgerRecord]) -> String {
    let mut output = String::new();
    let mut entity: Option<(&str, &str)> = None;

    for record in records {
        let current = (record.entity.as_str(), record.tax_id.as_str());
        if entity != Some(current) {
            if entity.is_some() {
                output.push('\n');
            }
            if record.tax_id.is_empty() {
                output.push_str(&format!("{} [{}]\n", record.entity, record.branch));
            } else {
                output.push_str(&format!(
                    "{} ({}) [{}]\n",
                    record.entity, record.tax_id, record.branch
                ));
            }
            entity = Some(current);
        }

        let amount = if record.is_transfer {
            "-".to_string()
        } else if !record.credit.is_zero() {
            format!("-{}", format_amount(record.credit))
        } else {
            format_amount(record.debit)
        };

        output.push_str(&format!(
            "  {:<10}  {:<16}  {:<20}  {:>14}\n",
            record.date.as_deref().unwrap_or("-"),
            record.entry_type.label(),
            record.reference,
            amount
        ));
    }

    output
}

/// Totals table for the terminal.
pub fn format_summary(totals: &[EntityTotals]) -> String {
    let mut output = String::new();

    for t in totals {
        let tax_id = match t.tax_id_valid {
            Some(true) => t.tax_id.clone(),
            Some(false) => format!("{} {}", t.tax_id, style("(check digit mismatch)").yellow()),
            None => "-".to_string(),
        };

        output.push_str(&format!("{}  {}\n", style(&t.entity).bold(), tax_id));
        output.push_str(&format!(
            "  records {}  transfers {}  debit {}  credit {}  balance {}\n",
            t.records,
            t.transfers,
            format_amount(t.debit),
            format_amount(t.credit),
            format_amount(t.balance)
        ));
        if let (Some(first), Some(last)) = (t.first_date, t.last_date) {
            output.push_str(&format!(
                "  from {}  to {}\n",
                first.format("%d/%m/%Y"),
                last.format("%d/%m/%Y")
            ));
        }
    }

    output
}

/// Totals as CSV, one row per entity.
pub fn summary_csv(totals: &[EntityTotals]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entity",
        "tax_id",
        "tax_id_valid",
        "records",
        "transfers",
        "debit",
        "credit",
        "balance",
        "first_date",
        "last_date",
    ])?;

    for t in totals {
        wtr.write_record([
            t.entity.as_str(),
            t.tax_id.as_str(),
            &t.tax_id_valid.map(|v| v.to_string()).unwrap_or_default(),
            &t.records.to_string(),
            &t.transfers.to_string(),
            &t.debit.to_string(),
            &t.credit.to_string(),
            &t.balance.to_string(),
            &t.first_date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
            &t.last_date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
