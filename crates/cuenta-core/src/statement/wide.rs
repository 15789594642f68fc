//! Wide layout: one transaction per reconstructed line.
//!
//! ```text
//! RABINO, SOL 27-12345678-0
//! 01/03/2026 INGRESADO FV 0001-00001234 1.234,56
//! 05/03/2026 COBRADO TX 88 500,00
//! ```

use rust_decimal::Decimal;

use crate::models::config::{CuentaConfig, MarkerConfig};
use crate::models::ledger::StatementLayout;

use super::entity::detect_wide_header;
use super::rules::amounts::AmountExtractor;
use super::rules::dates::leading_date;
use super::rules::reference::{extract_reference, fallback_reference};
use super::rules::{FieldExtractor, Resolver, RowStatus};
use super::{Classified, LineClass, RowClassifier, StatementRow};

type WideRule = fn(&WideClassifier, &str) -> Option<LineClass>;

/// Line rules in precedence order; the first match wins.
const WIDE_RULES: &[(&str, WideRule)] = &[
    ("entity_header", WideClassifier::entity_header),
    ("dated_row", WideClassifier::dated_row),
];

/// Classifier for single-line transactions.
#[derive(Debug, Clone)]
pub struct WideClassifier {
    markers: MarkerConfig,
    reference_slice: (usize, usize),
    resolver: Resolver,
}

impl WideClassifier {
    pub fn new(config: &CuentaConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            reference_slice: config.extraction.reference_slice,
            resolver: Resolver::new(&config.markers),
        }
    }

    /// Classify a single reconstructed line.
    pub fn classify_line(&self, line: &str) -> LineClass {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::Unrecognized;
        }

        WIDE_RULES
            .iter()
            .find_map(|(_, rule)| rule(self, line))
            .unwrap_or(LineClass::Unrecognized)
    }

    fn entity_header(&self, line: &str) -> Option<LineClass> {
        detect_wide_header(line).map(|(_, ctx)| LineClass::Header(ctx))
    }

    fn dated_row(&self, line: &str) -> Option<LineClass> {
        let date = leading_date(line)?;

        // The running balance is printed last.
        let amount = AmountExtractor::new()
            .extract_all(line)
            .last()
            .map(|m| m.value)
            .unwrap_or(Decimal::ZERO);

        let status = RowStatus::scan(line).label().to_string();

        let markers = [
            self.markers.voucher.as_str(),
            self.markers.transfer.as_str(),
            self.markers.credit_note.as_str(),
        ];
        let reference = extract_reference(line, &markers).unwrap_or_else(|| {
            fallback_reference(line, self.reference_slice.0, self.reference_slice.1)
        });

        let resolution = self.resolver.resolve(amount, &status, &reference);

        Some(LineClass::Transaction(StatementRow {
            date: Some(date.to_string()),
            reference,
            amount,
            status,
            resolution,
            raw_line: line.to_string(),
            layout: StatementLayout::Wide,
        }))
    }
}

impl Default for WideClassifier {
    fn default() -> Self {
        Self::new(&CuentaConfig::default())
    }
}

impl RowClassifier for WideClassifier {
    fn classify(&self, lines: &[&str], index: usize) -> Classified {
        let class = lines
            .get(index)
            .map(|line| self.classify_line(line))
            .unwrap_or(LineClass::Unrecognized);
        Classified::new(class, index + 1)
    }
}
