//! Block layout: one transaction spread over the lines after a type marker.
//!
//! ```text
//! CUENTA CORRIENTE            <- trigger
//! COBRADO                     <- status
//! $ 1.500,00                  <- up to three amounts
//! $ 0,00
//! $ 1.500,00
//! FV 0001-00001234 / GOMEZ    <- reference (text before the first '/')
//! 01/03/2026                  <- issue date
//! 31/03/2026                  <- due date
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::config::{CuentaConfig, ExtractionConfig};
use crate::models::ledger::StatementLayout;

use super::entity::header_pair;
use super::rules::amounts::BlockAmountExtractor;
use super::rules::dates::{leading_date, DateExtractor};
use super::rules::{FieldExtractor, Resolver};
use super::{Classified, LineClass, RowClassifier, StatementRow};

/// Classifier for multi-line transaction blocks.
#[derive(Debug, Clone)]
pub struct BlockClassifier {
    trigger: String,
    extraction: ExtractionConfig,
    resolver: Resolver,
}

impl BlockClassifier {
    pub fn new(config: &CuentaConfig) -> Self {
        Self {
            trigger: config.markers.block_trigger.clone(),
            extraction: config.extraction.clone(),
            resolver: Resolver::new(&config.markers),
        }
    }

    /// Whether the line opens a transaction block.
    pub fn is_trigger(&self, line: &str) -> bool {
        !self.trigger.is_empty() && line.contains(&self.trigger)
    }

    /// First index at or after `from` where another block or an entity
    /// header begins, bounded by the block window.
    fn block_limit(&self, lines: &[&str], trigger: usize, from: usize) -> usize {
        let window_end = lines.len().min(trigger + 1 + self.extraction.block_window);

        (from..window_end)
            .find(|&j| {
                self.is_trigger(lines[j]) || header_pair(lines[j], lines.get(j + 1).copied()).is_some()
            })
            .unwrap_or(window_end)
    }

    /// Extract the block starting at `trigger`.
    ///
    /// Returns the row and the index of the first line after the block.
    pub fn extract_block(
        &self,
        lines: &[&str],
        trigger: usize,
    ) -> Result<(StatementRow, usize), ExtractionError> {
        // STATUS
        let status = lines
            .get(trigger + 1)
            .map(|l| l.trim().to_string())
            .ok_or_else(|| ExtractionError::MissingField("status".to_string()))?;

        let limit = self.block_limit(lines, trigger, trigger + 2);
        let mut k = trigger + 2;

        // AMOUNTS: the contiguous run of currency lines after the status
        let extractor = BlockAmountExtractor::new();
        let mut amounts = Vec::new();
        while amounts.len() < self.extraction.block_max_amounts
            && k < limit
            && extractor.is_amount_line(lines[k])
        {
            match extractor.extract(lines[k]) {
                Some(m) => amounts.push(m.value),
                None => debug!("Skipping unparsable block amount {:?}", lines[k]),
            }
            k += 1;
        }

        // REFERENCE: text before the first '/', unless that line is a date
        while k < limit && !lines[k].contains('/') {
            k += 1;
        }
        let reference = match lines.get(k) {
            Some(line) if k < limit && leading_date(line.trim()).is_none() => {
                let before = line.split('/').next().unwrap_or("").trim();
                if before.is_empty() {
                    self.extraction.no_reference.clone()
                } else {
                    before.to_string()
                }
            }
            _ => self.extraction.no_reference.clone(),
        };

        // DATES: scanning starts on the reference line
        let dates_extractor = DateExtractor::new();
        let mut dates = Vec::new();
        while dates.len() < self.extraction.block_max_dates && k < limit {
            if let Some(m) = dates_extractor.extract(lines[k]) {
                dates.push(m.value);
            }
            k += 1;
        }

        let date = dates
            .into_iter()
            .next()
            .or_else(|| self.extraction.fallback_issue_date.clone());

        // The total sits among the displayed sub-amounts, not necessarily last.
        let amount = amounts.iter().copied().max().unwrap_or(Decimal::ZERO);

        let resolution = self.resolver.resolve(amount, &status, &reference);

        let next = k.max(trigger + 2).min(lines.len());
        let raw_line = lines[trigger..next]
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" | ");

        trace!("Block at line {} spans {} lines", trigger, next - trigger);

        Ok((
            StatementRow {
                date,
                reference,
                amount,
                status,
                resolution,
                raw_line,
                layout: StatementLayout::Block,
            },
            next,
        ))
    }
}

impl Default for BlockClassifier {
    fn default() -> Self {
        Self::new(&CuentaConfig::default())
    }
}

impl RowClassifier for BlockClassifier {
    fn classify(&self, lines: &[&str], index: usize) -> Classified {
        let Some(line) = lines.get(index) else {
            return Classified::new(LineClass::Unrecognized, index + 1);
        };

        if let Some(ctx) = header_pair(line, lines.get(index + 1).copied()) {
            return Classified::new(LineClass::Header(ctx), index + 2);
        }

        if self.is_trigger(line) {
            match self.extract_block(lines, index) {
                Ok((row, next)) => return Classified::new(LineClass::Transaction(row), next),
                Err(e) => debug!("Skipping block at line {}: {}", index, e),
            }
        }

        Classified::new(LineClass::Unrecognized, index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ledger::{EntityContext, EntryType, LedgerRecord};
    use crate::statement::{scan, RecordAssembler};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scan_all(classifier: &BlockClassifier, lines: &[&str]) -> Vec<LedgerRecord> {
        let mut assembler = RecordAssembler::new("CHACRAS");
        let mut records = Vec::new();
        scan(classifier, lines, EntityContext::unknown(), &mut assembler, &mut records);
        records
    }

    #[test]
    fn test_collected_block() {
        let lines = ["CUENTA CORRIENTE", "COBRADO", "$ 500,00", "FV-1/2026", "01/03/2026"];

        let (row, next) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.amount, dec("500.00"));
        assert_eq!(row.resolution.credit, dec("500.00"));
        assert_eq!(row.resolution.debit, Decimal::ZERO);
        assert_eq!(row.reference, "FV-1");
        assert_eq!(row.date.as_deref(), Some("01/03/2026"));
        assert_eq!(next, 5);
    }

    #[test]
    fn test_blank_status_line() {
        let lines = ["CUENTA CORRIENTE", "", "$ 500,00", "FV-1/2026", "01/03/2026"];

        let (row, next) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.status, "");
        assert_eq!(row.amount, dec("500.00"));
        assert_eq!(row.resolution.debit, dec("500.00"));
        assert_eq!(row.resolution.credit, Decimal::ZERO);
        assert_eq!(row.reference, "FV-1");
        assert_eq!(next, 5);
    }

    #[test]
    fn test_maximum_amount_wins() {
        let lines = [
            "CUENTA CORRIENTE",
            "INGRESADO",
            "$ 0,00",
            "$ 12.500,00",
            "$ 2.500,00",
            "FV 0001-00001234 / GOMEZ ANA",
            "01/03/2026",
            "31/03/2026",
            "SUCURSAL CENTRO",
        ];

        let (row, next) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.amount, dec("12500.00"));
        assert_eq!(row.resolution.debit, dec("12500.00"));
        assert_eq!(row.reference, "FV 0001-00001234");
        assert_eq!(row.date.as_deref(), Some("01/03/2026"));
        assert_eq!(next, 8);
    }

    #[test]
    fn test_credit_note_block() {
        let lines = ["CUENTA CORRIENTE", "INGRESADO", "$ 80,00", "NC 0001-00000045 / X", "02/03/2026"];

        let (row, _) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.resolution.entry_type, EntryType::CreditNote);
        assert_eq!(row.resolution.credit, dec("80.00"));
    }

    #[test]
    fn test_missing_reference_and_date() {
        let lines = ["CUENTA CORRIENTE", "PENDIENTE", "$ 10,00", "SIN DATOS"];

        let (row, next) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.reference, "S/N");
        assert_eq!(row.date, None);
        assert_eq!(next, 4);
    }

    #[test]
    fn test_fallback_issue_date_is_opt_in() {
        let mut config = CuentaConfig::default();
        config.extraction.fallback_issue_date = Some("01/01/2026".to_string());
        let lines = ["CUENTA CORRIENTE", "PENDIENTE", "$ 10,00"];

        let (row, _) = BlockClassifier::new(&config).extract_block(&lines, 0).unwrap();

        assert_eq!(row.date.as_deref(), Some("01/01/2026"));
    }

    #[test]
    fn test_date_line_is_not_a_reference() {
        let lines = ["CUENTA CORRIENTE", "COBRADO", "$ 10,00", "05/03/2026"];

        let (row, _) = BlockClassifier::default().extract_block(&lines, 0).unwrap();

        assert_eq!(row.reference, "S/N");
        assert_eq!(row.date.as_deref(), Some("05/03/2026"));
    }

    #[test]
    fn test_trigger_on_last_line_is_skipped() {
        let records = scan_all(&BlockClassifier::default(), &["PEREZ, JUAN", "CUENTA CORRIENTE"]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_block_does_not_stop_the_scan() {
        let lines = [
            "CUENTA CORRIENTE",
            "COBRADO",
            "FV-2/2026",
            "02/03/2026",
            "CUENTA CORRIENTE",
            "INGRESADO",
            "$ 300,00",
            "FV-3/2026",
            "03/03/2026",
        ];

        let records = scan_all(&BlockClassifier::default(), &lines);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount(), Decimal::ZERO);
        assert_eq!(records[0].reference, "FV-2");
        assert_eq!(records[1].reference, "FV-3");
        assert_eq!(records[1].debit, dec("300.00"));
    }

    #[test]
    fn test_short_block_does_not_swallow_next_block() {
        let lines = [
            "CUENTA CORRIENTE",
            "COBRADO",
            "$ 10,00",
            "CUENTA CORRIENTE",
            "INGRESADO",
            "$ 20,00",
            "FV-9/2026",
            "09/03/2026",
        ];

        let records = scan_all(&BlockClassifier::default(), &lines);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reference, "S/N");
        assert_eq!(records[0].date, None);
        assert_eq!(records[1].reference, "FV-9");
    }

    #[test]
    fn test_entity_pairs_carry_forward() {
        let lines = [
            "PEREZ, JUAN",
            "20-12345678-6",
            "CUENTA CORRIENTE",
            "INGRESADO",
            "$ 100,00",
            "FV-1/2026",
            "01/03/2026",
            "GOMEZ, ANA",
            "27-12345678-0",
            "CUENTA CORRIENTE",
            "COBRADO",
            "$ 40,00",
            "FV-2/2026",
            "02/03/2026",
        ];

        let records = scan_all(&BlockClassifier::default(), &lines);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, "PEREZ, JUAN");
        assert_eq!(records[0].tax_id, "20-12345678-6");
        assert_eq!(records[1].entity, "GOMEZ, ANA");
        assert_eq!(records[1].credit, dec("40.00"));
        assert_eq!(records[1].layout, StatementLayout::Block);
    }
}
